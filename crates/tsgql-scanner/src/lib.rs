//! TypeScript declaration scanner/tokenizer for tsgql.
//!
//! This crate provides the lexical analysis phase:
//! - `SyntaxKind` - Token types
//! - `ScannerState` - Tokenizer state machine
//! - `char_codes` - Character classification utilities

pub mod char_codes;
pub mod scanner;
pub mod syntax_kind;

pub use scanner::{ScannerSnapshot, ScannerState};
pub use syntax_kind::{SyntaxKind, text_to_keyword};
