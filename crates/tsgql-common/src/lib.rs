//! Common types and utilities for the tsgql schema generator.
//!
//! This crate provides foundational types used across all tsgql crates:
//! - Position/line lookups for source locations (`LineMap`, `Position`)
//! - Comment ranges and JSDoc extraction (`comments`)
//! - Structured JSDoc tag parsing (`jsdoc`)
//! - Parser diagnostics (`Diagnostic`)

// Position types for line/column source locations
pub mod position;
pub use position::{LineMap, Position};

// Comment parsing utilities
pub mod comments;
pub use comments::CommentRange;

// JSDoc tag parsing
pub mod jsdoc;
pub use jsdoc::{JsDoc, JsDocTag, parse_jsdoc};

// Diagnostics reported by the parser
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory};
