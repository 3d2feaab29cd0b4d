//! Directive argument lists embedded in doc tags: `(name: value, ...)`.

mod parser;
mod tokenizer;

pub use parser::parse_arguments;
pub use tokenizer::{Token, TokenKind, tokenize};

use crate::types::Value;
use anyhow::Result;
use indexmap::IndexMap;

/// Tokenize and parse an argument list. Empty text means no arguments.
pub fn parse_directive_arguments(text: &str) -> Result<IndexMap<String, Value>> {
    if text.trim().is_empty() {
        return Ok(IndexMap::new());
    }
    let tokens = tokenize(text)?;
    parse_arguments(&tokens)
}
