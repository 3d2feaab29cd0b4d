//! Token stream to ordered `name -> Value` arguments.

use super::tokenizer::{Token, TokenKind};
use crate::types::Value;
use anyhow::{Result, bail};
use indexmap::IndexMap;

pub fn parse_arguments(tokens: &[Token]) -> Result<IndexMap<String, Value>> {
    let mut arguments = IndexMap::new();
    match tokens.first() {
        Some(token) if token.kind == TokenKind::ListBegin => {}
        Some(token) => bail!(
            "Directive parameters must start with '(', found '{}'",
            token.value
        ),
        None => bail!("Directive parameters must start with '('"),
    }

    let mut i = 1;
    loop {
        match tokens.get(i) {
            Some(token) if token.kind == TokenKind::ListEnd => break,
            Some(_) => {}
            None => bail!("Unexpected end of directive parameters: expected ')'"),
        }

        let (Some(name), Some(separator), Some(value)) =
            (tokens.get(i), tokens.get(i + 1), tokens.get(i + 2))
        else {
            bail!("Unexpected end of directive parameters: expected 'name: value'");
        };
        if name.kind != TokenKind::ParamName
            || separator.kind != TokenKind::NameValueSeparator
            || value.kind != TokenKind::ParamValue
        {
            bail!(
                "Malformed directive parameters: expected 'name: value' at '{}'",
                name.value
            );
        }
        if arguments.contains_key(&name.value) {
            bail!("Duplicate directive parameter '{}'", name.value);
        }
        arguments.insert(name.value.clone(), Value::new(value.value.clone()));
        i += 3;

        match tokens.get(i) {
            Some(token) if token.kind == TokenKind::ListEnd => break,
            Some(token) if token.kind == TokenKind::Separator => {
                i += 1;
                if tokens
                    .get(i)
                    .is_some_and(|token| token.kind == TokenKind::ListEnd)
                {
                    bail!("Expected a directive parameter after ','");
                }
            }
            Some(token) => bail!(
                "Expected ',' or ')' in directive parameters, found '{}'",
                token.value
            ),
            None => bail!("Unexpected end of directive parameters: expected ')'"),
        }
    }
    Ok(arguments)
}
