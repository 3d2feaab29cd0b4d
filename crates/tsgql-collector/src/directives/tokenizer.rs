//! Lexer for directive argument lists.

use anyhow::{Result, bail};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    ListBegin,
    ListEnd,
    Separator,
    ParamName,
    NameValueSeparator,
    ParamValue,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
}

impl Token {
    fn new(kind: TokenKind, value: impl Into<String>) -> Self {
        Token {
            kind,
            value: value.into(),
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
        &self.input[start..self.pos]
    }
}

/// Split `(name: value, ...)` into tokens.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut cursor = Cursor { input, pos: 0 };
    let mut tokens = Vec::new();

    cursor.skip_whitespace();
    if cursor.peek() != Some('(') {
        bail!("Expected '(' to open the directive parameter list in '{input}'");
    }
    cursor.bump();
    tokens.push(Token::new(TokenKind::ListBegin, "("));

    loop {
        cursor.skip_whitespace();
        if cursor.peek() == Some(')') {
            break;
        }

        let name = cursor.take_while(is_word_char);
        if name.is_empty() {
            bail!(
                "Invalid directive parameters in '{input}': expected ')' at '{}'",
                cursor.rest()
            );
        }
        tokens.push(Token::new(TokenKind::ParamName, name));

        cursor.skip_whitespace();
        if cursor.peek() != Some(':') {
            bail!("Expected ':' after parameter name '{name}' in '{input}'");
        }
        cursor.bump();
        tokens.push(Token::new(TokenKind::NameValueSeparator, ":"));

        cursor.skip_whitespace();
        let value = match cursor.peek() {
            Some(quote @ ('"' | '\'')) => scan_string_literal(&mut cursor, quote, input)?,
            _ => {
                let raw = cursor.take_while(|c| !c.is_whitespace() && c != ',' && c != ')');
                validate_primitive(raw, name, input)?;
                raw
            }
        };
        tokens.push(Token::new(TokenKind::ParamValue, value));

        cursor.skip_whitespace();
        match cursor.peek() {
            Some(',') => {
                cursor.bump();
                tokens.push(Token::new(TokenKind::Separator, ","));
            }
            Some(')') => break,
            None => bail!("Invalid directive parameters in '{input}': expected ')'"),
            Some(_) => bail!(
                "Expected ',' between directive parameters in '{input}' at '{}'",
                cursor.rest()
            ),
        }
    }

    cursor.bump();
    tokens.push(Token::new(TokenKind::ListEnd, ")"));

    cursor.skip_whitespace();
    if !cursor.rest().is_empty() {
        bail!(
            "Unexpected text after directive parameters in '{input}': '{}'",
            cursor.rest()
        );
    }
    Ok(tokens)
}

/// Scan a quoted literal starting at the opening quote. The returned text
/// keeps its quotes and escapes.
fn scan_string_literal<'a>(cursor: &mut Cursor<'a>, quote: char, input: &str) -> Result<&'a str> {
    let start = cursor.pos;
    cursor.bump();
    loop {
        match cursor.bump() {
            None => bail!(
                "Unterminated string literal in directive parameters '{input}': {}",
                &cursor.input[start..]
            ),
            Some('\n' | '\r') => bail!(
                "Directive parameter strings cannot span lines: {}",
                &cursor.input[start..cursor.pos]
            ),
            Some('\\') => {
                cursor.bump();
            }
            Some(c) if c == quote => return Ok(&cursor.input[start..cursor.pos]),
            Some(_) => {}
        }
    }
}

/// An unquoted value is a bare identifier when it contains a letter or
/// underscore, and a number otherwise.
fn validate_primitive(raw: &str, name: &str, input: &str) -> Result<()> {
    if raw.is_empty() {
        bail!("Missing value for directive parameter '{name}' in '{input}'");
    }
    let looks_like_name = raw.chars().any(|c| c.is_ascii_alphabetic() || c == '_');
    let valid = if looks_like_name {
        raw.chars().all(is_word_char) && !raw.starts_with(|c: char| c.is_ascii_digit())
    } else {
        raw.parse::<f64>().is_ok()
    };
    if !valid {
        bail!("Invalid value '{raw}' for directive parameter '{name}' in '{input}'");
    }
    Ok(())
}
