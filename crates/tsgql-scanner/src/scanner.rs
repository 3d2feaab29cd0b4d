//! Scanner state machine.
//!
//! `ScannerState` turns source text into one token at a time. Trivia is
//! skipped before every token; comment ranges found on the way are kept so
//! the parser can hand them to the JSDoc helpers in `tsgql_common`.

use crate::char_codes::{
    is_identifier_part, is_identifier_start, is_line_break, is_white_space_single_line,
};
use crate::syntax_kind::{SyntaxKind, text_to_keyword};
use tsgql_common::CommentRange;
use tsgql_common::diagnostics::diagnostic_messages;

pub mod token_flags {
    pub const NONE: u32 = 0;
    pub const PRECEDING_LINE_BREAK: u32 = 1 << 0;
    pub const UNTERMINATED: u32 = 1 << 1;
}

/// Everything needed to rewind the scanner after speculative lookahead.
#[derive(Clone, Debug)]
pub struct ScannerSnapshot {
    pos: usize,
    token: SyntaxKind,
    token_start: usize,
    token_value: String,
    token_flags: u32,
    comment_count: usize,
    error_count: usize,
}

/// A lexical error: byte offset, length and message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanError {
    pub start: u32,
    pub length: u32,
    pub message: &'static str,
}

pub struct ScannerState {
    text: String,
    pos: usize,
    token: SyntaxKind,
    token_start: usize,
    token_value: String,
    token_flags: u32,
    comments: Vec<CommentRange>,
    errors: Vec<ScanError>,
}

impl ScannerState {
    pub fn new(text: String) -> Self {
        ScannerState {
            text,
            pos: 0,
            token: SyntaxKind::Unknown,
            token_start: 0,
            token_value: String::new(),
            token_flags: token_flags::NONE,
            comments: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn get_token(&self) -> SyntaxKind {
        self.token
    }

    /// Start offset of the current token (after trivia).
    pub fn get_token_start(&self) -> u32 {
        self.token_start as u32
    }

    /// End offset of the current token.
    pub fn get_token_end(&self) -> u32 {
        self.pos as u32
    }

    /// Identifier text, or the cooked value of a string/numeric literal.
    pub fn get_token_value_ref(&self) -> &str {
        &self.token_value
    }

    pub fn get_token_text(&self) -> &str {
        &self.text[self.token_start..self.pos]
    }

    pub fn has_preceding_line_break(&self) -> bool {
        self.token_flags & token_flags::PRECEDING_LINE_BREAK != 0
    }

    pub fn is_unterminated(&self) -> bool {
        self.token_flags & token_flags::UNTERMINATED != 0
    }

    pub fn comments(&self) -> &[CommentRange] {
        &self.comments
    }

    pub fn take_comments(&mut self) -> Vec<CommentRange> {
        std::mem::take(&mut self.comments)
    }

    pub fn take_errors(&mut self) -> Vec<ScanError> {
        std::mem::take(&mut self.errors)
    }

    pub fn save_state(&self) -> ScannerSnapshot {
        ScannerSnapshot {
            pos: self.pos,
            token: self.token,
            token_start: self.token_start,
            token_value: self.token_value.clone(),
            token_flags: self.token_flags,
            comment_count: self.comments.len(),
            error_count: self.errors.len(),
        }
    }

    /// Rewind to a snapshot, dropping comments and errors recorded since.
    pub fn restore_state(&mut self, snapshot: ScannerSnapshot) {
        self.pos = snapshot.pos;
        self.token = snapshot.token;
        self.token_start = snapshot.token_start;
        self.token_value = snapshot.token_value;
        self.token_flags = snapshot.token_flags;
        self.comments.truncate(snapshot.comment_count);
        self.errors.truncate(snapshot.error_count);
    }

    fn peek_char(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn peek_char_at(&self, offset: usize) -> Option<char> {
        self.text.get(self.pos + offset..)?.chars().next()
    }

    fn error(&mut self, start: usize, message: &'static str) {
        self.errors.push(ScanError {
            start: start as u32,
            length: (self.pos - start) as u32,
            message,
        });
    }

    /// Scan the next token.
    pub fn scan(&mut self) -> SyntaxKind {
        self.token_flags = token_flags::NONE;
        self.token_value.clear();
        self.skip_trivia();
        self.token_start = self.pos;

        let Some(ch) = self.peek_char() else {
            self.token = SyntaxKind::EndOfFileToken;
            return self.token;
        };

        self.token = match ch {
            '"' | '\'' => self.scan_string(ch),
            '0'..='9' => self.scan_number(),
            '.' if self.peek_char_at(1).is_some_and(|c| c.is_ascii_digit()) => self.scan_number(),
            c if is_identifier_start(c) => self.scan_identifier(),
            _ => self.scan_punctuation(ch),
        };
        self.token
    }

    fn skip_trivia(&mut self) {
        while let Some(ch) = self.peek_char() {
            if is_line_break(ch) {
                self.token_flags |= token_flags::PRECEDING_LINE_BREAK;
                self.pos += ch.len_utf8();
            } else if is_white_space_single_line(ch) {
                self.pos += ch.len_utf8();
            } else if ch == '/' && self.peek_char_at(1) == Some('/') {
                let start = self.pos;
                while let Some(c) = self.peek_char() {
                    if is_line_break(c) {
                        break;
                    }
                    self.pos += c.len_utf8();
                }
                self.comments
                    .push(CommentRange::new(start as u32, self.pos as u32, false));
            } else if ch == '/' && self.peek_char_at(1) == Some('*') {
                let start = self.pos;
                match self.text[self.pos + 2..].find("*/") {
                    Some(offset) => {
                        let body = &self.text[self.pos + 2..self.pos + 2 + offset];
                        if body.chars().any(is_line_break) {
                            self.token_flags |= token_flags::PRECEDING_LINE_BREAK;
                        }
                        self.pos += 2 + offset + 2;
                    }
                    None => {
                        self.pos = self.text.len();
                        self.error(start, diagnostic_messages::UNTERMINATED_COMMENT);
                    }
                }
                self.comments
                    .push(CommentRange::new(start as u32, self.pos as u32, true));
            } else {
                break;
            }
        }
    }

    fn scan_string(&mut self, quote: char) -> SyntaxKind {
        let start = self.pos;
        self.pos += 1;
        let mut value = String::new();
        loop {
            let Some(ch) = self.peek_char() else {
                self.token_flags |= token_flags::UNTERMINATED;
                self.error(start, diagnostic_messages::UNTERMINATED_STRING_LITERAL);
                break;
            };
            if ch == quote {
                self.pos += 1;
                break;
            }
            if is_line_break(ch) {
                self.token_flags |= token_flags::UNTERMINATED;
                self.error(start, diagnostic_messages::UNTERMINATED_STRING_LITERAL);
                break;
            }
            self.pos += ch.len_utf8();
            if ch == '\\' {
                let Some(escaped) = self.peek_char() else {
                    continue;
                };
                self.pos += escaped.len_utf8();
                value.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '0' => '\0',
                    other => other,
                });
            } else {
                value.push(ch);
            }
        }
        self.token_value = value;
        SyntaxKind::StringLiteral
    }

    fn scan_number(&mut self) -> SyntaxKind {
        let start = self.pos;
        let bytes = self.text.as_bytes();
        let at = |i: usize| bytes.get(i).copied().unwrap_or(0);

        if at(self.pos) == b'0' && matches!(at(self.pos + 1), b'x' | b'X' | b'b' | b'B' | b'o' | b'O')
        {
            self.pos += 2;
            while at(self.pos).is_ascii_alphanumeric() || at(self.pos) == b'_' {
                self.pos += 1;
            }
        } else {
            while at(self.pos).is_ascii_digit() || at(self.pos) == b'_' {
                self.pos += 1;
            }
            if at(self.pos) == b'.' {
                self.pos += 1;
                while at(self.pos).is_ascii_digit() || at(self.pos) == b'_' {
                    self.pos += 1;
                }
            }
            if matches!(at(self.pos), b'e' | b'E') {
                let mut exp = self.pos + 1;
                if matches!(at(exp), b'+' | b'-') {
                    exp += 1;
                }
                if at(exp).is_ascii_digit() {
                    self.pos = exp;
                    while at(self.pos).is_ascii_digit() {
                        self.pos += 1;
                    }
                }
            }
        }
        // BigInt suffix
        if at(self.pos) == b'n' {
            self.pos += 1;
        }

        self.token_value = self.text[start..self.pos].to_string();
        SyntaxKind::NumericLiteral
    }

    fn scan_identifier(&mut self) -> SyntaxKind {
        let start = self.pos;
        while let Some(ch) = self.peek_char() {
            if !is_identifier_part(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
        self.token_value = self.text[start..self.pos].to_string();
        text_to_keyword(&self.token_value).unwrap_or(SyntaxKind::Identifier)
    }

    fn scan_punctuation(&mut self, ch: char) -> SyntaxKind {
        let start = self.pos;
        self.pos += ch.len_utf8();
        match ch {
            '{' => SyntaxKind::OpenBraceToken,
            '}' => SyntaxKind::CloseBraceToken,
            '(' => SyntaxKind::OpenParenToken,
            ')' => SyntaxKind::CloseParenToken,
            '[' => SyntaxKind::OpenBracketToken,
            ']' => SyntaxKind::CloseBracketToken,
            '.' if self.text[self.pos..].starts_with("..") => {
                self.pos += 2;
                SyntaxKind::DotDotDotToken
            }
            '.' => SyntaxKind::DotToken,
            ';' => SyntaxKind::SemicolonToken,
            ',' => SyntaxKind::CommaToken,
            '<' => SyntaxKind::LessThanToken,
            '>' => SyntaxKind::GreaterThanToken,
            '=' if self.peek_char() == Some('>') => {
                self.pos += 1;
                SyntaxKind::EqualsGreaterThanToken
            }
            '=' => SyntaxKind::EqualsToken,
            '+' => SyntaxKind::PlusToken,
            '-' => SyntaxKind::MinusToken,
            '*' => SyntaxKind::AsteriskToken,
            '/' => SyntaxKind::SlashToken,
            '&' => SyntaxKind::AmpersandToken,
            '|' => SyntaxKind::BarToken,
            '?' => SyntaxKind::QuestionToken,
            ':' => SyntaxKind::ColonToken,
            '!' => SyntaxKind::ExclamationToken,
            '@' => SyntaxKind::AtToken,
            '`' => SyntaxKind::BacktickToken,
            '%' | '^' | '~' | '#' | '\\' => SyntaxKind::OtherPunctuation,
            _ => {
                self.error(start, diagnostic_messages::INVALID_CHARACTER);
                SyntaxKind::Unknown
            }
        }
    }
}
