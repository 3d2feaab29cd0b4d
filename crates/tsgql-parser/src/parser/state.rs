//! Parser state - token plumbing, diagnostics and source file parsing.

use super::base::{NodeIndex, NodeList};
use super::node::{IdentifierData, LiteralData, NodeArena, NodeData, QualifiedNameData, SourceFileData};
use tracing::debug;
use tsgql_common::CommentRange;
use tsgql_common::diagnostics::{Diagnostic, diagnostic_messages, format_message};
use tsgql_scanner::{ScannerState, SyntaxKind};

/// Everything produced by parsing one file.
#[derive(Debug)]
pub struct ParsedFile {
    pub file_name: String,
    pub source_text: String,
    pub arena: NodeArena,
    pub root: NodeIndex,
    /// Every comment in the file, sorted by position.
    pub comments: Vec<CommentRange>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Recursive-descent parser over a [`ScannerState`].
pub struct ParserState {
    pub(crate) scanner: ScannerState,
    pub(crate) arena: NodeArena,
    pub(crate) file_name: String,
    pub(crate) current_token: SyntaxKind,
    /// End offset of the last consumed token.
    pub(crate) prev_token_end: u32,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

impl ParserState {
    pub fn new(file_name: String, source_text: String) -> ParserState {
        let estimated_nodes = source_text.len() / 8;
        let mut scanner = ScannerState::new(source_text);
        let current_token = scanner.scan();
        ParserState {
            scanner,
            arena: NodeArena::with_capacity(estimated_nodes),
            file_name,
            current_token,
            prev_token_end: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Parse the whole file and return the SourceFile node.
    pub fn parse_source_file(&mut self) -> NodeIndex {
        let statements = self.parse_statements_until(SyntaxKind::EndOfFileToken);
        let end = self.scanner.text().len() as u32;

        for error in self.scanner.take_errors() {
            self.diagnostics.push(Diagnostic::error(
                self.file_name.clone(),
                error.start,
                error.length,
                error.message.to_string(),
            ));
        }
        self.diagnostics.sort_by_key(|d| d.start);

        debug!(
            file = %self.file_name,
            nodes = self.arena.len(),
            diagnostics = self.diagnostics.len(),
            "parsed source file"
        );

        self.arena.add_node(
            0,
            end,
            NodeData::SourceFile(SourceFileData {
                file_name: self.file_name.clone(),
                statements,
            }),
        )
    }

    pub fn get_diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn get_arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn get_source_text(&self) -> &str {
        self.scanner.text()
    }

    /// Consume the parser after `parse_source_file`.
    pub fn into_parsed_file(mut self, root: NodeIndex) -> ParsedFile {
        let comments = self.scanner.take_comments();
        ParsedFile {
            file_name: self.file_name,
            source_text: self.scanner.text().to_string(),
            arena: self.arena,
            root,
            comments,
            diagnostics: self.diagnostics,
        }
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    #[inline]
    pub(crate) fn token(&self) -> SyntaxKind {
        self.current_token
    }

    #[inline]
    pub(crate) fn is_token(&self, kind: SyntaxKind) -> bool {
        self.current_token == kind
    }

    #[inline]
    pub(crate) fn token_pos(&self) -> u32 {
        self.scanner.get_token_start()
    }

    #[inline]
    pub(crate) fn token_end(&self) -> u32 {
        self.scanner.get_token_end()
    }

    pub(crate) fn next_token(&mut self) -> SyntaxKind {
        self.prev_token_end = self.scanner.get_token_end();
        self.current_token = self.scanner.scan();
        self.current_token
    }

    pub(crate) fn has_preceding_line_break(&self) -> bool {
        self.scanner.has_preceding_line_break()
    }

    /// Run `f` speculatively and rewind the scanner afterwards.
    pub(crate) fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let snapshot = self.scanner.save_state();
        let current = self.current_token;
        let prev_end = self.prev_token_end;
        let diagnostic_count = self.diagnostics.len();
        let arena_len = self.arena.nodes.len();

        let result = f(self);

        self.scanner.restore_state(snapshot);
        self.current_token = current;
        self.prev_token_end = prev_end;
        self.diagnostics.truncate(diagnostic_count);
        self.arena.nodes.truncate(arena_len);
        result
    }

    /// Whether the token after the current one satisfies `pred`.
    pub(crate) fn next_token_is(&mut self, pred: impl FnOnce(&Self) -> bool) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            pred(p)
        })
    }

    pub(crate) fn parse_optional(&mut self, kind: SyntaxKind) -> bool {
        if self.is_token(kind) {
            self.next_token();
            true
        } else {
            false
        }
    }

    pub(crate) fn parse_expected(&mut self, kind: SyntaxKind) -> bool {
        if self.parse_optional(kind) {
            return true;
        }
        self.parse_error_at_current_token(&format_message(
            diagnostic_messages::EXPECTED,
            &[kind.text()],
        ));
        false
    }

    /// Record an error at the current token. Only the first error at a
    /// given position is kept.
    pub(crate) fn parse_error_at_current_token(&mut self, message: &str) {
        let start = self.token_pos();
        let length = self.token_end().saturating_sub(start);
        self.parse_error_at(start, length, message);
    }

    pub(crate) fn parse_error_at(&mut self, start: u32, length: u32, message: &str) {
        if self.diagnostics.last().is_some_and(|d| d.start == start) {
            return;
        }
        self.diagnostics.push(Diagnostic::error(
            self.file_name.clone(),
            start,
            length,
            message.to_string(),
        ));
    }

    pub(crate) fn can_parse_semicolon(&self) -> bool {
        self.is_token(SyntaxKind::SemicolonToken)
            || self.is_token(SyntaxKind::CloseBraceToken)
            || self.is_token(SyntaxKind::EndOfFileToken)
            || self.has_preceding_line_break()
    }

    /// Consume a statement terminator, allowing automatic semicolon insertion.
    pub(crate) fn parse_semicolon(&mut self) -> bool {
        if self.can_parse_semicolon() {
            self.parse_optional(SyntaxKind::SemicolonToken);
            true
        } else {
            self.parse_expected(SyntaxKind::SemicolonToken)
        }
    }

    // =========================================================================
    // Names and literals
    // =========================================================================

    fn make_identifier(&mut self, text: String, pos: u32, end: u32) -> NodeIndex {
        self.arena.add_node(
            pos,
            end,
            NodeData::Identifier(IdentifierData { escaped_text: text }),
        )
    }

    /// Parse a binding identifier (contextual keywords allowed).
    pub(crate) fn parse_identifier(&mut self) -> NodeIndex {
        if self.token().is_identifier() {
            return self.parse_identifier_name();
        }
        self.parse_error_at_current_token(diagnostic_messages::IDENTIFIER_EXPECTED);
        let pos = self.token_pos();
        self.make_identifier(String::new(), pos, pos)
    }

    /// Parse an identifier where reserved words are allowed too.
    pub(crate) fn parse_identifier_name(&mut self) -> NodeIndex {
        if !self.token().is_identifier_or_keyword() {
            self.parse_error_at_current_token(diagnostic_messages::IDENTIFIER_EXPECTED);
            let pos = self.token_pos();
            return self.make_identifier(String::new(), pos, pos);
        }
        let pos = self.token_pos();
        let end = self.token_end();
        let text = self.scanner.get_token_text().to_string();
        self.next_token();
        self.make_identifier(text, pos, end)
    }

    /// Parse `A.B.C`. The first part must be an identifier; later parts may
    /// be keywords.
    pub(crate) fn parse_entity_name(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let mut entity = self.parse_identifier();
        while self.is_token(SyntaxKind::DotToken) {
            self.next_token();
            let right = self.parse_identifier_name();
            entity = self.arena.add_node(
                start,
                self.prev_token_end,
                NodeData::QualifiedName(QualifiedNameData {
                    left: entity,
                    right,
                }),
            );
        }
        entity
    }

    pub(crate) fn parse_string_literal(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let end = self.token_end();
        if !self.is_token(SyntaxKind::StringLiteral) {
            self.parse_error_at_current_token(diagnostic_messages::STRING_LITERAL_EXPECTED);
            return self.arena.add_node(
                pos,
                pos,
                NodeData::StringLiteral(LiteralData {
                    text: String::new(),
                }),
            );
        }
        let text = self.scanner.get_token_value_ref().to_string();
        self.next_token();
        self.arena
            .add_node(pos, end, NodeData::StringLiteral(LiteralData { text }))
    }

    pub(crate) fn parse_numeric_literal(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let end = self.token_end();
        let text = self.scanner.get_token_value_ref().to_string();
        self.next_token();
        self.arena
            .add_node(pos, end, NodeData::NumericLiteral(LiteralData { text }))
    }

    /// Parse a delimited list of items, tolerating a trailing separator.
    pub(crate) fn parse_delimited_list(
        &mut self,
        close: SyntaxKind,
        mut parse_item: impl FnMut(&mut Self) -> NodeIndex,
    ) -> NodeList {
        let mut nodes = Vec::new();
        while !self.is_token(close) && !self.is_token(SyntaxKind::EndOfFileToken) {
            let start = self.token_pos();
            nodes.push(parse_item(self));
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
            if self.token_pos() == start {
                break;
            }
        }
        NodeList::new(nodes)
    }

    /// Skip tokens until the end of the current statement. Nested
    /// brackets are skipped as a whole.
    pub(crate) fn skip_statement(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.token() {
                SyntaxKind::EndOfFileToken => return,
                SyntaxKind::OpenBraceToken
                | SyntaxKind::OpenParenToken
                | SyntaxKind::OpenBracketToken => depth += 1,
                SyntaxKind::CloseBraceToken
                | SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                    if depth == 0 && self.is_token(SyntaxKind::CloseBraceToken) {
                        self.next_token();
                        if self.is_token(SyntaxKind::SemicolonToken) {
                            self.next_token();
                        }
                        return;
                    }
                }
                SyntaxKind::SemicolonToken if depth == 0 => {
                    self.next_token();
                    return;
                }
                _ => {}
            }
            self.next_token();
            if depth == 0 && self.has_preceding_line_break() && self.is_statement_start() {
                return;
            }
        }
    }

    /// Skip a `{ ... }` block (class and function bodies).
    pub(crate) fn skip_braced_block(&mut self) {
        if !self.parse_expected(SyntaxKind::OpenBraceToken) {
            return;
        }
        let mut depth = 1usize;
        while depth > 0 {
            match self.token() {
                SyntaxKind::EndOfFileToken => {
                    self.parse_expected(SyntaxKind::CloseBraceToken);
                    return;
                }
                SyntaxKind::OpenBraceToken => depth += 1,
                SyntaxKind::CloseBraceToken => depth -= 1,
                _ => {}
            }
            self.next_token();
        }
    }
}
