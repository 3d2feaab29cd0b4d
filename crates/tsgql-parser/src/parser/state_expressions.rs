//! Initializer expressions.
//!
//! Declarations only need the shape of simple initializers (literals,
//! negated numbers, type assertions, dotted names). Anything richer is
//! skipped and recorded as an `UnparsedExpression` span.

use super::base::NodeIndex;
use super::node::{
    IdentifierData, NodeData, PrefixUnaryData, PropertyAccessData, TypeAssertionData,
    WrappedExprData,
};
use super::state::ParserState;
use tsgql_scanner::SyntaxKind;

impl ParserState {
    pub(crate) fn parse_initializer_expression(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let expression = self.parse_as_expression();
        if self.is_expression_end() {
            return expression;
        }
        // `1 << 2`, `a + b`, calls, object literals...
        self.skip_expression();
        self.arena
            .add_node(start, self.prev_token_end, NodeData::UnparsedExpression)
    }

    /// String, numeric and boolean literals.
    pub(crate) fn parse_literal_expression(&mut self) -> NodeIndex {
        let start = self.token_pos();
        match self.token() {
            SyntaxKind::StringLiteral => self.parse_string_literal(),
            SyntaxKind::NumericLiteral => self.parse_numeric_literal(),
            SyntaxKind::TrueKeyword => {
                self.next_token();
                self.arena
                    .add_node(start, self.prev_token_end, NodeData::TrueLiteral)
            }
            SyntaxKind::FalseKeyword => {
                self.next_token();
                self.arena
                    .add_node(start, self.prev_token_end, NodeData::FalseLiteral)
            }
            _ => {
                self.next_token();
                self.arena
                    .add_node(start, self.prev_token_end, NodeData::NullLiteral)
            }
        }
    }

    fn parse_as_expression(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let mut expression = self.parse_unary_expression();
        while self.is_token(SyntaxKind::AsKeyword) && !self.has_preceding_line_break() {
            self.next_token();
            let type_node = self.parse_type();
            expression = self.arena.add_node(
                start,
                self.prev_token_end,
                NodeData::AsExpression(TypeAssertionData {
                    type_node,
                    expression,
                }),
            );
        }
        expression
    }

    fn parse_unary_expression(&mut self) -> NodeIndex {
        let start = self.token_pos();
        match self.token() {
            SyntaxKind::StringLiteral
            | SyntaxKind::NumericLiteral
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::NullKeyword => self.parse_literal_expression(),
            operator @ (SyntaxKind::MinusToken | SyntaxKind::PlusToken) => {
                self.next_token();
                let operand = self.parse_unary_expression();
                self.arena.add_node(
                    start,
                    self.prev_token_end,
                    NodeData::PrefixUnaryExpression(PrefixUnaryData { operator, operand }),
                )
            }
            SyntaxKind::LessThanToken => {
                // `<Type>expression`
                self.next_token();
                let type_node = self.parse_type();
                self.parse_expected(SyntaxKind::GreaterThanToken);
                let expression = self.parse_unary_expression();
                self.arena.add_node(
                    start,
                    self.prev_token_end,
                    NodeData::TypeAssertion(TypeAssertionData {
                        type_node,
                        expression,
                    }),
                )
            }
            SyntaxKind::OpenParenToken => {
                self.next_token();
                let expression = self.parse_initializer_expression();
                self.parse_expected(SyntaxKind::CloseParenToken);
                self.arena.add_node(
                    start,
                    self.prev_token_end,
                    NodeData::ParenthesizedExpression(WrappedExprData { expression }),
                )
            }
            token if token.is_identifier() => self.parse_name_expression(),
            _ => {
                self.skip_expression();
                self.arena
                    .add_node(start, self.prev_token_end, NodeData::UnparsedExpression)
            }
        }
    }

    /// `a`, `a.b.c`
    fn parse_name_expression(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let mut expression = self.parse_identifier();
        while self.is_token(SyntaxKind::DotToken) {
            self.next_token();
            let name = if self.token().is_identifier_or_keyword() {
                self.parse_identifier_name()
            } else {
                let pos = self.token_pos();
                self.arena.add_node(
                    pos,
                    pos,
                    NodeData::Identifier(IdentifierData {
                        escaped_text: String::new(),
                    }),
                )
            };
            expression = self.arena.add_node(
                start,
                self.prev_token_end,
                NodeData::PropertyAccessExpression(PropertyAccessData { expression, name }),
            );
        }
        expression
    }

    fn is_expression_end(&self) -> bool {
        matches!(
            self.token(),
            SyntaxKind::CommaToken
                | SyntaxKind::SemicolonToken
                | SyntaxKind::CloseBraceToken
                | SyntaxKind::CloseParenToken
                | SyntaxKind::CloseBracketToken
                | SyntaxKind::EndOfFileToken
        ) || self.has_preceding_line_break()
    }

    /// Skip to the end of the current expression. Brackets are balanced.
    fn skip_expression(&mut self) {
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
                }
                SyntaxKind::CommaToken | SyntaxKind::SemicolonToken if depth == 0 => return,
                _ => {}
            }
            self.next_token();
            if depth == 0 && self.has_preceding_line_break() && self.is_statement_start() {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{NodeData, ParserState};

    fn enum_initializer(source: &str) -> NodeData {
        let mut parser = ParserState::new("test.ts".to_string(), source.to_string());
        parser.parse_source_file();
        let arena = parser.get_arena();
        let member = arena
            .nodes
            .iter()
            .find_map(|node| match &node.data {
                NodeData::EnumMember(member) => Some(member.initializer),
                _ => None,
            })
            .expect("enum member");
        arena.get_data(member).expect("initializer").clone()
    }

    #[test]
    fn literal_initializers() {
        assert!(matches!(
            enum_initializer("enum E { A = 'a' }"),
            NodeData::StringLiteral(lit) if lit.text == "a"
        ));
        assert!(matches!(
            enum_initializer("enum E { A = -1 }"),
            NodeData::PrefixUnaryExpression(_)
        ));
    }

    #[test]
    fn assertion_initializers() {
        assert!(matches!(
            enum_initializer("enum E { A = <any>'a' }"),
            NodeData::TypeAssertion(_)
        ));
        assert!(matches!(
            enum_initializer("enum E { A = 'a' as any }"),
            NodeData::AsExpression(_)
        ));
    }

    #[test]
    fn complex_initializer_is_unparsed() {
        assert!(matches!(
            enum_initializer("enum E { A = 1 << 2, B }"),
            NodeData::UnparsedExpression
        ));
    }
}
