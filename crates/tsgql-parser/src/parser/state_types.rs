//! Type and type member parsing.

use super::base::{NodeIndex, NodeList};
use super::node::{
    ArrayTypeData, CompositeTypeData, FunctionTypeData, IdentifierData, LiteralTypeData,
    MethodSignatureData, NodeData, ParameterData, PrefixUnaryData, PropertySignatureData,
    SignatureData, TupleTypeData, TypeLiteralData, TypeOperatorData, TypeParameterData,
    QualifiedNameData, TypeQueryData, TypeRefData, WrappedTypeData, modifier_flags,
};
use super::state::ParserState;
use tsgql_common::diagnostics::diagnostic_messages;
use tsgql_scanner::SyntaxKind;

impl ParserState {
    /// `: Type`, or NONE when there is no annotation.
    pub(crate) fn parse_type_annotation(&mut self) -> NodeIndex {
        if self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_type()
        } else {
            NodeIndex::NONE
        }
    }

    pub(crate) fn parse_type(&mut self) -> NodeIndex {
        if self.is_start_of_function_type() {
            return self.parse_function_type(false);
        }
        if self.is_new_keyword()
            && self.next_token_is(|p| {
                matches!(
                    p.token(),
                    SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
                )
            })
        {
            self.next_token();
            return self.parse_function_type(true);
        }
        self.parse_union_type()
    }

    /// `new` is not a keyword the scanner knows about.
    fn is_new_keyword(&self) -> bool {
        self.is_token(SyntaxKind::Identifier) && self.scanner.get_token_value_ref() == "new"
    }

    fn is_start_of_function_type(&mut self) -> bool {
        if self.is_token(SyntaxKind::LessThanToken) {
            return true;
        }
        if !self.is_token(SyntaxKind::OpenParenToken) {
            return false;
        }
        self.look_ahead(|p| {
            p.next_token();
            if matches!(
                p.token(),
                SyntaxKind::CloseParenToken | SyntaxKind::DotDotDotToken
            ) {
                return true;
            }
            if !p.token().is_identifier_or_keyword() {
                return false;
            }
            p.next_token();
            match p.token() {
                SyntaxKind::ColonToken
                | SyntaxKind::CommaToken
                | SyntaxKind::QuestionToken
                | SyntaxKind::EqualsToken => true,
                SyntaxKind::CloseParenToken => {
                    p.next_token();
                    p.is_token(SyntaxKind::EqualsGreaterThanToken)
                }
                _ => false,
            }
        })
    }

    fn parse_function_type(&mut self, is_constructor: bool) -> NodeIndex {
        let start = self.token_pos();
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameter_list();
        self.parse_expected(SyntaxKind::EqualsGreaterThanToken);
        let return_type = self.parse_type();
        self.arena.add_node(
            start,
            self.prev_token_end,
            NodeData::FunctionType(FunctionTypeData {
                is_constructor,
                type_parameters,
                parameters,
                return_type,
            }),
        )
    }

    fn parse_union_type(&mut self) -> NodeIndex {
        self.parse_composite_type(SyntaxKind::BarToken, |p| p.parse_intersection_type())
    }

    fn parse_intersection_type(&mut self) -> NodeIndex {
        self.parse_composite_type(SyntaxKind::AmpersandToken, |p| p.parse_type_operator())
    }

    /// `A | B | C` (or `&`). A leading operator is allowed; a single
    /// constituent is returned unwrapped.
    fn parse_composite_type(
        &mut self,
        operator: SyntaxKind,
        mut parse_constituent: impl FnMut(&mut Self) -> NodeIndex,
    ) -> NodeIndex {
        let start = self.token_pos();
        self.parse_optional(operator);
        let first = parse_constituent(self);
        if !self.is_token(operator) {
            return first;
        }
        let mut types = vec![first];
        while self.parse_optional(operator) {
            types.push(parse_constituent(self));
        }
        let data = CompositeTypeData {
            types: NodeList::new(types),
        };
        let data = if operator == SyntaxKind::BarToken {
            NodeData::UnionType(data)
        } else {
            NodeData::IntersectionType(data)
        };
        self.arena.add_node(start, self.prev_token_end, data)
    }

    fn parse_type_operator(&mut self) -> NodeIndex {
        let operator = self.token();
        if matches!(
            operator,
            SyntaxKind::KeyOfKeyword | SyntaxKind::UniqueKeyword | SyntaxKind::ReadonlyKeyword
        ) {
            let start = self.token_pos();
            self.next_token();
            let type_node = self.parse_type_operator();
            return self.arena.add_node(
                start,
                self.prev_token_end,
                NodeData::TypeOperator(TypeOperatorData {
                    operator,
                    type_node,
                }),
            );
        }
        self.parse_postfix_type()
    }

    fn parse_postfix_type(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let mut type_node = self.parse_primary_type();
        while self.is_token(SyntaxKind::OpenBracketToken) && !self.has_preceding_line_break() {
            self.next_token();
            self.parse_expected(SyntaxKind::CloseBracketToken);
            type_node = self.arena.add_node(
                start,
                self.prev_token_end,
                NodeData::ArrayType(ArrayTypeData {
                    element_type: type_node,
                }),
            );
        }
        type_node
    }

    fn parse_primary_type(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let token = self.token();
        match token {
            _ if token.is_type_keyword()
                && !self.next_token_is(|p| p.is_token(SyntaxKind::DotToken)) =>
            {
                self.next_token();
                self.arena
                    .add_node(start, self.prev_token_end, NodeData::KeywordType(token))
            }
            SyntaxKind::StringLiteral
            | SyntaxKind::NumericLiteral
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword => {
                let literal = self.parse_literal_expression();
                self.arena.add_node(
                    start,
                    self.prev_token_end,
                    NodeData::LiteralType(LiteralTypeData { literal }),
                )
            }
            SyntaxKind::MinusToken
                if self.next_token_is(|p| p.is_token(SyntaxKind::NumericLiteral)) =>
            {
                self.next_token();
                let operand = self.parse_numeric_literal();
                let literal = self.arena.add_node(
                    start,
                    self.prev_token_end,
                    NodeData::PrefixUnaryExpression(PrefixUnaryData {
                        operator: SyntaxKind::MinusToken,
                        operand,
                    }),
                );
                self.arena.add_node(
                    start,
                    self.prev_token_end,
                    NodeData::LiteralType(LiteralTypeData { literal }),
                )
            }
            SyntaxKind::OpenParenToken => {
                self.next_token();
                let type_node = self.parse_type();
                self.parse_expected(SyntaxKind::CloseParenToken);
                self.arena.add_node(
                    start,
                    self.prev_token_end,
                    NodeData::ParenthesizedType(WrappedTypeData { type_node }),
                )
            }
            SyntaxKind::OpenBraceToken => {
                let members = self.parse_object_type_members();
                self.arena.add_node(
                    start,
                    self.prev_token_end,
                    NodeData::TypeLiteral(TypeLiteralData { members }),
                )
            }
            SyntaxKind::OpenBracketToken => self.parse_tuple_type(),
            SyntaxKind::TypeofKeyword => {
                self.next_token();
                let expr_name = self.parse_entity_name();
                self.arena.add_node(
                    start,
                    self.prev_token_end,
                    NodeData::TypeQuery(TypeQueryData { expr_name }),
                )
            }
            _ if token.is_identifier() || token.is_type_keyword() => self.parse_type_reference(),
            _ => {
                self.parse_error_at_current_token(diagnostic_messages::TYPE_EXPECTED);
                self.arena
                    .add_node(start, start, NodeData::KeywordType(SyntaxKind::Unknown))
            }
        }
    }

    fn parse_type_reference(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let type_name = self.parse_entity_name_allowing_keywords();
        let type_arguments = if self.has_preceding_line_break() {
            NodeList::default()
        } else {
            self.parse_type_arguments()
        };
        self.arena.add_node(
            start,
            self.prev_token_end,
            NodeData::TypeReference(TypeRefData {
                type_name,
                type_arguments,
            }),
        )
    }

    /// Entity name whose first part may also be a type keyword (`string.x`
    /// is rare but legal in namespaces).
    fn parse_entity_name_allowing_keywords(&mut self) -> NodeIndex {
        if self.token().is_identifier() {
            return self.parse_entity_name();
        }
        let start = self.token_pos();
        let text = self.token().text().to_string();
        self.next_token();
        let mut entity = self.arena.add_node(
            start,
            self.prev_token_end,
            NodeData::Identifier(IdentifierData { escaped_text: text }),
        );
        while self.parse_optional(SyntaxKind::DotToken) {
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

    fn parse_tuple_type(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let elements = self.parse_delimited_list(SyntaxKind::CloseBracketToken, |p| {
            p.parse_optional(SyntaxKind::DotDotDotToken);
            // Named members: `[first: string, rest?: number]`
            if p.token().is_identifier_or_keyword()
                && p.next_token_is(|n| {
                    matches!(n.token(), SyntaxKind::ColonToken | SyntaxKind::QuestionToken)
                })
            {
                p.next_token();
                p.parse_optional(SyntaxKind::QuestionToken);
                p.parse_expected(SyntaxKind::ColonToken);
            }
            let element = p.parse_type();
            p.parse_optional(SyntaxKind::QuestionToken);
            element
        });
        self.parse_expected(SyntaxKind::CloseBracketToken);
        self.arena.add_node(
            start,
            self.prev_token_end,
            NodeData::TupleType(TupleTypeData { elements }),
        )
    }

    // =========================================================================
    // Type parameters, arguments and parameters
    // =========================================================================

    pub(crate) fn parse_type_parameters(&mut self) -> NodeList {
        if !self.parse_optional(SyntaxKind::LessThanToken) {
            return NodeList::default();
        }
        let list = self.parse_delimited_list(SyntaxKind::GreaterThanToken, |p| {
            let start = p.token_pos();
            let name = p.parse_identifier();
            let constraint = if p.parse_optional(SyntaxKind::ExtendsKeyword) {
                p.parse_type()
            } else {
                NodeIndex::NONE
            };
            let default = if p.parse_optional(SyntaxKind::EqualsToken) {
                p.parse_type()
            } else {
                NodeIndex::NONE
            };
            p.arena.add_node(
                start,
                p.prev_token_end,
                NodeData::TypeParameter(TypeParameterData {
                    name,
                    constraint,
                    default,
                }),
            )
        });
        self.parse_expected(SyntaxKind::GreaterThanToken);
        list
    }

    pub(crate) fn parse_type_arguments(&mut self) -> NodeList {
        if !self.parse_optional(SyntaxKind::LessThanToken) {
            return NodeList::default();
        }
        let list = self.parse_delimited_list(SyntaxKind::GreaterThanToken, |p| p.parse_type());
        self.parse_expected(SyntaxKind::GreaterThanToken);
        list
    }

    pub(crate) fn parse_parameter_list(&mut self) -> NodeList {
        if !self.parse_expected(SyntaxKind::OpenParenToken) {
            return NodeList::default();
        }
        let list = self.parse_delimited_list(SyntaxKind::CloseParenToken, |p| p.parse_parameter());
        self.parse_expected(SyntaxKind::CloseParenToken);
        list
    }

    fn parse_parameter(&mut self) -> NodeIndex {
        let start = self.token_pos();
        // Parameter properties only appear in class bodies, which are skipped,
        // but accept the modifiers anyway.
        while self.is_token(SyntaxKind::ReadonlyKeyword)
            && self.next_token_is(|p| p.token().is_identifier_or_keyword())
        {
            self.next_token();
        }
        let dot_dot_dot_token = self.parse_optional(SyntaxKind::DotDotDotToken);
        let name = self.parse_identifier_name();
        let question_token = self.parse_optional(SyntaxKind::QuestionToken);
        let type_annotation = self.parse_type_annotation();
        let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
            self.parse_initializer_expression()
        } else {
            NodeIndex::NONE
        };
        self.arena.add_node(
            start,
            self.prev_token_end,
            NodeData::Parameter(ParameterData {
                dot_dot_dot_token,
                name,
                question_token,
                type_annotation,
                initializer,
            }),
        )
    }

    // =========================================================================
    // Type members
    // =========================================================================

    /// `{ member; member, member }` for interfaces and type literals.
    pub(crate) fn parse_object_type_members(&mut self) -> NodeList {
        if !self.parse_expected(SyntaxKind::OpenBraceToken) {
            return NodeList::default();
        }
        let mut members = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let start = self.token_pos();
            members.push(self.parse_type_member());

            if !self.parse_optional(SyntaxKind::SemicolonToken)
                && !self.parse_optional(SyntaxKind::CommaToken)
                && !self.is_token(SyntaxKind::CloseBraceToken)
                && !self.has_preceding_line_break()
            {
                self.parse_expected(SyntaxKind::SemicolonToken);
            }
            if self.token_pos() == start {
                self.next_token();
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        NodeList::new(members)
    }

    fn parse_type_member(&mut self) -> NodeIndex {
        let start = self.token_pos();

        if matches!(
            self.token(),
            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
        ) {
            let data = self.parse_signature_parts();
            return self
                .arena
                .add_node(start, self.prev_token_end, NodeData::CallSignature(data));
        }
        if self.is_new_keyword()
            && self.next_token_is(|p| {
                matches!(
                    p.token(),
                    SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
                )
            })
        {
            self.next_token();
            let data = self.parse_signature_parts();
            return self.arena.add_node(
                start,
                self.prev_token_end,
                NodeData::ConstructSignature(data),
            );
        }

        let mut modifiers = modifier_flags::NONE;
        if self.is_token(SyntaxKind::ReadonlyKeyword)
            && self.next_token_is(|p| {
                !matches!(
                    p.token(),
                    SyntaxKind::OpenParenToken
                        | SyntaxKind::LessThanToken
                        | SyntaxKind::QuestionToken
                        | SyntaxKind::ColonToken
                        | SyntaxKind::SemicolonToken
                        | SyntaxKind::CommaToken
                        | SyntaxKind::CloseBraceToken
                )
            })
        {
            modifiers |= modifier_flags::READONLY;
            self.next_token();
        }

        if self.is_token(SyntaxKind::OpenBracketToken) && self.is_index_signature() {
            self.next_token();
            let parameter = self.parse_parameter();
            self.parse_expected(SyntaxKind::CloseBracketToken);
            let type_annotation = self.parse_type_annotation();
            return self.arena.add_node(
                start,
                self.prev_token_end,
                NodeData::IndexSignature(SignatureData {
                    type_parameters: NodeList::default(),
                    parameters: NodeList::new(vec![parameter]),
                    type_annotation,
                }),
            );
        }

        let name = self.parse_property_name();
        let question_token = self.parse_optional(SyntaxKind::QuestionToken);

        if matches!(
            self.token(),
            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
        ) {
            let parts = self.parse_signature_parts();
            return self.arena.add_node(
                start,
                self.prev_token_end,
                NodeData::MethodSignature(MethodSignatureData {
                    name,
                    question_token,
                    type_parameters: parts.type_parameters,
                    parameters: parts.parameters,
                    return_type: parts.type_annotation,
                }),
            );
        }

        let type_annotation = self.parse_type_annotation();
        self.arena.add_node(
            start,
            self.prev_token_end,
            NodeData::PropertySignature(PropertySignatureData {
                modifiers,
                name,
                question_token,
                type_annotation,
            }),
        )
    }

    /// `<T>(params): Return`
    fn parse_signature_parts(&mut self) -> SignatureData {
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameter_list();
        let type_annotation = self.parse_type_annotation();
        SignatureData {
            type_parameters,
            parameters,
            type_annotation,
        }
    }

    /// `[key: string]: T` as opposed to a computed property name.
    fn is_index_signature(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            if !p.token().is_identifier_or_keyword() {
                return false;
            }
            p.next_token();
            p.is_token(SyntaxKind::ColonToken)
        })
    }

    /// Identifier, keyword, string or numeric member name.
    pub(crate) fn parse_property_name(&mut self) -> NodeIndex {
        match self.token() {
            SyntaxKind::StringLiteral => self.parse_string_literal(),
            SyntaxKind::NumericLiteral => self.parse_numeric_literal(),
            token if token.is_identifier_or_keyword() => self.parse_identifier_name(),
            _ => {
                self.parse_error_at_current_token(
                    diagnostic_messages::PROPERTY_OR_SIGNATURE_EXPECTED,
                );
                let pos = self.token_pos();
                self.arena.add_node(
                    pos,
                    pos,
                    NodeData::Identifier(IdentifierData {
                        escaped_text: String::new(),
                    }),
                )
            }
        }
    }
}
