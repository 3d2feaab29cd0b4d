//! Statement and declaration parsing.
//!
//! Only the declaration surface is modelled. Class and function bodies are
//! skipped as balanced blocks, variable initializers are kept as spans.

use super::base::{NodeIndex, NodeList};
use super::node::{
    ClassData, EnumData, EnumMemberData, ExportDeclData, FunctionData, HeritageData,
    ExprWithTypeArgsData, ImportDeclData, InterfaceData, ModuleBlockData, ModuleData, NodeData,
    SpecifierData, TypeAliasData, VariableDeclarationData, VariableStatementData, modifier_flags,
};
use super::state::ParserState;
use tracing::trace;
use tsgql_common::diagnostics::diagnostic_messages;
use tsgql_scanner::SyntaxKind;

impl ParserState {
    /// Parse statements until `end` (or end of file).
    pub(crate) fn parse_statements_until(&mut self, end: SyntaxKind) -> NodeList {
        let mut statements = Vec::new();
        while !self.is_token(end) && !self.is_token(SyntaxKind::EndOfFileToken) {
            let start = self.token_pos();
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            // Guarantee progress on garbage input.
            if self.token_pos() == start && !self.is_token(SyntaxKind::EndOfFileToken) {
                self.next_token();
            }
        }
        NodeList::new(statements)
    }

    /// Whether the current token can begin a statement.
    pub(crate) fn is_statement_start(&mut self) -> bool {
        match self.token() {
            SyntaxKind::ExportKeyword
            | SyntaxKind::ImportKeyword
            | SyntaxKind::ClassKeyword
            | SyntaxKind::EnumKeyword
            | SyntaxKind::FunctionKeyword
            | SyntaxKind::ConstKeyword
            | SyntaxKind::VarKeyword => true,
            SyntaxKind::InterfaceKeyword
            | SyntaxKind::TypeKeyword
            | SyntaxKind::NamespaceKeyword
            | SyntaxKind::ModuleKeyword
            | SyntaxKind::DeclareKeyword
            | SyntaxKind::AbstractKeyword
            | SyntaxKind::LetKeyword => self.next_token_is(|p| {
                p.token().is_identifier_or_keyword() || p.is_token(SyntaxKind::StringLiteral)
            }),
            _ => false,
        }
    }

    fn parse_statement(&mut self) -> Option<NodeIndex> {
        let start = self.token_pos();
        match self.token() {
            SyntaxKind::SemicolonToken => {
                self.next_token();
                None
            }
            SyntaxKind::ImportKeyword => Some(self.parse_import_declaration(start)),
            SyntaxKind::ExportKeyword if self.next_token_is(is_export_declaration_start) => {
                Some(self.parse_export_declaration(start))
            }
            _ => {
                let modifiers = self.parse_modifiers();
                self.parse_declaration(start, modifiers)
            }
        }
    }

    /// Parse leading declaration modifiers into a flag set.
    fn parse_modifiers(&mut self) -> u32 {
        let mut flags = modifier_flags::NONE;
        loop {
            let flag = match self.token() {
                SyntaxKind::ExportKeyword => modifier_flags::EXPORT,
                SyntaxKind::DefaultKeyword if flags & modifier_flags::EXPORT != 0 => {
                    modifier_flags::DEFAULT
                }
                SyntaxKind::DeclareKeyword
                    if self.next_token_is(|p| {
                        !p.has_preceding_line_break() && p.token().is_identifier_or_keyword()
                    }) =>
                {
                    modifier_flags::DECLARE
                }
                SyntaxKind::AbstractKeyword
                    if self.next_token_is(|p| p.is_token(SyntaxKind::ClassKeyword)) =>
                {
                    modifier_flags::ABSTRACT
                }
                SyntaxKind::ConstKeyword
                    if self.next_token_is(|p| p.is_token(SyntaxKind::EnumKeyword)) =>
                {
                    modifier_flags::CONST
                }
                _ => return flags,
            };
            flags |= flag;
            self.next_token();
        }
    }

    fn parse_declaration(&mut self, start: u32, modifiers: u32) -> Option<NodeIndex> {
        let next_is_name = |p: &ParserState| p.token().is_identifier();
        match self.token() {
            SyntaxKind::InterfaceKeyword if self.next_token_is(next_is_name) => {
                Some(self.parse_interface_declaration(start, modifiers))
            }
            SyntaxKind::TypeKeyword if self.next_token_is(next_is_name) => {
                Some(self.parse_type_alias_declaration(start, modifiers))
            }
            SyntaxKind::EnumKeyword => Some(self.parse_enum_declaration(start, modifiers)),
            SyntaxKind::NamespaceKeyword | SyntaxKind::ModuleKeyword
                if self.next_token_is(|p| {
                    p.token().is_identifier() || p.is_token(SyntaxKind::StringLiteral)
                }) =>
            {
                self.next_token();
                Some(self.parse_module_declaration(start, modifiers))
            }
            SyntaxKind::GlobalKeyword
                if self.next_token_is(|p| p.is_token(SyntaxKind::OpenBraceToken)) =>
            {
                Some(self.parse_module_declaration(start, modifiers))
            }
            SyntaxKind::VarKeyword | SyntaxKind::ConstKeyword => {
                Some(self.parse_variable_statement(start, modifiers))
            }
            SyntaxKind::LetKeyword if self.next_token_is(next_is_name) => {
                Some(self.parse_variable_statement(start, modifiers))
            }
            SyntaxKind::ClassKeyword => Some(self.parse_class_declaration(start, modifiers)),
            SyntaxKind::FunctionKeyword => Some(self.parse_function_declaration(start, modifiers)),
            _ if modifiers & modifier_flags::DEFAULT != 0 => {
                // `export default <expression>;`
                self.skip_statement();
                Some(self.arena.add_node(start, self.prev_token_end, NodeData::EmptyStatement))
            }
            _ => {
                self.parse_error_at_current_token(
                    diagnostic_messages::DECLARATION_OR_STATEMENT_EXPECTED,
                );
                self.skip_statement();
                None
            }
        }
    }

    // =========================================================================
    // Interfaces, aliases, enums
    // =========================================================================

    fn parse_interface_declaration(&mut self, start: u32, modifiers: u32) -> NodeIndex {
        self.parse_expected(SyntaxKind::InterfaceKeyword);
        let name = self.parse_identifier();
        let type_parameters = self.parse_type_parameters();
        let heritage_clauses = self.parse_heritage_clauses();
        let members = self.parse_object_type_members();
        trace!(name = ?self.arena.get_identifier_text(name), "interface");

        self.arena.add_node(
            start,
            self.prev_token_end,
            NodeData::InterfaceDeclaration(InterfaceData {
                modifiers,
                name,
                type_parameters,
                heritage_clauses,
                members,
            }),
        )
    }

    fn parse_type_alias_declaration(&mut self, start: u32, modifiers: u32) -> NodeIndex {
        self.parse_expected(SyntaxKind::TypeKeyword);
        let name = self.parse_identifier();
        let type_parameters = self.parse_type_parameters();
        self.parse_expected(SyntaxKind::EqualsToken);
        let type_node = self.parse_type();
        self.parse_semicolon();

        self.arena.add_node(
            start,
            self.prev_token_end,
            NodeData::TypeAliasDeclaration(TypeAliasData {
                modifiers,
                name,
                type_parameters,
                type_node,
            }),
        )
    }

    fn parse_enum_declaration(&mut self, start: u32, modifiers: u32) -> NodeIndex {
        self.parse_expected(SyntaxKind::EnumKeyword);
        let name = self.parse_identifier();
        let mut members = Vec::new();
        if self.parse_expected(SyntaxKind::OpenBraceToken) {
            members = self
                .parse_delimited_list(SyntaxKind::CloseBraceToken, |p| p.parse_enum_member())
                .nodes;
            self.parse_expected(SyntaxKind::CloseBraceToken);
        }

        self.arena.add_node(
            start,
            self.prev_token_end,
            NodeData::EnumDeclaration(EnumData {
                modifiers,
                name,
                members: NodeList::new(members),
            }),
        )
    }

    fn parse_enum_member(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let name = self.parse_property_name();
        let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
            self.parse_initializer_expression()
        } else {
            NodeIndex::NONE
        };
        self.arena.add_node(
            start,
            self.prev_token_end,
            NodeData::EnumMember(EnumMemberData { name, initializer }),
        )
    }

    /// `extends A, B.C<D>` and `implements X` clauses.
    pub(crate) fn parse_heritage_clauses(&mut self) -> NodeList {
        let mut clauses = Vec::new();
        while matches!(
            self.token(),
            SyntaxKind::ExtendsKeyword | SyntaxKind::ImplementsKeyword
        ) {
            let start = self.token_pos();
            let token = self.token();
            self.next_token();
            let types = self.parse_delimited_list(SyntaxKind::OpenBraceToken, |p| {
                p.parse_expression_with_type_arguments()
            });
            clauses.push(self.arena.add_node(
                start,
                self.prev_token_end,
                NodeData::HeritageClause(HeritageData { token, types }),
            ));
        }
        NodeList::new(clauses)
    }

    fn parse_expression_with_type_arguments(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let expression = self.parse_entity_name();
        let type_arguments = self.parse_type_arguments();
        self.arena.add_node(
            start,
            self.prev_token_end,
            NodeData::ExpressionWithTypeArguments(ExprWithTypeArgsData {
                expression,
                type_arguments,
            }),
        )
    }

    // =========================================================================
    // Namespaces and modules
    // =========================================================================

    /// Called with the current token on the module name (`namespace` or
    /// `module` already consumed) or on `global`.
    fn parse_module_declaration(&mut self, start: u32, modifiers: u32) -> NodeIndex {
        let name = if self.is_token(SyntaxKind::StringLiteral) {
            self.parse_string_literal()
        } else {
            self.parse_identifier()
        };

        let body = if self.is_token(SyntaxKind::DotToken) {
            // `namespace A.B {}` nests B inside A.
            self.next_token();
            let inner_start = self.token_pos();
            self.parse_module_declaration(inner_start, modifier_flags::EXPORT)
        } else if self.is_token(SyntaxKind::OpenBraceToken) {
            let block_start = self.token_pos();
            self.next_token();
            let statements = self.parse_statements_until(SyntaxKind::CloseBraceToken);
            self.parse_expected(SyntaxKind::CloseBraceToken);
            self.arena.add_node(
                block_start,
                self.prev_token_end,
                NodeData::ModuleBlock(ModuleBlockData { statements }),
            )
        } else {
            // `declare module "x";`
            self.parse_semicolon();
            NodeIndex::NONE
        };

        self.arena.add_node(
            start,
            self.prev_token_end,
            NodeData::ModuleDeclaration(ModuleData {
                modifiers,
                name,
                body,
            }),
        )
    }

    // =========================================================================
    // Variables, classes, functions
    // =========================================================================

    fn parse_variable_statement(&mut self, start: u32, modifiers: u32) -> NodeIndex {
        let mut modifiers = modifiers;
        if self.is_token(SyntaxKind::ConstKeyword) {
            modifiers |= modifier_flags::CONST;
        }
        self.next_token();

        let declarations = self.parse_delimited_list(SyntaxKind::SemicolonToken, |p| {
            let decl_start = p.token_pos();
            let name = p.parse_identifier();
            let type_annotation = p.parse_type_annotation();
            let initializer = if p.parse_optional(SyntaxKind::EqualsToken) {
                p.parse_initializer_expression()
            } else {
                NodeIndex::NONE
            };
            p.arena.add_node(
                decl_start,
                p.prev_token_end,
                NodeData::VariableDeclaration(VariableDeclarationData {
                    name,
                    type_annotation,
                    initializer,
                }),
            )
        });
        self.parse_semicolon();

        self.arena.add_node(
            start,
            self.prev_token_end,
            NodeData::VariableStatement(VariableStatementData {
                modifiers,
                declarations,
            }),
        )
    }

    fn parse_class_declaration(&mut self, start: u32, modifiers: u32) -> NodeIndex {
        self.parse_expected(SyntaxKind::ClassKeyword);
        let name = if self.token().is_identifier() && !self.is_token(SyntaxKind::ImplementsKeyword)
        {
            self.parse_identifier()
        } else {
            NodeIndex::NONE
        };
        let type_parameters = self.parse_type_parameters();
        let heritage_clauses = self.parse_heritage_clauses();
        self.skip_braced_block();

        self.arena.add_node(
            start,
            self.prev_token_end,
            NodeData::ClassDeclaration(ClassData {
                modifiers,
                name,
                type_parameters,
                heritage_clauses,
            }),
        )
    }

    fn parse_function_declaration(&mut self, start: u32, modifiers: u32) -> NodeIndex {
        self.parse_expected(SyntaxKind::FunctionKeyword);
        self.parse_optional(SyntaxKind::AsteriskToken);
        let name = if self.token().is_identifier() {
            self.parse_identifier()
        } else {
            NodeIndex::NONE
        };
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameter_list();
        let return_type = self.parse_type_annotation();
        if self.is_token(SyntaxKind::OpenBraceToken) {
            self.skip_braced_block();
        } else {
            self.parse_semicolon();
        }

        self.arena.add_node(
            start,
            self.prev_token_end,
            NodeData::FunctionDeclaration(FunctionData {
                modifiers,
                name,
                type_parameters,
                parameters,
                return_type,
            }),
        )
    }

    // =========================================================================
    // Imports and exports
    // =========================================================================

    fn parse_import_declaration(&mut self, start: u32) -> NodeIndex {
        self.parse_expected(SyntaxKind::ImportKeyword);

        // `import "./side-effect";`
        if self.is_token(SyntaxKind::StringLiteral) {
            let module_specifier = self.parse_string_literal();
            self.parse_semicolon();
            return self.arena.add_node(
                start,
                self.prev_token_end,
                NodeData::ImportDeclaration(ImportDeclData {
                    modifiers: modifier_flags::NONE,
                    default_name: NodeIndex::NONE,
                    namespace_name: NodeIndex::NONE,
                    specifiers: NodeList::default(),
                    module_specifier,
                }),
            );
        }

        let mut modifiers = modifier_flags::NONE;
        if self.is_token(SyntaxKind::TypeKeyword)
            && self.next_token_is(|p| {
                p.token().is_identifier() && !p.is_token(SyntaxKind::FromKeyword)
                    || matches!(
                        p.token(),
                        SyntaxKind::OpenBraceToken | SyntaxKind::AsteriskToken
                    )
            })
        {
            modifiers |= modifier_flags::TYPE_ONLY;
            self.next_token();
        }

        // `import x = require("...")` / `import x = A.B;`
        if self.token().is_identifier()
            && self.next_token_is(|p| p.is_token(SyntaxKind::EqualsToken))
        {
            self.skip_statement();
            return self.arena.add_node(start, self.prev_token_end, NodeData::EmptyStatement);
        }

        let mut default_name = NodeIndex::NONE;
        let mut namespace_name = NodeIndex::NONE;
        let mut specifiers = NodeList::default();

        if self.token().is_identifier() {
            default_name = self.parse_identifier();
            self.parse_optional(SyntaxKind::CommaToken);
        }
        if self.parse_optional(SyntaxKind::AsteriskToken) {
            self.parse_expected(SyntaxKind::AsKeyword);
            namespace_name = self.parse_identifier();
        } else if self.is_token(SyntaxKind::OpenBraceToken) {
            specifiers = self.parse_named_specifiers(true);
        }

        self.parse_expected(SyntaxKind::FromKeyword);
        let module_specifier = self.parse_string_literal();
        self.parse_semicolon();

        self.arena.add_node(
            start,
            self.prev_token_end,
            NodeData::ImportDeclaration(ImportDeclData {
                modifiers,
                default_name,
                namespace_name,
                specifiers,
                module_specifier,
            }),
        )
    }

    fn parse_export_declaration(&mut self, start: u32) -> NodeIndex {
        self.parse_expected(SyntaxKind::ExportKeyword);

        // `export = x;` and `export as namespace X;`
        if matches!(self.token(), SyntaxKind::EqualsToken | SyntaxKind::AsKeyword) {
            self.skip_statement();
            return self.arena.add_node(start, self.prev_token_end, NodeData::EmptyStatement);
        }

        let mut modifiers = modifier_flags::NONE;
        if self.is_token(SyntaxKind::TypeKeyword) {
            modifiers |= modifier_flags::TYPE_ONLY;
            self.next_token();
        }

        let mut is_star = false;
        let mut namespace_name = NodeIndex::NONE;
        let mut specifiers = NodeList::default();
        if self.parse_optional(SyntaxKind::AsteriskToken) {
            is_star = true;
            if self.parse_optional(SyntaxKind::AsKeyword) {
                namespace_name = self.parse_identifier_name();
            }
        } else {
            specifiers = self.parse_named_specifiers(false);
        }

        let module_specifier = if self.parse_optional(SyntaxKind::FromKeyword) {
            self.parse_string_literal()
        } else {
            if is_star {
                self.parse_expected(SyntaxKind::FromKeyword);
            }
            NodeIndex::NONE
        };
        self.parse_semicolon();

        self.arena.add_node(
            start,
            self.prev_token_end,
            NodeData::ExportDeclaration(ExportDeclData {
                modifiers,
                is_star,
                namespace_name,
                specifiers,
                module_specifier,
            }),
        )
    }

    /// `{ a, b as c, type d }`
    fn parse_named_specifiers(&mut self, is_import: bool) -> NodeList {
        if !self.parse_expected(SyntaxKind::OpenBraceToken) {
            return NodeList::default();
        }
        let specifiers = self.parse_delimited_list(SyntaxKind::CloseBraceToken, |p| {
            let start = p.token_pos();
            if p.is_token(SyntaxKind::TypeKeyword)
                && p.next_token_is(|n| n.token().is_identifier_or_keyword())
            {
                p.next_token();
            }
            let first = p.parse_identifier_name();
            let (property_name, name) = if p.parse_optional(SyntaxKind::AsKeyword) {
                (first, p.parse_identifier_name())
            } else {
                (NodeIndex::NONE, first)
            };
            let data = SpecifierData {
                property_name,
                name,
            };
            let data = if is_import {
                NodeData::ImportSpecifier(data)
            } else {
                NodeData::ExportSpecifier(data)
            };
            p.arena.add_node(start, p.prev_token_end, data)
        });
        self.parse_expected(SyntaxKind::CloseBraceToken);
        specifiers
    }
}

/// After `export`: forms that are not a modified declaration.
fn is_export_declaration_start(p: &ParserState) -> bool {
    matches!(
        p.token(),
        SyntaxKind::OpenBraceToken
            | SyntaxKind::AsteriskToken
            | SyntaxKind::EqualsToken
            | SyntaxKind::AsKeyword
    ) || p.is_token(SyntaxKind::TypeKeyword) && {
        // `export type { A }` versus `export type A = ...`
        let text = &p.scanner.text()[p.token_end() as usize..];
        text.trim_start().starts_with('{') || text.trim_start().starts_with('*')
    }
}
