//! AST node definitions.
//!
//! Every node stores its span (`pos`/`end`, byte offsets of its first and
//! last token), its parent and a [`NodeData`] payload. Child links are
//! [`NodeIndex`] values into the same arena.

use super::base::{NodeIndex, NodeList};
use serde::Serialize;
use smallvec::SmallVec;
use tsgql_scanner::SyntaxKind;

/// Modifier bits recorded on declarations and members.
pub mod modifier_flags {
    pub const NONE: u32 = 0;
    pub const EXPORT: u32 = 1 << 0;
    pub const DECLARE: u32 = 1 << 1;
    pub const DEFAULT: u32 = 1 << 2;
    pub const CONST: u32 = 1 << 3;
    pub const READONLY: u32 = 1 << 4;
    pub const ABSTRACT: u32 = 1 << 5;
    pub const TYPE_ONLY: u32 = 1 << 6;
}

#[derive(Clone, Debug, Serialize)]
pub struct Node {
    pub pos: u32,
    pub end: u32,
    pub parent: NodeIndex,
    pub data: NodeData,
}

#[derive(Clone, Debug, Serialize)]
pub struct SourceFileData {
    pub file_name: String,
    pub statements: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct IdentifierData {
    pub escaped_text: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct QualifiedNameData {
    pub left: NodeIndex,
    pub right: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct LiteralData {
    /// Cooked value (quotes removed, escapes applied for strings).
    pub text: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct InterfaceData {
    pub modifiers: u32,
    pub name: NodeIndex,
    pub type_parameters: NodeList,
    pub heritage_clauses: NodeList,
    pub members: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct TypeAliasData {
    pub modifiers: u32,
    pub name: NodeIndex,
    pub type_parameters: NodeList,
    pub type_node: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct EnumData {
    pub modifiers: u32,
    pub name: NodeIndex,
    pub members: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct EnumMemberData {
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ModuleData {
    pub modifiers: u32,
    /// Identifier for namespaces, string literal for ambient modules.
    pub name: NodeIndex,
    /// A `ModuleBlock`, a nested `ModuleDeclaration` for dotted names, or NONE.
    pub body: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ModuleBlockData {
    pub statements: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct VariableStatementData {
    pub modifiers: u32,
    pub declarations: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct VariableDeclarationData {
    pub name: NodeIndex,
    pub type_annotation: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ClassData {
    pub modifiers: u32,
    pub name: NodeIndex,
    pub type_parameters: NodeList,
    pub heritage_clauses: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct FunctionData {
    pub modifiers: u32,
    pub name: NodeIndex,
    pub type_parameters: NodeList,
    pub parameters: NodeList,
    pub return_type: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ImportDeclData {
    pub modifiers: u32,
    /// `import Name from "..."`
    pub default_name: NodeIndex,
    /// `import * as Name from "..."`
    pub namespace_name: NodeIndex,
    /// `import { a, b as c } from "..."`
    pub specifiers: NodeList,
    pub module_specifier: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ExportDeclData {
    pub modifiers: u32,
    /// `export * from "..."` (and `export * as ns from "..."` when
    /// `namespace_name` is set).
    pub is_star: bool,
    pub namespace_name: NodeIndex,
    pub specifiers: NodeList,
    pub module_specifier: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct SpecifierData {
    /// The name on the far side of an `as` rename, NONE when not renamed.
    pub property_name: NodeIndex,
    /// The local (import) or exported (export) name.
    pub name: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct PropertySignatureData {
    pub modifiers: u32,
    pub name: NodeIndex,
    pub question_token: bool,
    pub type_annotation: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct MethodSignatureData {
    pub name: NodeIndex,
    pub question_token: bool,
    pub type_parameters: NodeList,
    pub parameters: NodeList,
    pub return_type: NodeIndex,
}

/// Index, call and construct signatures.
#[derive(Clone, Debug, Serialize)]
pub struct SignatureData {
    pub type_parameters: NodeList,
    pub parameters: NodeList,
    pub type_annotation: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct ParameterData {
    pub dot_dot_dot_token: bool,
    pub name: NodeIndex,
    pub question_token: bool,
    pub type_annotation: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct TypeParameterData {
    pub name: NodeIndex,
    pub constraint: NodeIndex,
    pub default: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct HeritageData {
    /// `ExtendsKeyword` or `ImplementsKeyword`.
    pub token: SyntaxKind,
    pub types: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct ExprWithTypeArgsData {
    /// Identifier or QualifiedName.
    pub expression: NodeIndex,
    pub type_arguments: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct TypeRefData {
    /// Identifier or QualifiedName.
    pub type_name: NodeIndex,
    pub type_arguments: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct ArrayTypeData {
    pub element_type: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct CompositeTypeData {
    pub types: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct WrappedTypeData {
    pub type_node: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct TypeLiteralData {
    pub members: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct LiteralTypeData {
    /// StringLiteral, NumericLiteral, TrueLiteral, FalseLiteral or a
    /// PrefixUnaryExpression over a numeric literal.
    pub literal: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct FunctionTypeData {
    pub is_constructor: bool,
    pub type_parameters: NodeList,
    pub parameters: NodeList,
    pub return_type: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct TupleTypeData {
    pub elements: NodeList,
}

#[derive(Clone, Debug, Serialize)]
pub struct TypeOperatorData {
    /// `KeyOfKeyword`, `UniqueKeyword` or `ReadonlyKeyword`.
    pub operator: SyntaxKind,
    pub type_node: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct TypeQueryData {
    pub expr_name: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct PrefixUnaryData {
    /// `MinusToken` or `PlusToken`.
    pub operator: SyntaxKind,
    pub operand: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct TypeAssertionData {
    pub type_node: NodeIndex,
    pub expression: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct WrappedExprData {
    pub expression: NodeIndex,
}

#[derive(Clone, Debug, Serialize)]
pub struct PropertyAccessData {
    pub expression: NodeIndex,
    pub name: NodeIndex,
}

/// Node payloads.
#[derive(Clone, Debug, Serialize)]
pub enum NodeData {
    SourceFile(SourceFileData),

    // Names and literals
    Identifier(IdentifierData),
    QualifiedName(QualifiedNameData),
    StringLiteral(LiteralData),
    NumericLiteral(LiteralData),
    TrueLiteral,
    FalseLiteral,
    NullLiteral,

    // Declarations
    InterfaceDeclaration(InterfaceData),
    TypeAliasDeclaration(TypeAliasData),
    EnumDeclaration(EnumData),
    EnumMember(EnumMemberData),
    ModuleDeclaration(ModuleData),
    ModuleBlock(ModuleBlockData),
    VariableStatement(VariableStatementData),
    VariableDeclaration(VariableDeclarationData),
    ClassDeclaration(ClassData),
    FunctionDeclaration(FunctionData),
    ImportDeclaration(ImportDeclData),
    ImportSpecifier(SpecifierData),
    ExportDeclaration(ExportDeclData),
    ExportSpecifier(SpecifierData),
    /// Statements the declaration pipeline skips (`export default expr;`,
    /// `import x = require(...)`, stray `;`).
    EmptyStatement,

    // Type members and their parts
    PropertySignature(PropertySignatureData),
    MethodSignature(MethodSignatureData),
    IndexSignature(SignatureData),
    CallSignature(SignatureData),
    ConstructSignature(SignatureData),
    Parameter(ParameterData),
    TypeParameter(TypeParameterData),
    HeritageClause(HeritageData),
    ExpressionWithTypeArguments(ExprWithTypeArgsData),

    // Types
    KeywordType(SyntaxKind),
    TypeReference(TypeRefData),
    ArrayType(ArrayTypeData),
    UnionType(CompositeTypeData),
    IntersectionType(CompositeTypeData),
    ParenthesizedType(WrappedTypeData),
    TypeLiteral(TypeLiteralData),
    LiteralType(LiteralTypeData),
    FunctionType(FunctionTypeData),
    TupleType(TupleTypeData),
    TypeOperator(TypeOperatorData),
    TypeQuery(TypeQueryData),

    // Expressions (initializers)
    PrefixUnaryExpression(PrefixUnaryData),
    TypeAssertion(TypeAssertionData),
    AsExpression(TypeAssertionData),
    ParenthesizedExpression(WrappedExprData),
    PropertyAccessExpression(PropertyAccessData),
    /// Initializer text the parser skipped over; only its span is kept.
    UnparsedExpression,
}

impl NodeData {
    /// The syntactic kind name, as used in error messages.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            NodeData::SourceFile(_) => "SourceFile",
            NodeData::Identifier(_) => "Identifier",
            NodeData::QualifiedName(_) => "QualifiedName",
            NodeData::StringLiteral(_) => "StringLiteral",
            NodeData::NumericLiteral(_) => "NumericLiteral",
            NodeData::TrueLiteral => "TrueKeyword",
            NodeData::FalseLiteral => "FalseKeyword",
            NodeData::NullLiteral => "NullKeyword",
            NodeData::InterfaceDeclaration(_) => "InterfaceDeclaration",
            NodeData::TypeAliasDeclaration(_) => "TypeAliasDeclaration",
            NodeData::EnumDeclaration(_) => "EnumDeclaration",
            NodeData::EnumMember(_) => "EnumMember",
            NodeData::ModuleDeclaration(_) => "ModuleDeclaration",
            NodeData::ModuleBlock(_) => "ModuleBlock",
            NodeData::VariableStatement(_) => "VariableStatement",
            NodeData::VariableDeclaration(_) => "VariableDeclaration",
            NodeData::ClassDeclaration(_) => "ClassDeclaration",
            NodeData::FunctionDeclaration(_) => "FunctionDeclaration",
            NodeData::ImportDeclaration(_) => "ImportDeclaration",
            NodeData::ImportSpecifier(_) => "ImportSpecifier",
            NodeData::ExportDeclaration(_) => "ExportDeclaration",
            NodeData::ExportSpecifier(_) => "ExportSpecifier",
            NodeData::EmptyStatement => "EmptyStatement",
            NodeData::PropertySignature(_) => "PropertySignature",
            NodeData::MethodSignature(_) => "MethodSignature",
            NodeData::IndexSignature(_) => "IndexSignature",
            NodeData::CallSignature(_) => "CallSignature",
            NodeData::ConstructSignature(_) => "ConstructSignature",
            NodeData::Parameter(_) => "Parameter",
            NodeData::TypeParameter(_) => "TypeParameter",
            NodeData::HeritageClause(_) => "HeritageClause",
            NodeData::ExpressionWithTypeArguments(_) => "ExpressionWithTypeArguments",
            NodeData::KeywordType(kind) => keyword_type_name(*kind),
            NodeData::TypeReference(_) => "TypeReference",
            NodeData::ArrayType(_) => "ArrayType",
            NodeData::UnionType(_) => "UnionType",
            NodeData::IntersectionType(_) => "IntersectionType",
            NodeData::ParenthesizedType(_) => "ParenthesizedType",
            NodeData::TypeLiteral(_) => "TypeLiteral",
            NodeData::LiteralType(_) => "LiteralType",
            NodeData::FunctionType(data) => {
                if data.is_constructor {
                    "ConstructorType"
                } else {
                    "FunctionType"
                }
            }
            NodeData::TupleType(_) => "TupleType",
            NodeData::TypeOperator(_) => "TypeOperator",
            NodeData::TypeQuery(_) => "TypeQuery",
            NodeData::PrefixUnaryExpression(_) => "PrefixUnaryExpression",
            NodeData::TypeAssertion(_) => "TypeAssertionExpression",
            NodeData::AsExpression(_) => "AsExpression",
            NodeData::ParenthesizedExpression(_) => "ParenthesizedExpression",
            NodeData::PropertyAccessExpression(_) => "PropertyAccessExpression",
            NodeData::UnparsedExpression => "Expression",
        }
    }

    /// Direct children in source order.
    pub fn children(&self) -> SmallVec<[NodeIndex; 4]> {
        let mut out: SmallVec<[NodeIndex; 4]> = SmallVec::new();
        let mut push = |idx: NodeIndex| {
            if idx.is_some() {
                out.push(idx);
            }
        };
        match self {
            NodeData::SourceFile(d) => d.statements.iter().for_each(&mut push),
            NodeData::QualifiedName(d) => {
                push(d.left);
                push(d.right);
            }
            NodeData::InterfaceDeclaration(d) => {
                push(d.name);
                d.type_parameters.iter().for_each(&mut push);
                d.heritage_clauses.iter().for_each(&mut push);
                d.members.iter().for_each(&mut push);
            }
            NodeData::TypeAliasDeclaration(d) => {
                push(d.name);
                d.type_parameters.iter().for_each(&mut push);
                push(d.type_node);
            }
            NodeData::EnumDeclaration(d) => {
                push(d.name);
                d.members.iter().for_each(&mut push);
            }
            NodeData::EnumMember(d) => {
                push(d.name);
                push(d.initializer);
            }
            NodeData::ModuleDeclaration(d) => {
                push(d.name);
                push(d.body);
            }
            NodeData::ModuleBlock(d) => d.statements.iter().for_each(&mut push),
            NodeData::VariableStatement(d) => d.declarations.iter().for_each(&mut push),
            NodeData::VariableDeclaration(d) => {
                push(d.name);
                push(d.type_annotation);
                push(d.initializer);
            }
            NodeData::ClassDeclaration(d) => {
                push(d.name);
                d.type_parameters.iter().for_each(&mut push);
                d.heritage_clauses.iter().for_each(&mut push);
            }
            NodeData::FunctionDeclaration(d) => {
                push(d.name);
                d.type_parameters.iter().for_each(&mut push);
                d.parameters.iter().for_each(&mut push);
                push(d.return_type);
            }
            NodeData::ImportDeclaration(d) => {
                push(d.default_name);
                push(d.namespace_name);
                d.specifiers.iter().for_each(&mut push);
                push(d.module_specifier);
            }
            NodeData::ExportDeclaration(d) => {
                push(d.namespace_name);
                d.specifiers.iter().for_each(&mut push);
                push(d.module_specifier);
            }
            NodeData::ImportSpecifier(d) | NodeData::ExportSpecifier(d) => {
                push(d.property_name);
                push(d.name);
            }
            NodeData::PropertySignature(d) => {
                push(d.name);
                push(d.type_annotation);
            }
            NodeData::MethodSignature(d) => {
                push(d.name);
                d.type_parameters.iter().for_each(&mut push);
                d.parameters.iter().for_each(&mut push);
                push(d.return_type);
            }
            NodeData::IndexSignature(d)
            | NodeData::CallSignature(d)
            | NodeData::ConstructSignature(d) => {
                d.type_parameters.iter().for_each(&mut push);
                d.parameters.iter().for_each(&mut push);
                push(d.type_annotation);
            }
            NodeData::Parameter(d) => {
                push(d.name);
                push(d.type_annotation);
                push(d.initializer);
            }
            NodeData::TypeParameter(d) => {
                push(d.name);
                push(d.constraint);
                push(d.default);
            }
            NodeData::HeritageClause(d) => d.types.iter().for_each(&mut push),
            NodeData::ExpressionWithTypeArguments(d) => {
                push(d.expression);
                d.type_arguments.iter().for_each(&mut push);
            }
            NodeData::TypeReference(d) => {
                push(d.type_name);
                d.type_arguments.iter().for_each(&mut push);
            }
            NodeData::ArrayType(d) => push(d.element_type),
            NodeData::UnionType(d) | NodeData::IntersectionType(d) => {
                d.types.iter().for_each(&mut push)
            }
            NodeData::ParenthesizedType(d) => push(d.type_node),
            NodeData::TypeLiteral(d) => d.members.iter().for_each(&mut push),
            NodeData::LiteralType(d) => push(d.literal),
            NodeData::FunctionType(d) => {
                d.type_parameters.iter().for_each(&mut push);
                d.parameters.iter().for_each(&mut push);
                push(d.return_type);
            }
            NodeData::TupleType(d) => d.elements.iter().for_each(&mut push),
            NodeData::TypeOperator(d) => push(d.type_node),
            NodeData::TypeQuery(d) => push(d.expr_name),
            NodeData::PrefixUnaryExpression(d) => push(d.operand),
            NodeData::TypeAssertion(d) => {
                push(d.type_node);
                push(d.expression);
            }
            NodeData::AsExpression(d) => {
                push(d.expression);
                push(d.type_node);
            }
            NodeData::ParenthesizedExpression(d) => push(d.expression),
            NodeData::PropertyAccessExpression(d) => {
                push(d.expression);
                push(d.name);
            }
            NodeData::Identifier(_)
            | NodeData::StringLiteral(_)
            | NodeData::NumericLiteral(_)
            | NodeData::TrueLiteral
            | NodeData::FalseLiteral
            | NodeData::NullLiteral
            | NodeData::EmptyStatement
            | NodeData::KeywordType(_)
            | NodeData::UnparsedExpression => {}
        }
        out
    }
}

const fn keyword_type_name(kind: SyntaxKind) -> &'static str {
    match kind {
        SyntaxKind::AnyKeyword => "AnyKeyword",
        SyntaxKind::BigIntKeyword => "BigIntKeyword",
        SyntaxKind::BooleanKeyword => "BooleanKeyword",
        SyntaxKind::NeverKeyword => "NeverKeyword",
        SyntaxKind::NullKeyword => "NullKeyword",
        SyntaxKind::NumberKeyword => "NumberKeyword",
        SyntaxKind::ObjectKeyword => "ObjectKeyword",
        SyntaxKind::StringKeyword => "StringKeyword",
        SyntaxKind::SymbolKeyword => "SymbolKeyword",
        SyntaxKind::UndefinedKeyword => "UndefinedKeyword",
        SyntaxKind::UnknownKeyword => "UnknownKeyword",
        SyntaxKind::VoidKeyword => "VoidKeyword",
        _ => "KeywordType",
    }
}

/// Node storage for one parsed file.
#[derive(Clone, Debug, Default, Serialize)]
pub struct NodeArena {
    pub(crate) nodes: Vec<Node>,
}
