//! Token kinds produced by the scanner.

use serde::Serialize;

/// Token kinds for the declaration subset of TypeScript.
///
/// Keywords are split into reserved words (never identifiers) and
/// contextual keywords (identifiers outside the positions that give them
/// meaning). The parser asks [`SyntaxKind::is_identifier_or_keyword`] when
/// either is acceptable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[repr(u16)]
pub enum SyntaxKind {
    Unknown,
    EndOfFileToken,

    // Literals
    NumericLiteral,
    StringLiteral,
    Identifier,

    // Punctuation
    OpenBraceToken,
    CloseBraceToken,
    OpenParenToken,
    CloseParenToken,
    OpenBracketToken,
    CloseBracketToken,
    DotToken,
    DotDotDotToken,
    SemicolonToken,
    CommaToken,
    LessThanToken,
    GreaterThanToken,
    EqualsToken,
    EqualsGreaterThanToken,
    PlusToken,
    MinusToken,
    AsteriskToken,
    SlashToken,
    AmpersandToken,
    BarToken,
    QuestionToken,
    ColonToken,
    ExclamationToken,
    AtToken,
    BacktickToken,
    OtherPunctuation,

    // Reserved words
    ClassKeyword,
    ConstKeyword,
    DefaultKeyword,
    EnumKeyword,
    ExportKeyword,
    ExtendsKeyword,
    FalseKeyword,
    FunctionKeyword,
    ImportKeyword,
    NullKeyword,
    TrueKeyword,
    TypeofKeyword,
    VarKeyword,
    VoidKeyword,

    // Contextual keywords
    AbstractKeyword,
    AnyKeyword,
    AsKeyword,
    BigIntKeyword,
    BooleanKeyword,
    DeclareKeyword,
    FromKeyword,
    GlobalKeyword,
    ImplementsKeyword,
    InterfaceKeyword,
    KeyOfKeyword,
    LetKeyword,
    ModuleKeyword,
    NamespaceKeyword,
    NeverKeyword,
    NumberKeyword,
    ObjectKeyword,
    ReadonlyKeyword,
    StringKeyword,
    SymbolKeyword,
    TypeKeyword,
    UndefinedKeyword,
    UniqueKeyword,
    UnknownKeyword,
}

impl SyntaxKind {
    pub const fn is_reserved_word(self) -> bool {
        (self as u16) >= (SyntaxKind::ClassKeyword as u16)
            && (self as u16) <= (SyntaxKind::VoidKeyword as u16)
    }

    pub const fn is_contextual_keyword(self) -> bool {
        (self as u16) >= (SyntaxKind::AbstractKeyword as u16)
            && (self as u16) <= (SyntaxKind::UnknownKeyword as u16)
    }

    pub const fn is_keyword(self) -> bool {
        self.is_reserved_word() || self.is_contextual_keyword()
    }

    /// Identifiers plus contextual keywords: anything usable as a binding name.
    pub const fn is_identifier(self) -> bool {
        matches!(self, SyntaxKind::Identifier) || self.is_contextual_keyword()
    }

    /// Anything usable as a property name (`interface X { type: string }`).
    pub const fn is_identifier_or_keyword(self) -> bool {
        matches!(self, SyntaxKind::Identifier) || self.is_keyword()
    }

    /// The keyword types that may appear in type position.
    pub const fn is_type_keyword(self) -> bool {
        matches!(
            self,
            SyntaxKind::AnyKeyword
                | SyntaxKind::BigIntKeyword
                | SyntaxKind::BooleanKeyword
                | SyntaxKind::NeverKeyword
                | SyntaxKind::NullKeyword
                | SyntaxKind::NumberKeyword
                | SyntaxKind::ObjectKeyword
                | SyntaxKind::StringKeyword
                | SyntaxKind::SymbolKeyword
                | SyntaxKind::UndefinedKeyword
                | SyntaxKind::UnknownKeyword
                | SyntaxKind::VoidKeyword
        )
    }

    /// Source text of a punctuation or keyword token, for diagnostics.
    pub const fn text(self) -> &'static str {
        match self {
            SyntaxKind::Unknown => "unknown",
            SyntaxKind::EndOfFileToken => "end of file",
            SyntaxKind::NumericLiteral => "numeric literal",
            SyntaxKind::StringLiteral => "string literal",
            SyntaxKind::Identifier => "identifier",
            SyntaxKind::OpenBraceToken => "{",
            SyntaxKind::CloseBraceToken => "}",
            SyntaxKind::OpenParenToken => "(",
            SyntaxKind::CloseParenToken => ")",
            SyntaxKind::OpenBracketToken => "[",
            SyntaxKind::CloseBracketToken => "]",
            SyntaxKind::DotToken => ".",
            SyntaxKind::DotDotDotToken => "...",
            SyntaxKind::SemicolonToken => ";",
            SyntaxKind::CommaToken => ",",
            SyntaxKind::LessThanToken => "<",
            SyntaxKind::GreaterThanToken => ">",
            SyntaxKind::EqualsToken => "=",
            SyntaxKind::EqualsGreaterThanToken => "=>",
            SyntaxKind::PlusToken => "+",
            SyntaxKind::MinusToken => "-",
            SyntaxKind::AsteriskToken => "*",
            SyntaxKind::SlashToken => "/",
            SyntaxKind::AmpersandToken => "&",
            SyntaxKind::BarToken => "|",
            SyntaxKind::QuestionToken => "?",
            SyntaxKind::ColonToken => ":",
            SyntaxKind::ExclamationToken => "!",
            SyntaxKind::AtToken => "@",
            SyntaxKind::BacktickToken => "`",
            SyntaxKind::OtherPunctuation => "punctuation",
            SyntaxKind::ClassKeyword => "class",
            SyntaxKind::ConstKeyword => "const",
            SyntaxKind::DefaultKeyword => "default",
            SyntaxKind::EnumKeyword => "enum",
            SyntaxKind::ExportKeyword => "export",
            SyntaxKind::ExtendsKeyword => "extends",
            SyntaxKind::FalseKeyword => "false",
            SyntaxKind::FunctionKeyword => "function",
            SyntaxKind::ImportKeyword => "import",
            SyntaxKind::NullKeyword => "null",
            SyntaxKind::TrueKeyword => "true",
            SyntaxKind::TypeofKeyword => "typeof",
            SyntaxKind::VarKeyword => "var",
            SyntaxKind::VoidKeyword => "void",
            SyntaxKind::AbstractKeyword => "abstract",
            SyntaxKind::AnyKeyword => "any",
            SyntaxKind::AsKeyword => "as",
            SyntaxKind::BigIntKeyword => "bigint",
            SyntaxKind::BooleanKeyword => "boolean",
            SyntaxKind::DeclareKeyword => "declare",
            SyntaxKind::FromKeyword => "from",
            SyntaxKind::GlobalKeyword => "global",
            SyntaxKind::ImplementsKeyword => "implements",
            SyntaxKind::InterfaceKeyword => "interface",
            SyntaxKind::KeyOfKeyword => "keyof",
            SyntaxKind::LetKeyword => "let",
            SyntaxKind::ModuleKeyword => "module",
            SyntaxKind::NamespaceKeyword => "namespace",
            SyntaxKind::NeverKeyword => "never",
            SyntaxKind::NumberKeyword => "number",
            SyntaxKind::ObjectKeyword => "object",
            SyntaxKind::ReadonlyKeyword => "readonly",
            SyntaxKind::StringKeyword => "string",
            SyntaxKind::SymbolKeyword => "symbol",
            SyntaxKind::TypeKeyword => "type",
            SyntaxKind::UndefinedKeyword => "undefined",
            SyntaxKind::UniqueKeyword => "unique",
            SyntaxKind::UnknownKeyword => "unknown",
        }
    }
}

/// Map identifier text to its keyword kind, if it is one.
pub fn text_to_keyword(text: &str) -> Option<SyntaxKind> {
    let kind = match text {
        "class" => SyntaxKind::ClassKeyword,
        "const" => SyntaxKind::ConstKeyword,
        "default" => SyntaxKind::DefaultKeyword,
        "enum" => SyntaxKind::EnumKeyword,
        "export" => SyntaxKind::ExportKeyword,
        "extends" => SyntaxKind::ExtendsKeyword,
        "false" => SyntaxKind::FalseKeyword,
        "function" => SyntaxKind::FunctionKeyword,
        "import" => SyntaxKind::ImportKeyword,
        "null" => SyntaxKind::NullKeyword,
        "true" => SyntaxKind::TrueKeyword,
        "typeof" => SyntaxKind::TypeofKeyword,
        "var" => SyntaxKind::VarKeyword,
        "void" => SyntaxKind::VoidKeyword,
        "abstract" => SyntaxKind::AbstractKeyword,
        "any" => SyntaxKind::AnyKeyword,
        "as" => SyntaxKind::AsKeyword,
        "bigint" => SyntaxKind::BigIntKeyword,
        "boolean" => SyntaxKind::BooleanKeyword,
        "declare" => SyntaxKind::DeclareKeyword,
        "from" => SyntaxKind::FromKeyword,
        "global" => SyntaxKind::GlobalKeyword,
        "implements" => SyntaxKind::ImplementsKeyword,
        "interface" => SyntaxKind::InterfaceKeyword,
        "keyof" => SyntaxKind::KeyOfKeyword,
        "let" => SyntaxKind::LetKeyword,
        "module" => SyntaxKind::ModuleKeyword,
        "namespace" => SyntaxKind::NamespaceKeyword,
        "never" => SyntaxKind::NeverKeyword,
        "number" => SyntaxKind::NumberKeyword,
        "object" => SyntaxKind::ObjectKeyword,
        "readonly" => SyntaxKind::ReadonlyKeyword,
        "string" => SyntaxKind::StringKeyword,
        "symbol" => SyntaxKind::SymbolKeyword,
        "type" => SyntaxKind::TypeKeyword,
        "undefined" => SyntaxKind::UndefinedKeyword,
        "unique" => SyntaxKind::UniqueKeyword,
        "unknown" => SyntaxKind::UnknownKeyword,
        _ => return None,
    };
    Some(kind)
}
