//! The type graph: arena-allocated [`TypeNode`]s keyed by qualified name.
//!
//! Nodes refer to each other by [`TypeId`]. Named declarations refer to
//! other named declarations only through [`TypeNode::Reference`], which
//! holds the target's qualified name, so cycles in the source never become
//! cycles of ownership.

use indexmap::IndexMap;
use tsgql_common::JsDoc;

/// Title of the doc tags this tool reads (`@graphql ...`).
pub const GRAPHQL_TAG: &str = "graphql";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

#[derive(Clone, Debug, Default, PartialEq)]
pub struct InterfaceNode {
    /// Qualified names of the direct supertypes, in `extends` order.
    pub inherits: Vec<String>,
    /// Method and property nodes in declaration order.
    pub members: Vec<TypeId>,
    /// Referenced as a value type somewhere (or a root).
    pub concrete: bool,
    pub documentation: Option<JsDoc>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnumNode {
    pub values: Vec<String>,
    pub documentation: Option<JsDoc>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AliasNode {
    pub target: TypeId,
    pub documentation: Option<JsDoc>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MethodNode {
    pub name: String,
    pub parameters: IndexMap<String, TypeId>,
    pub returns: TypeId,
    pub directives: Vec<Directive>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PropertyNode {
    pub name: String,
    pub signature: TypeId,
}

/// `@name(arg: value, ...)` attached to a field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Directive {
    pub name: String,
    pub params: IndexMap<String, Value>,
}

/// A literal directive argument, kept as its raw source text
/// (string literals keep their quotes).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Value {
    pub text: String,
}

impl Value {
    pub fn new(text: impl Into<String>) -> Self {
        Value { text: text.into() }
    }
}

/// One node of the type graph. A node without a `NotNull` wrapper is
/// nullable.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeNode {
    Interface(InterfaceNode),
    Enum(EnumNode),
    Alias(AliasNode),
    LiteralObject { members: Vec<TypeId> },
    Union { types: Vec<TypeId> },
    Array { elements: Vec<TypeId> },
    /// A named type, resolved lazily through the graph by qualified name.
    Reference { target: String },
    NotNull { node: TypeId },
    String,
    Number,
    Boolean,
    Any,
    Null,
    Undefined,
    StringLiteral { value: String },
    Method(MethodNode),
    Property(PropertyNode),
}

impl TypeNode {
    /// Lowercase kind name used in error messages.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            TypeNode::Interface(_) => "interface",
            TypeNode::Enum(_) => "enum",
            TypeNode::Alias(_) => "alias",
            TypeNode::LiteralObject { .. } => "literal object",
            TypeNode::Union { .. } => "union",
            TypeNode::Array { .. } => "array",
            TypeNode::Reference { .. } => "reference",
            TypeNode::NotNull { .. } => "not null",
            TypeNode::String => "string",
            TypeNode::Number => "number",
            TypeNode::Boolean => "boolean",
            TypeNode::Any => "any",
            TypeNode::Null => "null",
            TypeNode::Undefined => "undefined",
            TypeNode::StringLiteral { .. } => "string literal",
            TypeNode::Method(_) => "method",
            TypeNode::Property(_) => "property",
        }
    }

    pub const fn is_primitive(&self) -> bool {
        matches!(
            self,
            TypeNode::String | TypeNode::Number | TypeNode::Boolean | TypeNode::Any
        )
    }

    /// Name of a method or property member.
    pub fn member_name(&self) -> Option<&str> {
        match self {
            TypeNode::Method(method) => Some(&method.name),
            TypeNode::Property(property) => Some(&property.name),
            _ => None,
        }
    }

    pub fn documentation(&self) -> Option<&JsDoc> {
        match self {
            TypeNode::Interface(node) => node.documentation.as_ref(),
            TypeNode::Enum(node) => node.documentation.as_ref(),
            TypeNode::Alias(node) => node.documentation.as_ref(),
            _ => None,
        }
    }
}

/// Storage for every node of a graph.
#[derive(Clone, Debug, Default)]
pub struct TypeArena {
    nodes: Vec<TypeNode>,
}

impl TypeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, node: TypeNode) -> TypeId {
        let id = TypeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// The node behind an id. Ids are only minted by [`TypeArena::alloc`],
    /// so every id handed out indexes a live node.
    pub fn get(&self, id: TypeId) -> &TypeNode {
        &self.nodes[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: TypeId) -> &mut TypeNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Replace a reserved node in place; every holder of `id` sees the
    /// new contents.
    pub fn set(&mut self, id: TypeId, node: TypeNode) {
        self.nodes[id.0 as usize] = node;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look through any `NotNull` wrappers.
    pub fn unwrap_not_null(&self, mut id: TypeId) -> TypeId {
        while let TypeNode::NotNull { node } = self.get(id) {
            id = *node;
        }
        id
    }
}

/// The collected graph: named top-level nodes in population order.
#[derive(Clone, Debug, Default)]
pub struct TypeGraph {
    pub arena: TypeArena,
    pub types: IndexMap<String, TypeId>,
}

impl TypeGraph {
    pub fn node(&self, id: TypeId) -> &TypeNode {
        self.arena.get(id)
    }

    /// The top-level node registered under a qualified name.
    pub fn get(&self, name: &str) -> Option<&TypeNode> {
        self.types.get(name).map(|&id| self.arena.get(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, TypeId)> + '_ {
        self.types.iter().map(|(name, id)| (name.as_str(), *id))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// The text after `keyword` in the first `@graphql keyword ...` tag.
///
/// The keyword is matched case-insensitively as a prefix of the tag's
/// description and must end at a word boundary.
pub fn find_graphql_tag<'a>(doc: &'a JsDoc, keyword: &str) -> Option<&'a str> {
    doc.tags
        .iter()
        .filter(|tag| tag.title == GRAPHQL_TAG)
        .find_map(|tag| {
            let description = tag.description_or_empty();
            let head = description.get(..keyword.len())?;
            let rest = &description[keyword.len()..];
            let at_boundary = rest
                .chars()
                .next()
                .is_none_or(|c| !(c.is_alphanumeric() || c == '_'));
            (head.eq_ignore_ascii_case(keyword) && at_boundary).then(|| rest.trim())
        })
}

/// Whether `doc` carries `@graphql keyword`.
pub fn has_graphql_tag(doc: Option<&JsDoc>, keyword: &str) -> bool {
    doc.is_some_and(|doc| find_graphql_tag(doc, keyword).is_some())
}
