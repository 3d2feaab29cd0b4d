//! Walks declarations into a [`TypeGraph`].
//!
//! The walk is memoized by declaration identity. Named declarations
//! (interfaces, type aliases, enums) are registered in the graph before
//! their children are walked, so a declaration that refers back to itself
//! finds its own entry instead of recursing forever.

use crate::directives::parse_directive_arguments;
use crate::types::{
    AliasNode, Directive, EnumNode, GRAPHQL_TAG, InterfaceNode, MethodNode, PropertyNode,
    TypeGraph, TypeId, TypeNode,
};
use anyhow::{Context, Result, anyhow, bail};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};
use tsgql_binder::{FileId, NodeRef, Program, SymbolId, TypeChecker, symbol_flags};
use tsgql_parser::{NodeData, NodeIndex};
use tsgql_parser::parser::node::{
    EnumData, InterfaceData, MethodSignatureData, PropertySignatureData, TypeAliasData,
};
use tsgql_scanner::{ScannerState, SyntaxKind};

/// Name of the builtin scalar that `Date` references become.
const DATE_SCALAR: &str = "Date";

pub struct Collector<'a> {
    program: &'a Program,
    graph: TypeGraph,
    /// Declaration or type node to the graph node it produced.
    node_map: FxHashMap<NodeRef, TypeId>,
    /// Symbol (and its first declaration) each named entry belongs to.
    owners: FxHashMap<String, (SymbolId, NodeRef)>,
}

impl<'a> Collector<'a> {
    pub fn new(program: &'a Program) -> Self {
        Collector {
            program,
            graph: TypeGraph::default(),
            node_map: FxHashMap::default(),
            owners: FxHashMap::default(),
        }
    }

    pub fn graph(&self) -> &TypeGraph {
        &self.graph
    }

    pub fn into_graph(self) -> TypeGraph {
        self.graph
    }

    /// Walk a root declaration. Roots are always concrete.
    #[tracing::instrument(level = "debug", skip(self), fields(at = %self.program.location(node)))]
    pub fn add_root_node(&mut self, node: NodeRef) -> Result<TypeId> {
        let id = self.walk(node)?.ok_or_else(|| {
            anyhow!(
                "{} cannot be a schema root",
                self.program.location(node)
            )
        })?;
        if let TypeNode::Interface(interface) = self.graph.arena.get_mut(id) {
            interface.concrete = true;
        }
        Ok(id)
    }

    /// Replace members of the interface registered as `target_name` with
    /// the members of the interface declared at `node`.
    ///
    /// Members the override leaves alone keep their order and come first.
    /// Members the override adds follow, then the members it replaces, each
    /// group in override order.
    pub fn merge_overrides(&mut self, node: NodeRef, target_name: &str) -> Result<()> {
        let Some(&target) = self.graph.types.get(target_name) else {
            bail!("Cannot override '{target_name}' - it was never included in the schema");
        };
        let program = self.program;
        let Some(NodeData::InterfaceDeclaration(decl)) = program.get_node_data(node) else {
            bail!(
                "Only interfaces can override '{target_name}' ({})",
                program.location(node)
            );
        };

        let mut overrides = Vec::with_capacity(decl.members.len());
        for member in decl.members.iter() {
            let id = self
                .walk_type(NodeRef::new(node.file, member))
                .with_context(|| format!("while walking override of '{target_name}'"))?;
            overrides.push(id);
        }
        let overridden: Vec<String> = overrides
            .iter()
            .filter_map(|&id| self.graph.node(id).member_name().map(str::to_string))
            .collect();

        let existing: Vec<TypeId> = match self.graph.node(target) {
            TypeNode::Interface(interface) => interface.members.clone(),
            other => bail!(
                "Cannot override '{target_name}' - it is {} {}, not an interface",
                article(other.kind_name()),
                other.kind_name()
            ),
        };
        let existing_names: Vec<&str> = existing
            .iter()
            .filter_map(|&id| self.graph.node(id).member_name())
            .collect();
        let replaces = |id: TypeId| {
            self.graph
                .node(id)
                .member_name()
                .is_some_and(|name| existing_names.contains(&name))
        };

        let mut members: Vec<TypeId> = existing
            .iter()
            .copied()
            .filter(|&member| {
                self.graph
                    .node(member)
                    .member_name()
                    .is_none_or(|name| !overridden.iter().any(|o| o == name))
            })
            .collect();
        members.extend(overrides.iter().copied().filter(|&id| !replaces(id)));
        members.extend(overrides.iter().copied().filter(|&id| replaces(id)));

        if let TypeNode::Interface(interface) = self.graph.arena.get_mut(target) {
            interface.members = members;
        }
        debug!(target = target_name, "merged overrides");
        Ok(())
    }

    /// Walk any declaration or type node. Namespaces and variables produce
    /// no node.
    pub fn walk(&mut self, node: NodeRef) -> Result<Option<TypeId>> {
        if let Some(&id) = self.node_map.get(&node) {
            return Ok(Some(id));
        }
        let program = self.program;
        let Some(data) = program.get_node_data(node) else {
            bail!("No syntax node at {}", program.location(node));
        };
        let file = node.file;

        let id = match data {
            NodeData::InterfaceDeclaration(decl) => self.walk_interface_declaration(node, decl)?,
            NodeData::MethodSignature(method) => self.walk_method_signature(node, method)?,
            NodeData::PropertySignature(property) => {
                self.walk_property_signature(node, property)?
            }
            NodeData::TypeReference(_) => self.walk_type_reference(node)?,
            NodeData::TypeAliasDeclaration(alias) => {
                self.walk_type_alias_declaration(node, alias)?
            }
            NodeData::EnumDeclaration(decl) => self.walk_enum_declaration(node, decl)?,
            NodeData::TypeLiteral(literal) => {
                let mut members = Vec::with_capacity(literal.members.len());
                for member in literal.members.iter() {
                    members.push(self.walk_type(NodeRef::new(file, member))?);
                }
                self.graph.arena.alloc(TypeNode::LiteralObject { members })
            }
            NodeData::ParenthesizedType(inner) => {
                self.walk_type(NodeRef::new(file, inner.type_node))?
            }
            NodeData::ArrayType(array) => {
                let element = self.walk_type(NodeRef::new(file, array.element_type))?;
                self.array_of(element)
            }
            NodeData::UnionType(union) => {
                let mut types = Vec::with_capacity(union.types.len());
                for member in union.types.iter() {
                    types.push(self.walk_type(NodeRef::new(file, member))?);
                }
                self.union_of(types)
            }
            NodeData::LiteralType(literal) => {
                match program.get_node_data(NodeRef::new(file, literal.literal)) {
                    Some(NodeData::StringLiteral(text)) => {
                        self.graph.arena.alloc(TypeNode::StringLiteral {
                            value: text.text.clone(),
                        })
                    }
                    _ => return Err(self.unsupported(node, data)),
                }
            }
            NodeData::KeywordType(keyword) => match keyword {
                SyntaxKind::StringKeyword => self.not_null_leaf(TypeNode::String),
                SyntaxKind::NumberKeyword => self.not_null_leaf(TypeNode::Number),
                SyntaxKind::BooleanKeyword => self.not_null_leaf(TypeNode::Boolean),
                SyntaxKind::AnyKeyword => self.graph.arena.alloc(TypeNode::Any),
                SyntaxKind::NullKeyword => self.graph.arena.alloc(TypeNode::Null),
                SyntaxKind::UndefinedKeyword => self.graph.arena.alloc(TypeNode::Undefined),
                _ => return Err(self.unsupported(node, data)),
            },
            NodeData::ModuleDeclaration(_)
            | NodeData::VariableStatement(_)
            | NodeData::VariableDeclaration(_) => return Ok(None),
            NodeData::SourceFile(_)
            | NodeData::Identifier(_)
            | NodeData::QualifiedName(_)
            | NodeData::StringLiteral(_)
            | NodeData::NumericLiteral(_)
            | NodeData::TrueLiteral
            | NodeData::FalseLiteral
            | NodeData::NullLiteral
            | NodeData::EnumMember(_)
            | NodeData::ModuleBlock(_)
            | NodeData::ClassDeclaration(_)
            | NodeData::FunctionDeclaration(_)
            | NodeData::ImportDeclaration(_)
            | NodeData::ImportSpecifier(_)
            | NodeData::ExportDeclaration(_)
            | NodeData::ExportSpecifier(_)
            | NodeData::EmptyStatement
            | NodeData::IndexSignature(_)
            | NodeData::CallSignature(_)
            | NodeData::ConstructSignature(_)
            | NodeData::Parameter(_)
            | NodeData::TypeParameter(_)
            | NodeData::HeritageClause(_)
            | NodeData::ExpressionWithTypeArguments(_)
            | NodeData::IntersectionType(_)
            | NodeData::FunctionType(_)
            | NodeData::TupleType(_)
            | NodeData::TypeOperator(_)
            | NodeData::TypeQuery(_)
            | NodeData::PrefixUnaryExpression(_)
            | NodeData::TypeAssertion(_)
            | NodeData::AsExpression(_)
            | NodeData::ParenthesizedExpression(_)
            | NodeData::PropertyAccessExpression(_)
            | NodeData::UnparsedExpression => return Err(self.unsupported(node, data)),
        };

        self.node_map.insert(node, id);
        Ok(Some(id))
    }

    /// Walk a node that must produce a type.
    fn walk_type(&mut self, node: NodeRef) -> Result<TypeId> {
        match self.walk(node)? {
            Some(id) => Ok(id),
            None => {
                let kind = self
                    .program
                    .get_node_data(node)
                    .map_or("node", NodeData::kind_name);
                bail!(
                    "Expected a type, found {kind} at {}",
                    self.program.location(node)
                )
            }
        }
    }

    fn unsupported(&self, node: NodeRef, data: &NodeData) -> anyhow::Error {
        anyhow!(
            "Don't know how to handle {} nodes ({})",
            data.kind_name(),
            self.program.location(node)
        )
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn walk_interface_declaration(&mut self, node: NodeRef, decl: &InterfaceData) -> Result<TypeId> {
        let program = self.program;
        if program.arena(node.file).get_identifier_text(decl.name) == Some(DATE_SCALAR) {
            return Ok(self.date_reference());
        }
        let symbol = program.get_symbol_at_location(node)?;
        let name = self.qualified_name(symbol);
        self.walk_interface_body(node, decl, symbol, &name)
            .with_context(|| format!("while walking interface '{name}'"))
    }

    fn walk_interface_body(
        &mut self,
        node: NodeRef,
        decl: &InterfaceData,
        symbol: SymbolId,
        name: &str,
    ) -> Result<TypeId> {
        let program = self.program;
        let id = match self.owned_entry(name, symbol, node)? {
            // Another declaration of a merged interface: append to it.
            Some(existing) if matches!(self.graph.node(existing), TypeNode::Interface(_)) => {
                existing
            }
            Some(existing) => return Ok(existing),
            None => self.register_declaration(
                name,
                (symbol, node),
                TypeNode::Interface(InterfaceNode {
                    documentation: program.get_jsdoc(node),
                    ..InterfaceNode::default()
                }),
            ),
        };
        self.node_map.insert(node, id);

        let arena = program.arena(node.file);
        let mut inherits = Vec::new();
        for clause in decl.heritage_clauses.iter() {
            let Some(NodeData::HeritageClause(heritage)) = arena.get_data(clause) else {
                continue;
            };
            for expression in heritage.types.iter() {
                let symbol = program.get_symbol_at_location(NodeRef::new(node.file, expression))?;
                let symbol = program.get_aliased_symbol(symbol)?;
                self.walk_symbol(symbol)?;
                inherits.push(self.qualified_name(symbol));
            }
        }

        let mut members = Vec::with_capacity(decl.members.len());
        for member in decl.members.iter() {
            members.push(self.walk_type(NodeRef::new(node.file, member))?);
        }

        if let TypeNode::Interface(interface) = self.graph.arena.get_mut(id) {
            interface.inherits.extend(inherits);
            interface.members.extend(members);
            if interface.documentation.is_none() {
                interface.documentation = program.get_jsdoc(node);
            }
        }
        trace!(name, "walked interface");
        Ok(id)
    }

    fn walk_type_alias_declaration(&mut self, node: NodeRef, alias: &TypeAliasData) -> Result<TypeId> {
        let symbol = self.program.get_symbol_at_location(node)?;
        let name = self.qualified_name(symbol);
        if let Some(existing) = self.owned_entry(&name, symbol, node)? {
            return Ok(existing);
        }
        // Placeholder until the target is walked.
        let id = self.register_declaration(&name, (symbol, node), TypeNode::Any);
        self.node_map.insert(node, id);

        let target = self
            .walk_type(NodeRef::new(node.file, alias.type_node))
            .with_context(|| format!("while walking type alias '{name}'"))?;
        self.graph.arena.set(
            id,
            TypeNode::Alias(AliasNode {
                target,
                documentation: self.program.get_jsdoc(node),
            }),
        );
        Ok(id)
    }

    fn walk_enum_declaration(&mut self, node: NodeRef, decl: &EnumData) -> Result<TypeId> {
        let symbol = self.program.get_symbol_at_location(node)?;
        let name = self.qualified_name(symbol);
        let values = decl
            .members
            .iter()
            .map(|member| self.enum_member_value(node.file, member))
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("while walking enum '{name}'"))?;

        match self.owned_entry(&name, symbol, node)? {
            Some(existing) => {
                if let TypeNode::Enum(merged) = self.graph.arena.get_mut(existing) {
                    merged.values.extend(values);
                }
                Ok(existing)
            }
            None => Ok(self.register_declaration(
                &name,
                (symbol, node),
                TypeNode::Enum(EnumNode {
                    values,
                    documentation: self.program.get_jsdoc(node),
                }),
            )),
        }
    }

    /// An enum member's value: the contents of a string initializer, the
    /// last operand of a skipped expression, otherwise (no initializer,
    /// numeric initializer) the member's name.
    fn enum_member_value(&self, file: FileId, member: NodeIndex) -> Result<String> {
        let arena = self.program.arena(file);
        let Some(NodeData::EnumMember(data)) = arena.get_data(member) else {
            bail!(
                "Expected an enum member at {}",
                self.program.location(NodeRef::new(file, member))
            );
        };
        let name = arena.get_property_name_text(data.name).unwrap_or_default();
        if data.initializer.is_none() {
            return Ok(name.to_string());
        }
        Ok(self
            .initializer_value(file, data.initializer)
            .unwrap_or_else(|| name.to_string()))
    }

    fn initializer_value(&self, file: FileId, expression: NodeIndex) -> Option<String> {
        let node = NodeRef::new(file, expression);
        match self.program.get_node_data(node)? {
            NodeData::NumericLiteral(_) | NodeData::PrefixUnaryExpression(_) => None,
            NodeData::StringLiteral(literal) => Some(literal.text.clone()),
            NodeData::TypeAssertion(assertion) | NodeData::AsExpression(assertion) => {
                self.initializer_value(file, assertion.expression)
            }
            NodeData::ParenthesizedExpression(inner) => {
                self.initializer_value(file, inner.expression)
            }
            NodeData::PropertyAccessExpression(access) => self
                .program
                .arena(file)
                .get_identifier_text(access.name)
                .map(str::to_string),
            _ => Some(last_operand(self.program.get_node_text(node)).to_string()),
        }
    }

    // =========================================================================
    // Members
    // =========================================================================

    fn walk_method_signature(&mut self, node: NodeRef, method: &MethodSignatureData) -> Result<TypeId> {
        let name = self.member_name(node.file, method.name);
        self.walk_method_body(node, method, &name)
            .with_context(|| format!("while walking method '{name}'"))
    }

    fn walk_method_body(&mut self, node: NodeRef, method: &MethodSignatureData, name: &str) -> Result<TypeId> {
        let program = self.program;
        let arena = program.arena(node.file);

        let mut parameters = IndexMap::new();
        for param in method.parameters.iter() {
            let Some(NodeData::Parameter(data)) = arena.get_data(param) else {
                continue;
            };
            let param_name = self.member_name(node.file, data.name);
            let mut signature = self
                .walk_annotation(node.file, data.type_annotation)
                .with_context(|| format!("in parameter '{param_name}'"))?;
            if data.question_token {
                signature = self.strip_not_null(signature);
            }
            parameters.insert(param_name, signature);
        }

        let returns = self
            .walk_annotation(node.file, method.return_type)
            .context("in return type")?;
        let directives = self.directives_for(node)?;

        Ok(self.graph.arena.alloc(TypeNode::Method(MethodNode {
            name: name.to_string(),
            parameters,
            returns,
            directives,
        })))
    }

    fn walk_property_signature(&mut self, node: NodeRef, property: &PropertySignatureData) -> Result<TypeId> {
        let name = self.member_name(node.file, property.name);
        let signature = self
            .walk_annotation(node.file, property.type_annotation)
            .with_context(|| format!("while walking property '{name}'"))?;

        // Optional properties are nullable whatever their type says.
        let signature = if property.question_token {
            self.strip_not_null(signature)
        } else {
            signature
        };
        Ok(self
            .graph
            .arena
            .alloc(TypeNode::Property(PropertyNode { name, signature })))
    }

    fn walk_annotation(&mut self, file: FileId, annotation: NodeIndex) -> Result<TypeId> {
        if annotation.is_none() {
            bail!("Missing type annotation");
        }
        self.walk_type(NodeRef::new(file, annotation))
    }

    fn member_name(&self, file: FileId, name: NodeIndex) -> String {
        let arena = self.program.arena(file);
        match arena.get_property_name_text(name) {
            Some(text) => text.to_string(),
            None => self
                .program
                .get_node_text(NodeRef::new(file, name))
                .to_string(),
        }
    }

    /// Directives declared after a `@graphql Directives` tag.
    fn directives_for(&self, node: NodeRef) -> Result<Vec<Directive>> {
        let Some(doc) = self.program.get_jsdoc(node) else {
            return Ok(Vec::new());
        };
        let Some(start) = doc
            .tags
            .iter()
            .position(|tag| tag.title == GRAPHQL_TAG && tag.description_or_empty() == "Directives")
        else {
            return Ok(Vec::new());
        };

        let mut directives: Vec<Directive> = Vec::new();
        for tag in &doc.tags[start + 1..] {
            if directives.iter().any(|d| d.name == tag.title) {
                bail!("Directive @{} is declared more than once", tag.title);
            }
            let params = parse_directive_arguments(tag.description_or_empty())
                .with_context(|| format!("while parsing directive @{}", tag.title))?;
            directives.push(Directive {
                name: tag.title.clone(),
                params,
            });
        }
        Ok(directives)
    }

    // =========================================================================
    // References
    // =========================================================================

    fn walk_type_reference(&mut self, node: NodeRef) -> Result<TypeId> {
        let program = self.program;
        let Some(NodeData::TypeReference(reference)) = program.get_node_data(node) else {
            bail!("Expected a type reference at {}", program.location(node));
        };
        let symbol = program.get_symbol_at_location(node)?;
        let symbol = program.get_aliased_symbol(symbol)?;

        if program.get_symbol_flags(symbol) & symbol_flags::TYPE_PARAMETER != 0 {
            bail!(
                "Type parameter '{}' cannot be used as a GraphQL type ({})",
                program.symbol_to_string(symbol),
                program.location(node)
            );
        }

        if self.is_lib_array(symbol) {
            let Some(element) = reference.type_arguments.iter().next() else {
                bail!(
                    "{} needs a type argument ({})",
                    program.symbol_to_string(symbol),
                    program.location(node)
                );
            };
            let element = self.walk_type(NodeRef::new(node.file, element))?;
            return Ok(self.array_of(element));
        }

        let target = self.reference_for_symbol(symbol)?;
        Ok(self.not_null(target))
    }

    /// A `Reference` to `symbol`, walking it first so the graph closes over
    /// it. A referenced interface becomes concrete.
    fn reference_for_symbol(&mut self, symbol: SymbolId) -> Result<TypeId> {
        self.walk_symbol(symbol)?;
        let name = self.qualified_name(symbol);
        if let Some(&id) = self.graph.types.get(&name)
            && let TypeNode::Interface(interface) = self.graph.arena.get_mut(id)
        {
            interface.concrete = true;
        }
        Ok(self.graph.arena.alloc(TypeNode::Reference { target: name }))
    }

    fn walk_symbol(&mut self, symbol: SymbolId) -> Result<()> {
        let program = self.program;
        for &declaration in program.get_declarations(symbol) {
            self.walk(declaration)?;
        }
        Ok(())
    }

    /// `Array<T>` and `ReadonlyArray<T>` from the default lib.
    fn is_lib_array(&self, symbol: SymbolId) -> bool {
        let program = self.program;
        matches!(
            program.symbol_to_string(symbol).as_str(),
            "Array" | "ReadonlyArray"
        ) && program
            .get_declarations(symbol)
            .first()
            .is_some_and(|decl| program.is_default_lib(decl.file))
    }

    /// `Date` is a builtin scalar rather than a structural interface.
    fn date_reference(&mut self) -> TypeId {
        if !self.graph.types.contains_key(DATE_SCALAR) {
            let scalar = self.graph.arena.alloc(TypeNode::Any);
            self.register(
                DATE_SCALAR,
                TypeNode::Alias(AliasNode {
                    target: scalar,
                    documentation: None,
                }),
            );
        }
        self.graph.arena.alloc(TypeNode::Reference {
            target: DATE_SCALAR.to_string(),
        })
    }

    // =========================================================================
    // Names
    // =========================================================================

    /// Dot-joined names of a symbol and its enclosing namespaces, stopping
    /// at the containing module.
    pub fn qualified_name(&self, symbol: SymbolId) -> String {
        let program = self.program;
        let mut parts = vec![program.symbol_to_string(symbol)];
        let mut parent = program.get_parent_symbol(symbol);
        while let Some(current) = parent {
            if program.is_external_module(current) {
                break;
            }
            parts.push(program.symbol_to_string(current));
            parent = program.get_parent_symbol(current);
        }
        parts.reverse();
        parts.join(".")
    }

    pub fn declaration_qualified_name(&self, node: NodeRef) -> Result<String> {
        let symbol = self.program.get_symbol_at_location(node)?;
        Ok(self.qualified_name(symbol))
    }

    // =========================================================================
    // Node construction
    // =========================================================================

    fn register(&mut self, name: &str, node: TypeNode) -> TypeId {
        let id = self.graph.arena.alloc(node);
        self.graph.types.insert(name.to_string(), id);
        debug!(name, "registered type");
        id
    }

    /// Like [`Self::register`], remembering which symbol owns the name.
    fn register_declaration(
        &mut self,
        name: &str,
        owner: (SymbolId, NodeRef),
        node: TypeNode,
    ) -> TypeId {
        self.owners.insert(name.to_string(), owner);
        self.register(name, node)
    }

    /// The entry `symbol` already registered under `name`. Qualified names
    /// stop at module scope, so two modules can both declare `User`; a
    /// name taken by another symbol is an error naming both declarations.
    fn owned_entry(&self, name: &str, symbol: SymbolId, node: NodeRef) -> Result<Option<TypeId>> {
        let Some(&existing) = self.graph.types.get(name) else {
            return Ok(None);
        };
        match self.owners.get(name) {
            Some(&(owner, first)) if owner != symbol => bail!(
                "'{name}' is declared by two unrelated declarations: {} and {}",
                self.program.location(first),
                self.program.location(node)
            ),
            _ => Ok(Some(existing)),
        }
    }

    fn not_null(&mut self, node: TypeId) -> TypeId {
        self.graph.arena.alloc(TypeNode::NotNull { node })
    }

    fn not_null_leaf(&mut self, leaf: TypeNode) -> TypeId {
        let leaf = self.graph.arena.alloc(leaf);
        self.not_null(leaf)
    }

    fn array_of(&mut self, element: TypeId) -> TypeId {
        let array = self.graph.arena.alloc(TypeNode::Array {
            elements: vec![element],
        });
        self.not_null(array)
    }

    fn strip_not_null(&self, id: TypeId) -> TypeId {
        match self.graph.node(id) {
            TypeNode::NotNull { node } => *node,
            _ => id,
        }
    }

    /// `null` and `undefined` members make the union nullable: they are
    /// dropped and the remaining members lose their `NotNull`.
    fn union_of(&mut self, types: Vec<TypeId>) -> TypeId {
        let is_nullish =
            |node: &TypeNode| matches!(node, TypeNode::Null | TypeNode::Undefined);
        let nullable = types.iter().any(|&id| is_nullish(self.graph.node(id)));
        let types = if nullable {
            types
                .into_iter()
                .filter(|&id| !is_nullish(self.graph.node(id)))
                .map(|id| self.strip_not_null(id))
                .collect()
        } else {
            types
        };
        self.graph.arena.alloc(TypeNode::Union { types })
    }
}

fn article(word: &str) -> &'static str {
    match word.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

/// The right-hand operand of an initializer the parser skipped:
/// `1 << 2` gives `2`, `a ? b : c` gives `c`. Text with no top-level
/// operator comes back whole.
fn last_operand(text: &str) -> &str {
    let mut scanner = ScannerState::new(text.to_string());
    let mut depth = 0usize;
    let mut after_operand = false;
    // End of the operator run being scanned, so `<<` or `!==` count once.
    let mut run_end = None;
    let mut start = 0;
    loop {
        let kind = scanner.scan();
        match kind {
            SyntaxKind::EndOfFileToken => break,
            SyntaxKind::OpenBraceToken
            | SyntaxKind::OpenParenToken
            | SyntaxKind::OpenBracketToken => {
                depth += 1;
                after_operand = false;
                run_end = None;
            }
            SyntaxKind::CloseBraceToken
            | SyntaxKind::CloseParenToken
            | SyntaxKind::CloseBracketToken => {
                depth = depth.saturating_sub(1);
                after_operand = true;
                run_end = None;
            }
            _ if depth == 0 && is_binary_operator(kind) => {
                let continues_run = run_end == Some(scanner.get_token_start());
                if after_operand || continues_run {
                    run_end = Some(scanner.get_token_end());
                    start = scanner.get_token_end() as usize;
                }
                after_operand = false;
            }
            _ => {
                after_operand = true;
                run_end = None;
            }
        }
    }
    match text.get(start..).map(str::trim) {
        Some(operand) if !operand.is_empty() => operand,
        _ => text.trim(),
    }
}

fn is_binary_operator(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::LessThanToken
            | SyntaxKind::GreaterThanToken
            | SyntaxKind::EqualsToken
            | SyntaxKind::PlusToken
            | SyntaxKind::MinusToken
            | SyntaxKind::AsteriskToken
            | SyntaxKind::SlashToken
            | SyntaxKind::AmpersandToken
            | SyntaxKind::BarToken
            | SyntaxKind::QuestionToken
            | SyntaxKind::ColonToken
            | SyntaxKind::ExclamationToken
            | SyntaxKind::OtherPunctuation
    )
}

#[cfg(test)]
mod tests {
    use super::last_operand;

    #[test]
    fn test_last_operand_of_binary_expressions() {
        assert_eq!(last_operand("1 << 2"), "2");
        assert_eq!(last_operand("A | B | C"), "C");
        assert_eq!(last_operand("a !== b"), "b");
        assert_eq!(last_operand("x ? 'yes' : 'no'"), "'no'");
    }

    #[test]
    fn test_last_operand_keeps_prefixes_and_brackets() {
        assert_eq!(last_operand("1 * -2"), "-2");
        assert_eq!(last_operand("f(a + b)"), "f(a + b)");
        assert_eq!(last_operand("base + (a | b)"), "(a | b)");
        assert_eq!(last_operand("  ~mask "), "~mask");
    }
}
