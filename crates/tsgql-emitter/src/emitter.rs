//! GraphQL SDL emitter.
//!
//! Walks the named entries of a [`TypeGraph`] in population order and
//! renders each one as a schema declaration:
//!
//! ```typescript
//! /** @graphql schema */
//! export interface Schema { query: Query }
//! export interface Query { greeting: string }
//! ```
//!
//! becomes
//!
//! ```graphql
//! schema {
//!   query: Query
//! }
//!
//! type Query {
//!   greeting: String!
//! }
//! ```

use crate::renames::Renames;
use anyhow::{Context, Result, bail};
use rustc_hash::FxHashSet;
use tracing::debug;
use tsgql_collector::types::{find_graphql_tag, has_graphql_tag};
use tsgql_collector::{
    Directive, InterfaceNode, MethodNode, PropertyNode, TypeGraph, TypeId, TypeNode,
};

/// Field emitted into otherwise empty object bodies.
const PLACEHOLDER_FIELD: &str = "_placeholder: Boolean";

const INDENT: &str = "  ";

pub struct Emitter<'g> {
    graph: &'g TypeGraph,
    renames: Renames,
    output: String,
    indent_level: u32,
}

impl<'g> Emitter<'g> {
    pub fn new(graph: &'g TypeGraph) -> Self {
        Emitter {
            graph,
            renames: Renames::compute(graph),
            output: String::new(),
            indent_level: 0,
        }
    }

    /// Render every entry that survives alias elision.
    pub fn emit_all(mut self) -> Result<String> {
        debug!(elided = self.renames.len(), "computed alias renames");

        let graph = self.graph;
        for (name, id) in graph.iter() {
            if self.renames.contains(name) {
                debug!(alias = name, target = self.renames.resolve(name), "eliding alias");
                continue;
            }
            self.emit_top_level(name, graph.node(id))
                .with_context(|| format!("while emitting '{name}'"))?;
        }
        Ok(self.output)
    }

    fn emit_top_level(&mut self, name: &str, node: &TypeNode) -> Result<()> {
        match node {
            TypeNode::Alias(alias) => self.emit_alias(name, alias.target),
            TypeNode::Interface(interface) => self.emit_interface(name, interface),
            TypeNode::Enum(node) => {
                let values: Vec<&str> = node.values.iter().map(String::as_str).collect();
                self.emit_enum(name, &values);
                Ok(())
            }
            other => bail!(
                "Don't know how to emit {} as a top level node",
                other.kind_name()
            ),
        }
    }

    fn emit_alias(&mut self, name: &str, target: TypeId) -> Result<()> {
        let graph = self.graph;
        let target = graph.arena.unwrap_not_null(target);
        match graph.node(target) {
            node if node.is_primitive() => {
                self.emit_scalar(name);
                Ok(())
            }
            TypeNode::Union { types } => self.emit_union(name, types),
            TypeNode::Reference { .. } | TypeNode::StringLiteral { .. } => {
                self.emit_union(name, &[target])
            }
            other => bail!("Can't serialize {} as an alias", other.kind_name()),
        }
    }

    fn emit_scalar(&mut self, name: &str) {
        let name = self.type_name(name);
        self.begin_declaration();
        self.write(&format!("scalar {name}"));
        self.write_line();
    }

    fn emit_enum(&mut self, name: &str, values: &[&str]) {
        let name = self.type_name(name);
        self.emit_block(&format!("enum {name}"), values.iter().map(|v| v.to_string()));
    }

    // =========================================================================
    // Interfaces
    // =========================================================================

    fn emit_interface(&mut self, name: &str, interface: &InterfaceNode) -> Result<()> {
        let members = self.collect_members(&interface.members, &interface.inherits)?;
        let doc = interface.documentation.as_ref();
        let is_schema = has_graphql_tag(doc, "schema");

        let mut fields = members
            .iter()
            .map(|&member| self.emit_member(member, is_schema))
            .collect::<Result<Vec<_>>>()?;
        if fields.is_empty() {
            fields.push(PLACEHOLDER_FIELD.to_string());
        }

        let type_name = self.type_name(name);
        if is_schema {
            self.emit_block("schema", fields);
            return Ok(());
        }

        let keyword = if has_graphql_tag(doc, "input") {
            "input"
        } else if interface.concrete {
            "type"
        } else {
            "interface"
        };
        self.emit_block(&format!("{keyword} {type_name}"), fields);

        if keyword == "interface"
            && let Some(fragment) = doc.and_then(|doc| find_graphql_tag(doc, "fragment"))
        {
            let fragment_name = if fragment.is_empty() {
                format!("{type_name}Fragment")
            } else {
                sanitize(fragment)
            };
            let field_names = members
                .iter()
                .filter_map(|&member| self.graph.node(member).member_name())
                .map(sanitize)
                .collect::<Vec<_>>();
            self.emit_block(&format!("fragment {fragment_name} on {type_name}"), field_names);
        }
        Ok(())
    }

    /// Own members followed by inherited ones, first name wins, sorted by name.
    fn collect_members(&self, own: &[TypeId], inherits: &[String]) -> Result<Vec<TypeId>> {
        let mut lists = vec![own];
        let mut visited: FxHashSet<&str> = FxHashSet::default();
        let mut supertypes = inherits;
        loop {
            if supertypes.len() > 1 {
                bail!(
                    "GraphQL does not support multiple inheritance ({})",
                    supertypes.join(", ")
                );
            }
            let Some(supertype) = supertypes.first() else {
                break;
            };
            if !visited.insert(supertype.as_str()) {
                break;
            }
            match self.graph.get(supertype) {
                Some(TypeNode::Interface(parent)) => {
                    lists.push(&parent.members);
                    supertypes = &parent.inherits;
                }
                Some(other) => bail!(
                    "Cannot inherit from '{supertype}': it is {} {}",
                    article(other.kind_name()),
                    other.kind_name()
                ),
                None => bail!("Cannot inherit from '{supertype}': it is not part of the schema"),
            }
        }

        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut members: Vec<TypeId> = lists
            .into_iter()
            .flatten()
            .copied()
            .filter(|&id| {
                self.graph
                    .node(id)
                    .member_name()
                    .is_some_and(|name| seen.insert(name))
            })
            .collect();
        members.sort_by(|&a, &b| {
            let a = self.graph.node(a).member_name().unwrap_or_default();
            let b = self.graph.node(b).member_name().unwrap_or_default();
            a.cmp(b)
        });
        Ok(members)
    }

    /// One field line. Schema root fields drop their outer `!`.
    fn emit_member(&self, member: TypeId, is_schema: bool) -> Result<String> {
        let strip = |id: TypeId| {
            if is_schema {
                self.graph.arena.unwrap_not_null(id)
            } else {
                id
            }
        };
        match self.graph.node(member) {
            TypeNode::Method(method) => self.emit_method(method, strip(method.returns)),
            TypeNode::Property(property) => self.emit_property(property, strip(property.signature)),
            other => bail!("Can't serialize {} as a field", other.kind_name()),
        }
    }

    fn emit_method(&self, method: &MethodNode, returns: TypeId) -> Result<String> {
        let mut field = sanitize(&method.name);
        if !method.parameters.is_empty() {
            let parameters = method
                .parameters
                .iter()
                .map(|(name, &ty)| {
                    self.emit_expression(ty)
                        .map(|ty| format!("{}: {ty}", sanitize(name)))
                        .with_context(|| format!("in parameter '{name}'"))
                })
                .collect::<Result<Vec<_>>>()?;
            field.push('(');
            field.push_str(&parameters.join(", "));
            field.push(')');
        }
        field.push_str(": ");
        field.push_str(&self.emit_expression(returns)?);
        for directive in &method.directives {
            field.push(' ');
            field.push_str(&emit_directive(directive));
        }
        Ok(field)
    }

    fn emit_property(&self, property: &PropertyNode, signature: TypeId) -> Result<String> {
        let ty = self
            .emit_expression(signature)
            .with_context(|| format!("in field '{}'", property.name))?;
        Ok(format!("{}: {ty}", sanitize(&property.name)))
    }

    // =========================================================================
    // Unions
    // =========================================================================

    fn emit_union(&mut self, name: &str, types: &[TypeId]) -> Result<()> {
        let graph = self.graph;
        let members: Vec<&TypeNode> = types
            .iter()
            .map(|&id| graph.node(graph.arena.unwrap_not_null(id)))
            .collect();

        let literals: Option<Vec<&str>> = members
            .iter()
            .map(|node| match node {
                TypeNode::StringLiteral { value } => Some(value.as_str()),
                _ => None,
            })
            .collect();
        if let Some(literals) = literals {
            self.emit_enum(name, &dedupe(literals));
            return Ok(());
        }

        if let [only] = members.as_slice()
            && only.is_primitive()
        {
            self.emit_scalar(name);
            return Ok(());
        }

        let mut targets = Vec::with_capacity(members.len());
        for node in &members {
            let TypeNode::Reference { target } = node else {
                bail!(
                    "GraphQL union members must be references to named types; got {} {}",
                    article(node.kind_name()),
                    node.kind_name()
                );
            };
            targets.push(target.as_str());
        }
        let Some(&first) = targets.first() else {
            bail!("GraphQL unions must have at least one member");
        };

        match self.union_target(first)? {
            node if node.is_primitive() => {
                bail!("GraphQL does not support unions of scalar types ('{first}')")
            }
            TypeNode::Union { .. } => {
                bail!("GraphQL does not support unions of unions ('{first}')")
            }
            TypeNode::Interface(interface) if !interface.concrete => bail!(
                "GraphQL does not support unions of interfaces; '{first}' is never used as a concrete type"
            ),
            TypeNode::Enum(_) => {
                let mut values = Vec::new();
                for &target in &targets {
                    match self.union_target(target)? {
                        TypeNode::Enum(node) => {
                            values.extend(node.values.iter().map(String::as_str));
                        }
                        other => bail!(
                            "All members of an enum union must be enums; '{target}' is {} {}",
                            article(other.kind_name()),
                            other.kind_name()
                        ),
                    }
                }
                self.emit_enum(name, &dedupe(values));
                Ok(())
            }
            TypeNode::Interface(_) => {
                let mut names = Vec::with_capacity(targets.len());
                for &target in &targets {
                    match self.union_target(target)? {
                        TypeNode::Interface(_) => names.push(self.type_name(target)),
                        other => {
                            let mut message = format!(
                                "All members of an object union must be interfaces; '{target}' is {} {}",
                                article(other.kind_name()),
                                other.kind_name()
                            );
                            if let Some(TypeNode::Alias(_)) = graph.get(target) {
                                message.push_str(" (through an alias)");
                            }
                            bail!(message);
                        }
                    }
                }
                let name = self.type_name(name);
                self.begin_declaration();
                self.write(&format!("union {name} = {}", names.join(" | ")));
                self.write_line();
                Ok(())
            }
            other => bail!(
                "GraphQL currently does not support unions for type {}",
                other.kind_name()
            ),
        }
    }

    /// The named node behind a union member, looking through one alias.
    fn union_target(&self, name: &str) -> Result<&'g TypeNode> {
        let graph = self.graph;
        let Some(node) = graph.get(name) else {
            bail!("Union member '{name}' is not part of the schema");
        };
        let TypeNode::Alias(alias) = node else {
            return Ok(node);
        };
        let target = graph.node(graph.arena.unwrap_not_null(alias.target));
        match target {
            TypeNode::Reference { target: inner } => match graph.get(inner) {
                Some(resolved) => Ok(resolved),
                None => bail!("Union member '{inner}' is not part of the schema"),
            },
            _ => Ok(target),
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// A type in field position.
    pub fn emit_expression(&self, id: TypeId) -> Result<String> {
        let node = self.graph.node(id);
        Ok(match node {
            TypeNode::NotNull { node } => format!("{}!", self.emit_expression(*node)?),
            // TODO: distinguish Int from Float once numbers carry a hint.
            TypeNode::Number => "Float".to_string(),
            TypeNode::String => "String".to_string(),
            TypeNode::Boolean => "Boolean".to_string(),
            TypeNode::Reference { target } => self.type_name(target),
            TypeNode::Array { elements } => {
                let elements = elements
                    .iter()
                    .map(|&element| self.emit_expression(element))
                    .collect::<Result<Vec<_>>>()?;
                format!("[{}]", elements.join(" | "))
            }
            TypeNode::LiteralObject { members } => self.emit_inline_members(members, &[])?,
            TypeNode::Interface(interface) => {
                self.emit_inline_members(&interface.members, &interface.inherits)?
            }
            TypeNode::Union { types } if types.len() == 1 => self.emit_expression(types[0])?,
            other => bail!("Can't serialize {} as an expression", other.kind_name()),
        })
    }

    fn emit_inline_members(&self, own: &[TypeId], inherits: &[String]) -> Result<String> {
        let fields = self
            .collect_members(own, inherits)?
            .into_iter()
            .map(|member| self.emit_member(member, false))
            .collect::<Result<Vec<_>>>()?;
        Ok(fields.join(", "))
    }

    fn type_name(&self, name: &str) -> String {
        sanitize(self.renames.resolve(name))
    }

    // =========================================================================
    // Output helpers
    // =========================================================================

    /// `header {`, one indented line per entry, `}`.
    fn emit_block(&mut self, header: &str, lines: impl IntoIterator<Item = String>) {
        self.begin_declaration();
        self.write(header);
        self.write(" {");
        self.write_line();
        self.increase_indent();
        for line in lines {
            self.write_indent();
            self.write(&line);
            self.write_line();
        }
        self.decrease_indent();
        self.write_indent();
        self.write("}");
        self.write_line();
    }

    /// Declarations are separated by a blank line.
    fn begin_declaration(&mut self) {
        if !self.output.is_empty() {
            self.write_line();
        }
    }

    fn write(&mut self, text: &str) {
        self.output.push_str(text);
    }

    fn write_line(&mut self) {
        self.output.push('\n');
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push_str(INDENT);
        }
    }

    fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    fn decrease_indent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }
}

/// `@name` or `@name(arg: value, ...)`.
fn emit_directive(directive: &Directive) -> String {
    if directive.params.is_empty() {
        return format!("@{}", directive.name);
    }
    let params = directive
        .params
        .iter()
        .map(|(name, value)| format!("{name}: {}", value.text))
        .collect::<Vec<_>>();
    format!("@{}({})", directive.name, params.join(", "))
}

/// Replace every character outside `[A-Za-z0-9_]` with `_`.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

fn dedupe(values: Vec<&str>) -> Vec<&str> {
    let mut seen = FxHashSet::default();
    values.into_iter().filter(|value| seen.insert(*value)).collect()
}

fn article(word: &str) -> &'static str {
    match word.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_non_word_characters() {
        assert_eq!(sanitize("Api.User"), "Api_User");
        assert_eq!(sanitize("a-b c"), "a_b_c");
        assert_eq!(sanitize("Plain_1"), "Plain_1");
        assert_eq!(sanitize("Café"), "Caf_");
        assert_eq!(sanitize("naïve"), "na_ve");
    }

    #[test]
    fn test_directive_rendering() {
        let mut directive = Directive {
            name: "live".to_string(),
            params: Default::default(),
        };
        assert_eq!(emit_directive(&directive), "@live");
        directive
            .params
            .insert("ttl".to_string(), tsgql_collector::Value::new("30"));
        directive
            .params
            .insert("scope".to_string(), tsgql_collector::Value::new("\"user\""));
        assert_eq!(emit_directive(&directive), "@live(ttl: 30, scope: \"user\")");
    }

    #[test]
    fn test_dedupe_keeps_first_seen_order() {
        assert_eq!(dedupe(vec!["b", "a", "b", "c", "a"]), vec!["b", "a", "c"]);
    }
}
