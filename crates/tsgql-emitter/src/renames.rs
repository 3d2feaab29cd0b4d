//! Alias elision.
//!
//! Aliases that only name a scalar or an enum are not emitted; every
//! reference to them is rewritten to the name they stand for. The table is
//! computed in one pass over the graph before anything is emitted.

use rustc_hash::FxHashMap;
use tsgql_collector::types::find_graphql_tag;
use tsgql_collector::{AliasNode, TypeGraph, TypeNode};

/// Built-in scalars an alias can be tagged as (`@graphql ID`).
pub const BUILTIN_SCALAR_TAGS: [&str; 3] = ["ID", "Int", "Float"];

/// Alias chains deeper than this are treated as cycles.
const MAX_ALIAS_DEPTH: usize = 32;

/// Alias name to the name every reference to it is rewritten to.
#[derive(Clone, Debug, Default)]
pub struct Renames {
    table: FxHashMap<String, String>,
}

impl Renames {
    pub fn compute(graph: &TypeGraph) -> Self {
        let table = graph
            .iter()
            .filter_map(|(name, id)| match graph.node(id) {
                TypeNode::Alias(alias) => {
                    elided_target(graph, alias, 0).map(|target| (name.to_string(), target))
                }
                _ => None,
            })
            .collect();
        Renames { table }
    }

    /// Whether `name` is elided from the output.
    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    /// The final name for `name` after following rename chains.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        let mut current = name;
        for _ in 0..MAX_ALIAS_DEPTH {
            match self.table.get(current) {
                Some(next) if next != current => current = next.as_str(),
                _ => break,
            }
        }
        current
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// The name an alias is replaced by, or `None` when it is emitted.
fn elided_target(graph: &TypeGraph, alias: &AliasNode, depth: usize) -> Option<String> {
    if depth > MAX_ALIAS_DEPTH {
        return None;
    }
    if let Some(doc) = alias.documentation.as_ref()
        && let Some(scalar) = BUILTIN_SCALAR_TAGS
            .into_iter()
            .find(|tag| find_graphql_tag(doc, tag).is_some())
    {
        return Some(scalar.to_string());
    }

    let TypeNode::Reference { target } = graph.node(graph.arena.unwrap_not_null(alias.target))
    else {
        return None;
    };
    match graph.get(target)? {
        TypeNode::Enum(_) => Some(target.clone()),
        TypeNode::Alias(inner) if is_scalar_alias(graph, inner, depth + 1) => Some(target.clone()),
        _ => None,
    }
}

/// An alias that renders as a scalar, or is itself elided.
fn is_scalar_alias(graph: &TypeGraph, alias: &AliasNode, depth: usize) -> bool {
    graph.node(graph.arena.unwrap_not_null(alias.target)).is_primitive()
        || elided_target(graph, alias, depth).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsgql_collector::{EnumNode, TypeArena, TypeId};

    fn alias(arena: &mut TypeArena, target: TypeNode) -> TypeNode {
        let target = arena.alloc(target);
        let target = arena.alloc(TypeNode::NotNull { node: target });
        TypeNode::Alias(AliasNode {
            target,
            documentation: None,
        })
    }

    fn register(graph: &mut TypeGraph, name: &str, node: TypeNode) -> TypeId {
        let id = graph.arena.alloc(node);
        graph.types.insert(name.to_string(), id);
        id
    }

    fn reference(name: &str) -> TypeNode {
        TypeNode::Reference {
            target: name.to_string(),
        }
    }

    #[test]
    fn test_alias_of_enum_and_scalar_alias_chain() {
        let mut graph = TypeGraph::default();
        register(
            &mut graph,
            "Color",
            TypeNode::Enum(EnumNode {
                values: vec!["RED".into()],
                documentation: None,
            }),
        );
        let hue = alias(&mut graph.arena, reference("Color"));
        register(&mut graph, "Hue", hue);
        let name = alias(&mut graph.arena, TypeNode::String);
        register(&mut graph, "Name", name);
        let label = alias(&mut graph.arena, reference("Name"));
        register(&mut graph, "Label", label);
        let title = alias(&mut graph.arena, reference("Label"));
        register(&mut graph, "Title", title);

        let renames = Renames::compute(&graph);
        assert_eq!(renames.len(), 3);
        assert!(!renames.contains("Name"));
        assert_eq!(renames.resolve("Hue"), "Color");
        assert_eq!(renames.resolve("Label"), "Name");
        assert_eq!(renames.resolve("Title"), "Name");
        assert_eq!(renames.resolve("Other"), "Other");
    }

    #[test]
    fn test_alias_cycle_is_not_elided() {
        let mut graph = TypeGraph::default();
        let a = alias(&mut graph.arena, reference("B"));
        register(&mut graph, "A", a);
        let b = alias(&mut graph.arena, reference("A"));
        register(&mut graph, "B", b);
        assert!(Renames::compute(&graph).is_empty());
    }
}
