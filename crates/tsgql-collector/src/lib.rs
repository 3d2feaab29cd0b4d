//! Type graph collection for tsgql.
//!
//! The [`Collector`] walks interface, type alias and enum declarations of a
//! bound [`tsgql_binder::Program`] and produces a [`TypeGraph`]: a closed map
//! from qualified name to [`TypeNode`] that the emitter renders as GraphQL.

pub mod collector;
pub mod directives;
pub mod load;
pub mod types;

pub use collector::Collector;
pub use load::load;
pub use types::{
    AliasNode, Directive, EnumNode, InterfaceNode, MethodNode, PropertyNode, TypeArena, TypeGraph,
    TypeId, TypeNode, Value,
};
