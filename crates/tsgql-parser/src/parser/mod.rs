//! Parser module: AST storage and the recursive-descent `ParserState`.

pub mod base;
pub mod node;
mod node_access;
mod node_arena;
pub mod state;
mod state_expressions;
mod state_statements;
mod state_types;

pub use base::{NodeIndex, NodeList};
pub use node::{Node, NodeArena, NodeData};
pub use state::ParserState;

#[cfg(test)]
#[path = "tests/node_tests.rs"]
mod node_tests;
