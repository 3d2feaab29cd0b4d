//! TypeScript declaration parser and AST types for tsgql.
//!
//! The AST lives in a [`NodeArena`]: nodes are addressed by [`NodeIndex`],
//! carry their byte span and parent, and hold their payload in the closed
//! [`NodeData`] sum type so consumers match on it exhaustively.

pub mod parser;

pub use parser::base::{NodeIndex, NodeList};
pub use parser::node::{Node, NodeArena, NodeData, modifier_flags};
pub use parser::state::{ParsedFile, ParserState};
