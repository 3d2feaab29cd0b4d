//! Program loading and name binding for tsgql.
//!
//! A [`Program`] parses the root file plus everything it imports through
//! relative specifiers, binds each file's declarations into symbol tables
//! and answers symbol queries through the [`TypeChecker`] trait.

pub mod checker;
pub mod lib_loader;
pub mod module_resolver;
pub mod program;
pub mod state;
pub mod symbols;

pub use checker::TypeChecker;
pub use module_resolver::{DiskHost, MemoryHost, SourceHost};
pub use program::{Program, SourceFile};
pub use state::BinderState;
pub use symbols::{AliasTarget, ScopeRef, Symbol, SymbolId, SymbolTable, symbol_flags};

/// Index of a file within its program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub u32);

/// A node in a specific file of the program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeRef {
    pub file: FileId,
    pub node: tsgql_parser::NodeIndex,
}

impl NodeRef {
    pub const fn new(file: FileId, node: tsgql_parser::NodeIndex) -> Self {
        NodeRef { file, node }
    }
}
