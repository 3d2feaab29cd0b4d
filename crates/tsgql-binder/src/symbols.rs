//! Symbols and symbol tables.

use crate::NodeRef;
use rustc_hash::FxHashMap;

/// Symbol kind bits. A merged symbol carries the union of its
/// declarations' flags.
pub mod symbol_flags {
    pub const NONE: u32 = 0;
    pub const INTERFACE: u32 = 1 << 0;
    pub const TYPE_ALIAS: u32 = 1 << 1;
    pub const ENUM: u32 = 1 << 2;
    pub const CLASS: u32 = 1 << 3;
    pub const FUNCTION: u32 = 1 << 4;
    pub const VARIABLE: u32 = 1 << 5;
    /// An external module: a file with top-level imports/exports or an
    /// ambient `declare module "name"` block.
    pub const VALUE_MODULE: u32 = 1 << 6;
    pub const NAMESPACE_MODULE: u32 = 1 << 7;
    /// An import or export specifier standing in for another symbol.
    pub const ALIAS: u32 = 1 << 8;
    pub const TYPE_PARAMETER: u32 = 1 << 9;

    pub const MODULE: u32 = VALUE_MODULE | NAMESPACE_MODULE;
    pub const TYPE: u32 = INTERFACE | TYPE_ALIAS | ENUM | CLASS | TYPE_PARAMETER;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

/// Where an alias symbol points, resolved lazily.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AliasTarget {
    /// A named export of another module (`import { a }`,
    /// `export { a } from "..."`, and `import a from` as `default`).
    ModuleExport {
        from: crate::FileId,
        specifier: String,
        name: String,
    },
    /// A whole module (`import * as ns`, `export * as ns from`).
    ModuleNamespace {
        from: crate::FileId,
        specifier: String,
    },
    /// A name in the declaring scope (`export { a as b }`).
    Local { scope: ScopeRef, name: String },
}

/// A scope that holds named symbols.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScopeRef {
    /// Script-level declarations and the default lib.
    Global,
    /// Top-level locals of an external module file.
    File(crate::FileId),
    /// Members of a namespace or ambient module.
    Namespace(SymbolId),
}

#[derive(Clone, Debug)]
pub struct Symbol {
    pub flags: u32,
    pub escaped_name: String,
    pub declarations: Vec<NodeRef>,
    /// Enclosing namespace or module symbol.
    pub parent: Option<SymbolId>,
    /// Every member declared inside a namespace or module, exported or not.
    pub members: SymbolTable,
    /// The exported subset of `members` plus re-exports.
    pub exports: SymbolTable,
    pub alias_target: Option<AliasTarget>,
}

impl Symbol {
    pub fn has_flags(&self, flags: u32) -> bool {
        self.flags & flags != 0
    }
}

/// Name to symbol map for one scope.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    symbols: FxHashMap<String, SymbolId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<SymbolId> {
        self.symbols.get(name).copied()
    }

    pub fn set(&mut self, name: String, symbol: SymbolId) {
        self.symbols.insert(name, symbol);
    }

    pub fn has(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SymbolId)> + '_ {
        self.symbols.iter().map(|(name, id)| (name.as_str(), *id))
    }
}

/// Storage for every symbol of a program.
#[derive(Clone, Debug, Default)]
pub struct SymbolArena {
    symbols: Vec<Symbol>,
}

impl SymbolArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, flags: u32, escaped_name: String) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(Symbol {
            flags,
            escaped_name,
            declarations: Vec::new(),
            parent: None,
            members: SymbolTable::new(),
            exports: SymbolTable::new(),
            alias_target: None,
        });
        id
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.symbols.get_mut(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
