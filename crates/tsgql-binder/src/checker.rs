//! Symbol queries over a bound [`Program`].
//!
//! The collector only sees the [`TypeChecker`] trait: declaration or
//! reference node to symbol, alias chain to its target, and the scope chain
//! used for qualified names.

use crate::program::Program;
use crate::symbols::{AliasTarget, ScopeRef, SymbolId, symbol_flags};
use crate::{FileId, NodeRef};
use anyhow::{Result, bail};
use rustc_hash::FxHashSet;
use tracing::trace;
use tsgql_parser::NodeData;

/// Narrow semantic service consumed by the schema collector.
pub trait TypeChecker {
    /// The symbol a declaration introduces, or the symbol an entity-name
    /// reference (identifier, qualified name, type reference) refers to.
    fn get_symbol_at_location(&self, node: NodeRef) -> Result<SymbolId>;

    /// Follow import/export aliases to the symbol they ultimately name.
    /// Non-alias symbols are returned unchanged.
    fn get_aliased_symbol(&self, symbol: SymbolId) -> Result<SymbolId>;

    /// The printable name of a symbol.
    fn symbol_to_string(&self, symbol: SymbolId) -> String;

    /// Enclosing namespace or module symbol.
    fn get_parent_symbol(&self, symbol: SymbolId) -> Option<SymbolId>;

    /// True for file modules and `declare module "x"` blocks.
    fn is_external_module(&self, symbol: SymbolId) -> bool;

    fn get_declarations(&self, symbol: SymbolId) -> &[NodeRef];

    fn get_symbol_flags(&self, symbol: SymbolId) -> u32;
}

impl TypeChecker for Program {
    fn get_symbol_at_location(&self, node: NodeRef) -> Result<SymbolId> {
        if let Some(&symbol) = self.binder.node_symbols.get(&node) {
            return Ok(symbol);
        }
        let arena = self.arena(node.file);
        match arena.get_data(node.node) {
            Some(NodeData::Identifier(_)) => {
                let parent = arena.get_parent(node.node);
                if arena.get_declaration_name(parent) == node.node
                    && let Some(&symbol) =
                        self.binder.node_symbols.get(&NodeRef::new(node.file, parent))
                {
                    return Ok(symbol);
                }
                self.resolve_entity_name(node)
            }
            Some(NodeData::QualifiedName(_)) => self.resolve_entity_name(node),
            Some(NodeData::TypeReference(reference)) => {
                self.resolve_entity_name(NodeRef::new(node.file, reference.type_name))
            }
            Some(NodeData::ExpressionWithTypeArguments(expr)) => {
                self.resolve_entity_name(NodeRef::new(node.file, expr.expression))
            }
            Some(NodeData::TypeQuery(query)) => {
                self.resolve_entity_name(NodeRef::new(node.file, query.expr_name))
            }
            Some(data) => bail!(
                "No symbol for {} at {}",
                data.kind_name(),
                self.location(node)
            ),
            None => bail!("No node at {}", self.location(node)),
        }
    }

    fn get_aliased_symbol(&self, symbol: SymbolId) -> Result<SymbolId> {
        let mut current = symbol;
        let mut seen = FxHashSet::default();
        loop {
            let Some(sym) = self.get_symbol(current) else {
                bail!("Unknown symbol #{}", current.0);
            };
            let Some(target) = &sym.alias_target else {
                return Ok(current);
            };
            if !seen.insert(current) {
                bail!("Circular definition of import alias '{}'", sym.escaped_name);
            }
            trace!(alias = %sym.escaped_name, "following alias");
            current = match target {
                AliasTarget::ModuleExport {
                    from,
                    specifier,
                    name,
                } => {
                    let module = self.resolve_module(*from, specifier)?;
                    match self.lookup_export(module, name)? {
                        Some(exported) => exported,
                        None => bail!("Module '{specifier}' has no exported member '{name}'"),
                    }
                }
                AliasTarget::ModuleNamespace { from, specifier } => {
                    self.resolve_module(*from, specifier)?
                }
                AliasTarget::Local { scope, name } => match self.lookup_in_scope(*scope, name) {
                    Some(local) => local,
                    None => bail!("Cannot find name '{name}' to export"),
                },
            };
        }
    }

    fn symbol_to_string(&self, symbol: SymbolId) -> String {
        self.get_symbol(symbol)
            .map(|s| s.escaped_name.clone())
            .unwrap_or_default()
    }

    fn get_parent_symbol(&self, symbol: SymbolId) -> Option<SymbolId> {
        self.get_symbol(symbol)?.parent
    }

    fn is_external_module(&self, symbol: SymbolId) -> bool {
        self.get_symbol(symbol)
            .is_some_and(|s| s.has_flags(symbol_flags::VALUE_MODULE))
    }

    fn get_declarations(&self, symbol: SymbolId) -> &[NodeRef] {
        self.get_symbol(symbol)
            .map_or(&[], |s| s.declarations.as_slice())
    }

    fn get_symbol_flags(&self, symbol: SymbolId) -> u32 {
        self.get_symbol(symbol).map_or(symbol_flags::NONE, |s| s.flags)
    }
}

impl Program {
    /// Look up `name` as seen from `node`: enclosing type parameter lists
    /// and namespaces first, then the file's locals, then globals.
    pub fn resolve_name(&self, node: NodeRef, name: &str) -> Option<SymbolId> {
        let arena = self.arena(node.file);
        let scopes = std::iter::once(node.node).chain(arena.ancestors(node.node));
        for scope in scopes {
            let scope_ref = NodeRef::new(node.file, scope);
            if let Some(found) = self
                .binder
                .type_parameter_scopes
                .get(&scope_ref)
                .and_then(|table| table.get(name))
            {
                return Some(found);
            }
            if let Some(NodeData::ModuleDeclaration(_)) = arena.get_data(scope)
                && let Some(found) = self
                    .binder
                    .node_symbols
                    .get(&scope_ref)
                    .and_then(|&module| self.get_symbol(module))
                    .and_then(|module| module.members.get(name))
            {
                return Some(found);
            }
        }
        self.binder
            .file_locals
            .get(&node.file)
            .and_then(|locals| locals.get(name))
            .or_else(|| self.binder.globals.get(name))
    }

    /// Resolve an Identifier or QualifiedName node.
    fn resolve_entity_name(&self, node: NodeRef) -> Result<SymbolId> {
        let arena = self.arena(node.file);
        match arena.get_data(node.node) {
            Some(NodeData::Identifier(ident)) => {
                match self.resolve_name(node, &ident.escaped_text) {
                    Some(symbol) => Ok(symbol),
                    None => bail!(
                        "Cannot find name '{}' at {}",
                        ident.escaped_text,
                        self.location(node)
                    ),
                }
            }
            Some(NodeData::QualifiedName(qualified)) => {
                let left = self.resolve_entity_name(NodeRef::new(node.file, qualified.left))?;
                let left = self.get_aliased_symbol(left)?;
                let right = arena.get_identifier_text(qualified.right).unwrap_or_default();
                match self.lookup_export(left, right)? {
                    Some(symbol) => Ok(symbol),
                    None => bail!(
                        "Namespace '{}' has no exported member '{}' at {}",
                        self.symbol_to_string(left),
                        right,
                        self.location(node)
                    ),
                }
            }
            Some(data) => bail!(
                "Expected an entity name, found {} at {}",
                data.kind_name(),
                self.location(node)
            ),
            None => bail!("No node at {}", self.location(node)),
        }
    }

    /// An exported member of a module or namespace, following
    /// `export * from` re-exports.
    pub fn lookup_export(&self, container: SymbolId, name: &str) -> Result<Option<SymbolId>> {
        let mut visited = FxHashSet::default();
        self.lookup_export_worker(container, name, &mut visited)
    }

    fn lookup_export_worker(
        &self,
        container: SymbolId,
        name: &str,
        visited: &mut FxHashSet<SymbolId>,
    ) -> Result<Option<SymbolId>> {
        if !visited.insert(container) {
            return Ok(None);
        }
        let Some(symbol) = self.get_symbol(container) else {
            return Ok(None);
        };
        if let Some(found) = symbol.exports.get(name) {
            return Ok(Some(found));
        }
        // `export *` never re-exports a default.
        if name == "default" {
            return Ok(None);
        }
        if let Some(stars) = self.binder.export_stars.get(&container) {
            for (from, specifier) in stars {
                let module = self.resolve_module(*from, specifier)?;
                if let Some(found) = self.lookup_export_worker(module, name, visited)? {
                    return Ok(Some(found));
                }
            }
        }
        Ok(None)
    }

    /// The module symbol a specifier names from `from`.
    pub fn resolve_module(&self, from: FileId, specifier: &str) -> Result<SymbolId> {
        if let Some(&file) = self.resolved_modules.get(&(from, specifier.to_string())) {
            return match self.module_symbol(file) {
                Some(module) => Ok(module),
                None => bail!(
                    "File '{}' is not a module",
                    self.file(file).file_name
                ),
            };
        }
        match self.binder.ambient_modules.get(specifier) {
            Some(module) => Ok(module),
            None => bail!(
                "Cannot find module '{}' imported from {}",
                specifier,
                self.file(from).file_name
            ),
        }
    }

    fn lookup_in_scope(&self, scope: ScopeRef, name: &str) -> Option<SymbolId> {
        match scope {
            ScopeRef::Global => self.binder.globals.get(name),
            ScopeRef::File(file) => self
                .binder
                .file_locals
                .get(&file)
                .and_then(|locals| locals.get(name))
                .or_else(|| self.binder.globals.get(name)),
            ScopeRef::Namespace(symbol) => self.get_symbol(symbol)?.members.get(name),
        }
    }

    /// Symbols a file exports, ordered by declaration position. Scripts
    /// export nothing.
    pub fn get_exports(&self, file: FileId) -> Vec<(String, SymbolId)> {
        let Some(module) = self.module_symbol(file) else {
            return Vec::new();
        };
        let Some(symbol) = self.get_symbol(module) else {
            return Vec::new();
        };
        let mut exports: Vec<(String, SymbolId)> = symbol
            .exports
            .iter()
            .map(|(name, id)| (name.to_string(), id))
            .collect();
        exports.sort_by_key(|(_, id)| self.declaration_position(*id));
        exports
    }

    /// `(file, pos)` of a symbol's first declaration.
    fn declaration_position(&self, symbol: SymbolId) -> (FileId, u32) {
        self.get_declarations(symbol)
            .first()
            .map_or((FileId(u32::MAX), u32::MAX), |decl| {
                let pos = self.get_node(*decl).map_or(u32::MAX, |n| n.pos);
                (decl.file, pos)
            })
    }

    /// A named export of `file`, before alias expansion.
    pub fn find_exported(&self, file: FileId, name: &str) -> Result<Option<SymbolId>> {
        match self.module_symbol(file) {
            Some(module) => self.lookup_export(module, name),
            None => Ok(None),
        }
    }
}
