//! Binder state: walks parsed files and declares their symbols.
//!
//! Scopes form a small stack while binding. The file scope is either the
//! global table (scripts, the default lib, `declare global`) or the file's
//! own locals (external modules). Namespaces and ambient modules push their
//! own symbol so members land in its tables.

use crate::symbols::{AliasTarget, ScopeRef, SymbolArena, SymbolId, SymbolTable, symbol_flags};
use crate::{FileId, NodeRef};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};
use tsgql_parser::{NodeArena, NodeData, NodeIndex, modifier_flags};

pub struct BinderState {
    pub symbols: SymbolArena,
    /// Script-level declarations of every file plus the default lib.
    pub globals: SymbolTable,
    /// Top-level locals of each external module file.
    pub file_locals: FxHashMap<FileId, SymbolTable>,
    /// The module symbol of each external module file.
    pub file_symbols: FxHashMap<FileId, SymbolId>,
    /// `declare module "name"` blocks, by module name.
    pub ambient_modules: SymbolTable,
    /// Declaration node to the symbol it declares.
    pub node_symbols: FxHashMap<NodeRef, SymbolId>,
    /// Type parameters visible inside a declaration, keyed by that declaration.
    pub type_parameter_scopes: FxHashMap<NodeRef, SymbolTable>,
    /// `export * from "..."` entries of each module symbol.
    pub export_stars: FxHashMap<SymbolId, Vec<(FileId, String)>>,

    current_file: FileId,
    /// Current scope and whether every declaration in it is exported
    /// (ambient module bodies).
    scope_stack: Vec<(ScopeRef, bool)>,
    /// Module specifiers seen while binding the current file.
    module_requests: Vec<String>,
}

impl Default for BinderState {
    fn default() -> Self {
        Self::new()
    }
}

impl BinderState {
    pub fn new() -> Self {
        BinderState {
            symbols: SymbolArena::new(),
            globals: SymbolTable::new(),
            file_locals: FxHashMap::default(),
            file_symbols: FxHashMap::default(),
            ambient_modules: SymbolTable::new(),
            node_symbols: FxHashMap::default(),
            type_parameter_scopes: FxHashMap::default(),
            export_stars: FxHashMap::default(),
            current_file: FileId(0),
            scope_stack: Vec::new(),
            module_requests: Vec::new(),
        }
    }

    /// Bind one parsed file. Returns the module specifiers it imports from,
    /// in source order.
    pub fn bind_source_file(
        &mut self,
        file: FileId,
        file_name: &str,
        arena: &NodeArena,
        root: NodeIndex,
    ) -> Vec<String> {
        let Some(NodeData::SourceFile(source)) = arena.get_data(root) else {
            return Vec::new();
        };
        self.current_file = file;
        self.module_requests.clear();

        if is_external_module(arena, root) {
            let module = self
                .symbols
                .alloc(symbol_flags::VALUE_MODULE, format!("\"{file_name}\""));
            if let Some(symbol) = self.symbols.get_mut(module) {
                symbol.declarations.push(NodeRef::new(file, root));
            }
            self.node_symbols.insert(NodeRef::new(file, root), module);
            self.file_symbols.insert(file, module);
            self.file_locals.insert(file, SymbolTable::new());
            self.scope_stack.push((ScopeRef::File(file), false));
        } else {
            self.scope_stack.push((ScopeRef::Global, false));
        }

        for statement in source.statements.iter() {
            self.bind_statement(arena, statement);
        }
        self.scope_stack.pop();

        self.bind_type_parameters(arena);

        debug!(
            file = file_name,
            symbols = self.symbols.len(),
            imports = self.module_requests.len(),
            "bound source file"
        );
        std::mem::take(&mut self.module_requests)
    }

    fn node_ref(&self, node: NodeIndex) -> NodeRef {
        NodeRef::new(self.current_file, node)
    }

    fn current_scope(&self) -> (ScopeRef, bool) {
        self.scope_stack
            .last()
            .copied()
            .unwrap_or((ScopeRef::Global, false))
    }

    /// The module or namespace symbol that owns the current scope.
    fn current_container_symbol(&self) -> Option<SymbolId> {
        match self.current_scope().0 {
            ScopeRef::Global => None,
            ScopeRef::File(file) => self.file_symbols.get(&file).copied(),
            ScopeRef::Namespace(symbol) => Some(symbol),
        }
    }

    fn scope_table_mut(&mut self, scope: ScopeRef) -> Option<&mut SymbolTable> {
        match scope {
            ScopeRef::Global => Some(&mut self.globals),
            ScopeRef::File(file) => Some(self.file_locals.entry(file).or_default()),
            ScopeRef::Namespace(symbol) => self.symbols.get_mut(symbol).map(|s| &mut s.members),
        }
    }

    fn exports_table_mut(&mut self, scope: ScopeRef) -> Option<&mut SymbolTable> {
        let owner = match scope {
            ScopeRef::Global => return None,
            ScopeRef::File(file) => *self.file_symbols.get(&file)?,
            ScopeRef::Namespace(symbol) => symbol,
        };
        self.symbols.get_mut(owner).map(|s| &mut s.exports)
    }

    /// Declare `name` in the current scope, merging with an existing
    /// non-alias symbol of the same name.
    fn declare_symbol(
        &mut self,
        name: &str,
        flags: u32,
        declaration: NodeIndex,
        is_exported: bool,
    ) -> SymbolId {
        let (scope, export_all) = self.current_scope();
        let is_exported = is_exported || export_all;
        let decl_ref = self.node_ref(declaration);

        let in_scope = self.scope_table_mut(scope).and_then(|table| table.get(name));
        let existing = in_scope.filter(|&id| {
            flags & symbol_flags::ALIAS == 0
                && self
                    .symbols
                    .get(id)
                    .is_some_and(|s| !s.has_flags(symbol_flags::ALIAS))
        });

        let id = match existing {
            Some(id) => {
                trace!(name, "merging declaration");
                id
            }
            None => {
                let id = self.symbols.alloc(flags, name.to_string());
                let parent = self.current_container_symbol();
                if let Some(symbol) = self.symbols.get_mut(id) {
                    symbol.parent = parent;
                }
                if let Some(table) = self.scope_table_mut(scope) {
                    table.set(name.to_string(), id);
                }
                id
            }
        };

        if let Some(symbol) = self.symbols.get_mut(id) {
            symbol.flags |= flags;
            symbol.declarations.push(decl_ref);
        }
        if is_exported && let Some(exports) = self.exports_table_mut(scope) {
            exports.set(name.to_string(), id);
        }
        self.node_symbols.insert(decl_ref, id);
        id
    }

    /// Add a symbol to the current scope's exports only.
    fn declare_export(&mut self, name: &str, symbol: SymbolId) {
        let (scope, _) = self.current_scope();
        if let Some(exports) = self.exports_table_mut(scope) {
            exports.set(name.to_string(), symbol);
        }
    }

    fn alloc_alias(&mut self, name: &str, declaration: NodeIndex, target: AliasTarget) -> SymbolId {
        let id = self.symbols.alloc(symbol_flags::ALIAS, name.to_string());
        let parent = self.current_container_symbol();
        let decl_ref = self.node_ref(declaration);
        if let Some(symbol) = self.symbols.get_mut(id) {
            symbol.parent = parent;
            symbol.declarations.push(decl_ref);
            symbol.alias_target = Some(target);
        }
        self.node_symbols.insert(decl_ref, id);
        id
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn bind_statement(&mut self, arena: &NodeArena, idx: NodeIndex) {
        let Some(data) = arena.get_data(idx) else {
            return;
        };
        let modifiers = arena.get_modifiers(idx);
        let is_exported = modifiers & modifier_flags::EXPORT != 0;
        let is_default = modifiers & modifier_flags::DEFAULT != 0;

        let flags = match data {
            NodeData::InterfaceDeclaration(_) => symbol_flags::INTERFACE,
            NodeData::TypeAliasDeclaration(_) => symbol_flags::TYPE_ALIAS,
            NodeData::EnumDeclaration(_) => symbol_flags::ENUM,
            NodeData::ClassDeclaration(_) => symbol_flags::CLASS,
            NodeData::FunctionDeclaration(_) => symbol_flags::FUNCTION,
            NodeData::VariableStatement(statement) => {
                for decl in statement.declarations.iter() {
                    if let Some(name) = arena.get_identifier_text(arena.get_declaration_name(decl))
                    {
                        self.declare_symbol(name, symbol_flags::VARIABLE, decl, is_exported);
                    }
                }
                return;
            }
            NodeData::ModuleDeclaration(_) => {
                self.bind_module_declaration(arena, idx);
                return;
            }
            NodeData::ImportDeclaration(_) => {
                self.bind_import_declaration(arena, idx);
                return;
            }
            NodeData::ExportDeclaration(_) => {
                self.bind_export_declaration(arena, idx);
                return;
            }
            _ => return,
        };

        let name_node = arena.get_declaration_name(idx);
        match arena.get_identifier_text(name_node) {
            Some(name) if !name.is_empty() => {
                let symbol = self.declare_symbol(name, flags, idx, is_exported && !is_default);
                if is_default {
                    self.declare_export("default", symbol);
                }
            }
            _ if is_default => {
                // `export default class {}`
                let symbol = self.symbols.alloc(flags, "default".to_string());
                let decl_ref = self.node_ref(idx);
                let parent = self.current_container_symbol();
                if let Some(s) = self.symbols.get_mut(symbol) {
                    s.parent = parent;
                    s.declarations.push(decl_ref);
                }
                self.node_symbols.insert(decl_ref, symbol);
                self.declare_export("default", symbol);
            }
            _ => {}
        }
    }

    fn bind_module_declaration(&mut self, arena: &NodeArena, idx: NodeIndex) {
        let Some(NodeData::ModuleDeclaration(module)) = arena.get_data(idx) else {
            return;
        };
        let is_exported = arena.has_modifier(idx, modifier_flags::EXPORT);

        let scope = match arena.get_data(module.name) {
            // declare module "name" { ... }
            Some(NodeData::StringLiteral(lit)) => {
                let symbol = match self.ambient_modules.get(&lit.text) {
                    Some(existing) => existing,
                    None => {
                        let id = self
                            .symbols
                            .alloc(symbol_flags::VALUE_MODULE, lit.text.clone());
                        self.ambient_modules.set(lit.text.clone(), id);
                        id
                    }
                };
                let decl_ref = self.node_ref(idx);
                if let Some(s) = self.symbols.get_mut(symbol) {
                    s.declarations.push(decl_ref);
                }
                self.node_symbols.insert(decl_ref, symbol);
                (ScopeRef::Namespace(symbol), true)
            }
            Some(NodeData::Identifier(ident))
                if ident.escaped_text == "global"
                    && arena.has_modifier(idx, modifier_flags::DECLARE) =>
            {
                (ScopeRef::Global, false)
            }
            Some(NodeData::Identifier(ident)) => {
                let name = ident.escaped_text.clone();
                let symbol =
                    self.declare_symbol(&name, symbol_flags::NAMESPACE_MODULE, idx, is_exported);
                let (_, export_all) = self.current_scope();
                (ScopeRef::Namespace(symbol), export_all)
            }
            _ => return,
        };

        self.scope_stack.push(scope);
        match arena.get_data(module.body) {
            Some(NodeData::ModuleBlock(block)) => {
                for statement in block.statements.iter() {
                    self.bind_statement(arena, statement);
                }
            }
            Some(NodeData::ModuleDeclaration(_)) => self.bind_module_declaration(arena, module.body),
            _ => {}
        }
        self.scope_stack.pop();
    }

    // =========================================================================
    // Imports and exports
    // =========================================================================

    fn bind_import_declaration(&mut self, arena: &NodeArena, idx: NodeIndex) {
        let Some(NodeData::ImportDeclaration(import)) = arena.get_data(idx) else {
            return;
        };
        let Some(NodeData::StringLiteral(spec)) = arena.get_data(import.module_specifier) else {
            return;
        };
        let specifier = spec.text.clone();
        self.module_requests.push(specifier.clone());
        let from = self.current_file;

        if let Some(name) = arena.get_identifier_text(import.default_name) {
            let target = AliasTarget::ModuleExport {
                from,
                specifier: specifier.clone(),
                name: "default".to_string(),
            };
            let alias = self.alloc_alias(name, import.default_name, target);
            self.set_local(name, alias);
        }
        if let Some(name) = arena.get_identifier_text(import.namespace_name) {
            let target = AliasTarget::ModuleNamespace {
                from,
                specifier: specifier.clone(),
            };
            let alias = self.alloc_alias(name, import.namespace_name, target);
            self.set_local(name, alias);
        }
        for spec_idx in import.specifiers.iter() {
            let Some((imported, local)) = specifier_names(arena, spec_idx) else {
                continue;
            };
            let target = AliasTarget::ModuleExport {
                from,
                specifier: specifier.clone(),
                name: imported.to_string(),
            };
            let alias = self.alloc_alias(local, spec_idx, target);
            self.set_local(local, alias);
        }
    }

    fn set_local(&mut self, name: &str, symbol: SymbolId) {
        let (scope, _) = self.current_scope();
        if let Some(table) = self.scope_table_mut(scope) {
            table.set(name.to_string(), symbol);
        }
    }

    fn bind_export_declaration(&mut self, arena: &NodeArena, idx: NodeIndex) {
        let Some(NodeData::ExportDeclaration(export)) = arena.get_data(idx) else {
            return;
        };
        let from = self.current_file;
        let specifier = match arena.get_data(export.module_specifier) {
            Some(NodeData::StringLiteral(lit)) => {
                self.module_requests.push(lit.text.clone());
                Some(lit.text.clone())
            }
            _ => None,
        };

        if export.is_star {
            let Some(specifier) = specifier else {
                return;
            };
            match arena.get_identifier_text(export.namespace_name) {
                Some(name) => {
                    let target = AliasTarget::ModuleNamespace { from, specifier };
                    let alias = self.alloc_alias(name, export.namespace_name, target);
                    self.declare_export(name, alias);
                }
                None => {
                    if let Some(module) = self.current_container_symbol() {
                        self.export_stars
                            .entry(module)
                            .or_default()
                            .push((from, specifier));
                    }
                }
            }
            return;
        }

        let (scope, _) = self.current_scope();
        for spec_idx in export.specifiers.iter() {
            let Some((local, exported)) = specifier_names(arena, spec_idx) else {
                continue;
            };
            let target = match &specifier {
                Some(specifier) => AliasTarget::ModuleExport {
                    from,
                    specifier: specifier.clone(),
                    name: local.to_string(),
                },
                None => AliasTarget::Local {
                    scope,
                    name: local.to_string(),
                },
            };
            let alias = self.alloc_alias(exported, spec_idx, target);
            self.declare_export(exported, alias);
        }
    }

    /// Type parameters of every generic declaration in the file.
    fn bind_type_parameters(&mut self, arena: &NodeArena) {
        for (idx, _) in arena.iter() {
            let params = arena.get_type_parameters(idx);
            if params.is_empty() {
                continue;
            }
            let mut table = SymbolTable::new();
            for &param in params {
                let Some(name) = arena.get_identifier_text(arena.get_declaration_name(param)) else {
                    continue;
                };
                let symbol = self
                    .symbols
                    .alloc(symbol_flags::TYPE_PARAMETER, name.to_string());
                let decl_ref = self.node_ref(param);
                if let Some(s) = self.symbols.get_mut(symbol) {
                    s.declarations.push(decl_ref);
                }
                self.node_symbols.insert(decl_ref, symbol);
                table.set(name.to_string(), symbol);
            }
            self.type_parameter_scopes.insert(self.node_ref(idx), table);
        }
    }
}

/// `(far-side name, near-side name)` of an import or export specifier:
/// for `import { a as b }` that is `(a, b)`, for `export { a as b }` too.
fn specifier_names(arena: &NodeArena, idx: NodeIndex) -> Option<(&str, &str)> {
    let (NodeData::ImportSpecifier(spec) | NodeData::ExportSpecifier(spec)) =
        arena.get_data(idx)?
    else {
        return None;
    };
    let name = arena.get_identifier_text(spec.name)?;
    let property = arena.get_identifier_text(spec.property_name).unwrap_or(name);
    Some((property, name))
}

/// A file is an external module when it has a top-level import or export.
pub fn is_external_module(arena: &NodeArena, root: NodeIndex) -> bool {
    let Some(NodeData::SourceFile(source)) = arena.get_data(root) else {
        return false;
    };
    source.statements.iter().any(|statement| {
        matches!(
            arena.get_data(statement),
            Some(NodeData::ImportDeclaration(_) | NodeData::ExportDeclaration(_))
        ) || arena.has_modifier(statement, modifier_flags::EXPORT)
    })
}
