//! Program: every file reachable from a root, parsed and bound.

use crate::lib_loader::DEFAULT_LIB;
use crate::module_resolver::{
    DiskHost, MemoryHost, SourceHost, is_relative_specifier, normalize_path, resolve_relative,
};
use crate::state::{BinderState, is_external_module};
use crate::symbols::{Symbol, SymbolId};
use crate::{FileId, NodeRef};
use anyhow::{Context, Result, bail};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info_span};
use tsgql_common::comments::get_leading_jsdoc;
use tsgql_common::{CommentRange, Diagnostic, JsDoc, LineMap, parse_jsdoc};
use tsgql_parser::{Node, NodeArena, NodeData, NodeIndex, ParserState};

/// One parsed file of a program.
#[derive(Debug)]
pub struct SourceFile {
    pub id: FileId,
    /// Display name used in messages.
    pub file_name: String,
    pub path: PathBuf,
    pub source_text: String,
    pub arena: NodeArena,
    pub root: NodeIndex,
    pub comments: Vec<CommentRange>,
    pub line_map: LineMap,
    pub is_external_module: bool,
    pub is_default_lib: bool,
}

impl SourceFile {
    /// Top-level statements of the file.
    pub fn statements(&self) -> &[NodeIndex] {
        match self.arena.get_data(self.root) {
            Some(NodeData::SourceFile(source)) => &source.statements.nodes,
            _ => &[],
        }
    }
}

/// All files reachable from the root file, parsed and bound together.
pub struct Program {
    pub(crate) files: Vec<SourceFile>,
    pub(crate) root_file: FileId,
    pub(crate) binder: BinderState,
    /// `(importing file, specifier)` to the file it resolved to.
    pub(crate) resolved_modules: FxHashMap<(FileId, String), FileId>,
}

impl Program {
    /// Load `root` and every file it reaches through relative imports.
    pub fn load(root: impl AsRef<Path>) -> Result<Program> {
        Self::load_with_host(root.as_ref(), &DiskHost)
    }

    /// Like [`Program::load`], over an in-memory `(path, text)` file set.
    pub fn from_sources<P, T>(root: &str, sources: impl IntoIterator<Item = (P, T)>) -> Result<Program>
    where
        P: AsRef<Path>,
        T: Into<String>,
    {
        let mut host = MemoryHost::new();
        for (path, text) in sources {
            host.add_file(path, text);
        }
        Self::load_with_host(Path::new(root), &host)
    }

    pub fn load_with_host(root: &Path, host: &dyn SourceHost) -> Result<Program> {
        let _span = info_span!("load_program", root = %root.display()).entered();
        let mut builder = ProgramBuilder::default();

        builder.add_file(
            DEFAULT_LIB.file_name,
            PathBuf::from(DEFAULT_LIB.file_name),
            DEFAULT_LIB.content.to_string(),
            true,
        );

        let root_path = normalize_path(root);
        let root_text = host
            .read_file(&root_path)
            .with_context(|| format!("Cannot read file '{}'", root.display()))?;
        let root_file = builder.add_file(
            &root_path.display().to_string(),
            root_path.clone(),
            root_text,
            false,
        );

        let mut path_ids: FxHashMap<PathBuf, FileId> = FxHashMap::default();
        path_ids.insert(root_path, root_file);
        let mut queue = VecDeque::from([root_file]);

        while let Some(file_id) = queue.pop_front() {
            let requests = builder.take_requests(file_id);
            for specifier in requests {
                if !is_relative_specifier(&specifier) {
                    continue;
                }
                let containing = builder.files[file_id.0 as usize].path.clone();
                let Some(resolved) = resolve_relative(host, &containing, &specifier) else {
                    bail!(
                        "Cannot find module '{}' imported from {}",
                        specifier,
                        containing.display()
                    );
                };
                let target = match path_ids.get(&resolved) {
                    Some(&existing) => existing,
                    None => {
                        let text = host.read_file(&resolved).with_context(|| {
                            format!("Cannot read file '{}'", resolved.display())
                        })?;
                        let id = builder.add_file(
                            &resolved.display().to_string(),
                            resolved.clone(),
                            text,
                            false,
                        );
                        path_ids.insert(resolved, id);
                        queue.push_back(id);
                        id
                    }
                };
                builder.resolved_modules.insert((file_id, specifier), target);
            }
        }

        builder.finish(root_file)
    }

    pub fn root_file(&self) -> FileId {
        self.root_file
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// The file with the given id. Ids are only minted by the program, so
    /// every id it hands out is valid.
    pub fn file(&self, id: FileId) -> &SourceFile {
        &self.files[id.0 as usize]
    }

    pub fn binder(&self) -> &BinderState {
        &self.binder
    }

    pub fn get_symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.binder.symbols.get(id)
    }

    /// The module symbol of an external module file.
    pub fn module_symbol(&self, file: FileId) -> Option<SymbolId> {
        self.binder.file_symbols.get(&file).copied()
    }

    pub fn get_node(&self, node: NodeRef) -> Option<&Node> {
        self.file(node.file).arena.get(node.node)
    }

    pub fn get_node_data(&self, node: NodeRef) -> Option<&NodeData> {
        self.file(node.file).arena.get_data(node.node)
    }

    pub fn arena(&self, file: FileId) -> &NodeArena {
        &self.file(file).arena
    }

    /// Source text covered by a node.
    pub fn get_node_text(&self, node: NodeRef) -> &str {
        let file = self.file(node.file);
        file.arena.get_node_text(node.node, &file.source_text)
    }

    /// The parsed JSDoc block directly preceding a node.
    pub fn get_jsdoc(&self, node: NodeRef) -> Option<JsDoc> {
        let file = self.file(node.file);
        let pos = file.arena.get(node.node)?.pos;
        get_leading_jsdoc(&file.comments, pos, &file.source_text).map(|content| parse_jsdoc(&content))
    }

    /// `file:line:col` of a node's first token.
    pub fn location(&self, node: NodeRef) -> String {
        let file = self.file(node.file);
        let pos = file.arena.get(node.node).map_or(0, |n| n.pos);
        let position = file.line_map.offset_to_position(pos, &file.source_text);
        format!("{}:{}", file.file_name, position)
    }

    pub fn is_default_lib(&self, file: FileId) -> bool {
        self.file(file).is_default_lib
    }
}

#[derive(Default)]
struct ProgramBuilder {
    files: Vec<SourceFile>,
    binder: BinderState,
    requests: FxHashMap<FileId, Vec<String>>,
    resolved_modules: FxHashMap<(FileId, String), FileId>,
    diagnostics: Vec<(FileId, Diagnostic)>,
}

impl ProgramBuilder {
    fn add_file(
        &mut self,
        file_name: &str,
        path: PathBuf,
        source_text: String,
        is_default_lib: bool,
    ) -> FileId {
        let id = FileId(self.files.len() as u32);
        let mut parser = ParserState::new(file_name.to_string(), source_text);
        let root = parser.parse_source_file();
        let parsed = parser.into_parsed_file(root);

        self.diagnostics
            .extend(parsed.diagnostics.into_iter().map(|d| (id, d)));
        let requests = self
            .binder
            .bind_source_file(id, file_name, &parsed.arena, root);
        self.requests.insert(id, requests);

        debug!(file = file_name, id = id.0, "added source file");
        self.files.push(SourceFile {
            id,
            file_name: file_name.to_string(),
            path,
            line_map: LineMap::build(&parsed.source_text),
            is_external_module: is_external_module(&parsed.arena, root),
            source_text: parsed.source_text,
            arena: parsed.arena,
            root,
            comments: parsed.comments,
            is_default_lib,
        });
        id
    }

    fn take_requests(&mut self, file: FileId) -> Vec<String> {
        self.requests.remove(&file).unwrap_or_default()
    }

    fn finish(self, root_file: FileId) -> Result<Program> {
        if !self.diagnostics.is_empty() {
            let mut message = format!("Found {} syntax error(s):", self.diagnostics.len());
            for (file_id, diagnostic) in &self.diagnostics {
                let file = &self.files[file_id.0 as usize];
                let position = file
                    .line_map
                    .offset_to_position(diagnostic.start, &file.source_text);
                let _ = write!(
                    message,
                    "\n  {}:{} - {}",
                    file.file_name, position, diagnostic.message_text
                );
            }
            bail!(message);
        }

        Ok(Program {
            files: self.files,
            root_file,
            binder: self.binder,
            resolved_modules: self.resolved_modules,
        })
    }
}
