//! Root selection and override discovery for a loaded program.

use crate::collector::Collector;
use crate::types::{TypeGraph, find_graphql_tag};
use anyhow::{Result, bail};
use tracing::{debug, info_span};
use tsgql_binder::{FileId, NodeRef, Program, TypeChecker};
use tsgql_parser::{NodeData, NodeIndex};

/// Collect the type graph for `root_names`, exported interfaces of the
/// program's root file, plus every `@graphql schema` interface declared
/// there. `@graphql override [Name]` interfaces anywhere in the program are
/// merged in afterwards.
pub fn load(program: &Program, root_names: &[String]) -> Result<TypeGraph> {
    let root_file = program.root_file();
    let file_name = &program.file(root_file).file_name;
    let _span = info_span!("load", root = %file_name).entered();

    let exported = exported_interfaces(program, root_file)?;
    let mut roots: Vec<NodeRef> = Vec::new();
    for name in root_names {
        let Some((_, declaration)) = exported.iter().find(|(exported, _)| exported == name) else {
            bail!("No interface named {name} was exported by {file_name}");
        };
        if !roots.contains(declaration) {
            roots.push(*declaration);
        }
    }
    for declaration in interface_declarations(program, root_file) {
        let is_schema = program
            .get_jsdoc(declaration)
            .is_some_and(|doc| find_graphql_tag(&doc, "schema").is_some());
        if is_schema && !roots.contains(&declaration) {
            roots.push(declaration);
        }
    }

    let mut collector = Collector::new(program);
    for root in &roots {
        collector.add_root_node(*root)?;
    }

    for file in program.files().iter().filter(|file| !file.is_default_lib) {
        for declaration in interface_declarations(program, file.id) {
            let Some(doc) = program.get_jsdoc(declaration) else {
                continue;
            };
            let Some(target) = find_graphql_tag(&doc, "override") else {
                continue;
            };
            let target = if target.is_empty() {
                collector.declaration_qualified_name(declaration)?
            } else {
                target.to_string()
            };
            collector.merge_overrides(declaration, &target)?;
        }
    }

    let graph = collector.into_graph();
    debug!(roots = roots.len(), types = graph.len(), "collected type graph");
    Ok(graph)
}

/// Exported interfaces of a file in declaration order, after following
/// export aliases.
fn exported_interfaces(program: &Program, file: FileId) -> Result<Vec<(String, NodeRef)>> {
    let mut out = Vec::new();
    for (name, symbol) in program.get_exports(file) {
        let target = program.get_aliased_symbol(symbol)?;
        let declaration = program.get_declarations(target).iter().copied().find(|decl| {
            matches!(
                program.get_node_data(*decl),
                Some(NodeData::InterfaceDeclaration(_))
            )
        });
        if let Some(declaration) = declaration {
            out.push((name, declaration));
        }
    }
    Ok(out)
}

/// Every interface declared in a file, including those nested in
/// namespaces, in source order.
fn interface_declarations(program: &Program, file: FileId) -> Vec<NodeRef> {
    let source = program.file(file);
    let mut out = Vec::new();
    collect_interfaces(program, file, source.statements(), &mut out);
    out
}

fn collect_interfaces(program: &Program, file: FileId, statements: &[NodeIndex], out: &mut Vec<NodeRef>) {
    let arena = program.arena(file);
    for &statement in statements {
        match arena.get_data(statement) {
            Some(NodeData::InterfaceDeclaration(_)) => out.push(NodeRef::new(file, statement)),
            Some(NodeData::ModuleDeclaration(module)) => {
                let mut body = module.body;
                // `namespace A.B { }` nests declarations.
                while let Some(NodeData::ModuleDeclaration(inner)) = arena.get_data(body) {
                    body = inner.body;
                }
                if let Some(NodeData::ModuleBlock(block)) = arena.get_data(body) {
                    collect_interfaces(program, file, &block.statements.nodes, out);
                }
            }
            _ => {}
        }
    }
}
