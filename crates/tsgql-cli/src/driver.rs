//! One ts2gql run: resolve the inputs, load, collect, emit, write.

use anyhow::{Context, Result, bail};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::args::CliArgs;
use crate::config::find_config;
use tsgql_binder::Program;

/// Inputs of a run after merging the command line over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub root: PathBuf,
    pub types: Vec<String>,
    pub output: Option<PathBuf>,
}

impl Invocation {
    pub fn resolve(args: &CliArgs, cwd: &Path) -> Result<Invocation> {
        let config = find_config(args.config.as_deref(), cwd)?.unwrap_or_default();

        let root = match (&args.root, config.root) {
            (Some(root), _) => cwd.join(root),
            (None, Some(root)) => root,
            (None, None) => bail!("No root file given: pass ROOT_FILE or set \"root\" in ts2gql.json"),
        };
        let types = if args.types.is_empty() {
            config.types
        } else {
            args.types.clone()
        };
        let output = match &args.output {
            Some(output) => Some(cwd.join(output)),
            None => config.output,
        };
        Ok(Invocation {
            root,
            types,
            output,
        })
    }
}

/// Load `root`, collect from `types` and render the schema.
pub fn compile(root: &Path, types: &[String]) -> Result<String> {
    let program = Program::load(root)?;
    debug!(files = program.files().len(), "loaded program");

    let graph = tsgql_collector::load(&program, types)?;
    if graph.is_empty() {
        bail!(
            "Nothing to emit from {}: name root types or tag an interface with @graphql schema",
            root.display()
        );
    }
    tsgql_emitter::emit(&graph)
}

pub fn run(args: &CliArgs, cwd: &Path) -> Result<()> {
    let invocation = Invocation::resolve(args, cwd)?;
    info!(root = %invocation.root.display(), types = ?invocation.types, "compiling");

    let schema = compile(&invocation.root, &invocation.types)?;
    match &invocation.output {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(path, &schema)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(output = %path.display(), bytes = schema.len(), "wrote schema");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(schema.as_bytes())
                .context("failed to write schema to stdout")?;
            stdout.flush()?;
        }
    }
    Ok(())
}
