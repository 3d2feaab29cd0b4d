use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the ts2gql binary.
#[derive(Parser, Debug)]
#[command(
    name = "ts2gql",
    version,
    about = "Convert TypeScript interface declarations into a GraphQL schema"
)]
pub struct CliArgs {
    /// TypeScript file whose exported interfaces are the schema roots.
    #[arg(value_name = "ROOT_FILE")]
    pub root: Option<PathBuf>,

    /// Exported interfaces to use as roots, in addition to any tagged
    /// `@graphql schema`.
    #[arg(value_name = "TYPE_NAMES")]
    pub types: Vec<String>,

    /// Write the schema to this file instead of stdout.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Path to a ts2gql.json config file.
    #[arg(short = 'p', long)]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
#[path = "tests/args_tests.rs"]
mod args_tests;
