#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;

use tsgql_cli::args::CliArgs;
use tsgql_cli::{driver, tracing_config};

fn main() -> Result<()> {
    // Only installs a subscriber when TSGQL_LOG or RUST_LOG is set.
    tracing_config::init_tracing();

    let args = CliArgs::parse_from(std::env::args_os());
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;

    if let Err(err) = driver::run(&args, &cwd) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
    Ok(())
}
