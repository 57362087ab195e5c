//! cligen - generate a command-line dispatcher from annotated Rust functions.
//!
//! ```text
//! cligen [DIR] [--output FILE] [--module NAME] [--crate-path PATH] [--stdout]
//! ```

mod cli;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // stdout may carry generated code
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    cli::run(&cli)
}
