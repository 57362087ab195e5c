//! CLI argument definitions and the generation run.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use cligen_codegen::{ScanOptions, generate, scan_dir};
use tracing::info;

/// Default output file name, written inside the scanned directory.
pub const DEFAULT_OUTPUT: &str = "commands.cligen.rs";

#[derive(Parser, Debug)]
#[command(name = "cligen")]
#[command(about = "Generate a command-line dispatcher from annotated Rust functions")]
#[command(version)]
pub struct Cli {
    /// Directory holding the annotated sources
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Output file [default: <DIR>/commands.cligen.rs]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Name of the generated module
    #[arg(short, long, default_value = "cli")]
    pub module: String,

    /// Path of the scanned crate as seen from the generated code
    #[arg(long, default_value = "crate")]
    pub crate_path: String,

    /// Print the generated code instead of writing it
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,

    /// Log debug output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| self.dir.join(DEFAULT_OUTPUT))
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions { module_name: self.module.clone(), crate_path: self.crate_path.clone() }
    }
}

/// Scan, generate, then emit. Nothing is written unless generation succeeded.
pub fn run(cli: &Cli) -> Result<()> {
    let source = render(&cli.dir, &cli.scan_options())?;

    if cli.stdout {
        print!("{source}");
        return Ok(());
    }

    let output = cli.output_path();
    fs::write(&output, &source).with_context(|| format!("failed to write {}", output.display()))?;
    info!(output = %output.display(), "wrote dispatcher");
    Ok(())
}

fn render(dir: &Path, options: &ScanOptions) -> Result<String> {
    let program = scan_dir(dir, options).with_context(|| format!("failed to scan {}", dir.display()))?;
    let source = generate(&program)
        .with_context(|| format!("failed to generate module `{}`", options.module_name))?;
    Ok(source)
}
