use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use cligen_codegen::{ScanOptions, generate, scan_dir};

fn main() -> Result<()> {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").context("CARGO_MANIFEST_DIR not set")?);
    let sources = manifest_dir.join("../usercode/src");
    println!("cargo:rerun-if-changed={}", sources.display());

    let options = ScanOptions { module_name: "commands".to_owned(), crate_path: "::usercode".to_owned() };
    let program = scan_dir(&sources, &options).context("failed to scan usercode")?;
    let code = generate(&program).context("failed to generate the command dispatcher")?;

    let out_dir = PathBuf::from(env::var("OUT_DIR").context("OUT_DIR not set")?);
    fs::write(out_dir.join("commands.rs"), code).context("failed to write commands.rs")?;
    Ok(())
}
