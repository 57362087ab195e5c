//! # cligen code generation
//!
//! Turns annotated Rust functions into a dispatcher module:
//!
//! 1. [`scan_dir`] reads a directory of sources and extracts every function carrying a
//!    `/// cligen:` directive into a [`Program`].
//! 2. [`generate`] compiles a [`Program`] into Rust source text defining
//!    `pub mod <module> { ... pub fn start(..) }`.
//!
//! The generated text depends on `cligen_runtime` for slicing and conversion.
//!
//! ```ignore
//! // build.rs
//! let program = cligen_codegen::scan_dir("../usercode/src", &options)?;
//! let source = cligen_codegen::generate(&program)?;
//! std::fs::write(out_dir.join("commands.rs"), source)?;
//! ```

pub mod commandsgen;
pub mod error;
pub mod ident;
pub mod ir;
pub mod scan;

pub use commandsgen::{generate, generate_with};
pub use error::{GenerationError, ScanError};
pub use ident::IdentAllocator;
pub use ir::{Command, Parameter, Program, Signature, ValueKind};
pub use scan::{ScanOptions, scan_dir, scan_source};

/// Command name handled by every generated dispatcher; never available to user commands.
pub const RESERVED_COMMAND: &str = "help";
