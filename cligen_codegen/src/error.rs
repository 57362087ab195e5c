use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while compiling a [`crate::Program`] into source text.
///
/// All of them are detected before any code is emitted.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("command `{command}` declares more than one error return")]
    MultipleErrorReturns { command: String },

    #[error("command `{command}`: required parameter `{parameter}` has a type that cannot be parsed from text")]
    UnsupportedType { command: String, parameter: String },

    #[error("command `{command}`: optional parameter #{position} has no name to match a flag against")]
    UnnamedOptional { command: String, position: usize },

    #[error("command `{command}`: parameter `{parameter}` cannot be of the error kind")]
    ErrorParameter { command: String, parameter: String },

    #[error("command `{command}` cannot be exposed as `help`, the name is reserved")]
    ReservedName { command: String },

    #[error("exposed command name `{name}` collides with another command")]
    DuplicateCommand { name: String },

    #[error("command registered as `{key}` is exposed as `{exposed}`")]
    MismatchedKey { key: String, exposed: String },

    #[error("command `{command}`: `{path}` is not a valid Rust path")]
    InvalidPath { command: String, path: String },

    #[error("`{name}` is not a valid module name")]
    InvalidModuleName { name: String },

    #[error("no unused identifier left to allocate")]
    IdentifiersExhausted,

    #[error("generated code does not parse: {0}")]
    Malformed(#[from] syn::Error),
}

/// Errors raised while discovering annotated functions.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: syn::Error,
    },

    #[error("{function}: {message}")]
    Directive { function: String, message: String },

    #[error("{function}: {message}")]
    Unsupported { function: String, message: String },

    #[error("{function}: `help` is reserved and cannot be used as a command name")]
    ReservedName { function: String },

    #[error("command `{name}` is exposed by both `{first}` and `{second}`")]
    DuplicateCommand { name: String, first: String, second: String },
}
