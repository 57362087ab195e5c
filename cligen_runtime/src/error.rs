use std::error::Error as StdError;

use thiserror::Error;

/// Errors raised by [`crate::slice`] for malformed command lines.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    /// A flag token starts with more than two hyphens.
    #[error("flags must have one or two leading hyphens: {0:?}")]
    HyphenCount(String),

    /// A flag body contains more than one `=`.
    #[error("invalid flag format: {0:?}")]
    InvalidFlagFormat(String),

    /// Input ended inside a quoted literal.
    #[error("unterminated string literal")]
    UnterminatedString,

    /// The closing quote of a literal is not the last character of its token.
    #[error("closing quote must be followed by whitespace: {0:?}")]
    MisplacedQuote(String),

    /// A flag token carries no key (`-`, `--`, `--=value`).
    #[error("flag name must not be empty")]
    EmptyFlagName,
}

/// Errors raised while resolving which command to run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    /// No command name was given.
    #[error("insufficient arguments")]
    Insufficient,

    /// The command name matches no known command.
    #[error("no matching target found for {0:?}")]
    NoMatchingTarget(String),

    /// Fewer positional arguments than required parameters.
    #[error("not enough arguments: expected at least {expected}, found {found}")]
    NotEnough { expected: usize, found: usize },
}

/// A token could not be converted into the type of its parameter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot convert {value:?} into {expected} for `{parameter}`")]
pub struct ConversionError {
    /// Parameter name, or `argument N` for unnamed positionals.
    pub parameter: String,
    /// The offending token.
    pub value: String,
    /// Rust type the token was converted into.
    pub expected: &'static str,
}

/// Error returned by a generated `start` function.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    #[error(transparent)]
    Tokenize(#[from] TokenizeError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// Error returned by the invoked command itself.
    #[error(transparent)]
    Command(Box<dyn StdError + Send + Sync + 'static>),
}

impl DispatchError {
    /// Wrap the error returned by a target function.
    pub fn command<E>(err: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync + 'static>>,
    {
        DispatchError::Command(err.into())
    }
}
