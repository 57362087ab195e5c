//! Structural description of the commands a dispatcher exposes.
//!
//! Built once per generation run (by [`crate::scan`] or by hand) and consumed by
//! [`crate::generate`].

use std::collections::BTreeMap;
use std::fmt;

/// Type of one argument or return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// `isize`
    Int,
    /// `usize`
    UInt,
    /// `f32`
    Float32,
    /// `bool`
    Bool,
    /// `String`
    String,
    /// The error half of a `Result` return.
    Error,
    /// Anything the generator cannot parse from text.
    Opaque,
}

impl ValueKind {
    /// Rust type bound for this kind in generated code.
    pub fn rust_type(self) -> Option<&'static str> {
        match self {
            ValueKind::Int => Some("isize"),
            ValueKind::UInt => Some("usize"),
            ValueKind::Float32 => Some("f32"),
            ValueKind::Bool => Some("bool"),
            ValueKind::String => Some("String"),
            ValueKind::Error | ValueKind::Opaque => None,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rust_type() {
            Some(ty) => f.write_str(ty),
            None if *self == ValueKind::Error => f.write_str("error"),
            None => f.write_str("value"),
        }
    }
}

/// One argument or return value of a target function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: Option<String>,
    pub kind: ValueKind,
    /// Supplied through a named flag (`Option<T>`) rather than positionally.
    pub is_optional: bool,
}

impl Parameter {
    pub fn required(name: impl Into<String>, kind: ValueKind) -> Self {
        Self { name: Some(name.into()), kind, is_optional: false }
    }

    pub fn optional(name: impl Into<String>, kind: ValueKind) -> Self {
        Self { name: Some(name.into()), kind, is_optional: true }
    }

    /// Unnamed required value; the usual shape of a return value.
    pub fn unnamed(kind: ValueKind) -> Self {
        Self { name: None, kind, is_optional: false }
    }

    /// Name shown to users; `argument N` (1-based) when unnamed.
    pub fn label(&self, position: usize) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("argument {position}"),
        }
    }
}

/// Ordered arguments and return values. Order is call order and positional binding order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    pub arguments: Vec<Parameter>,
    pub returns: Vec<Parameter>,
}

impl Signature {
    /// Number of positional (non-optional) arguments.
    pub fn required_count(&self) -> usize {
        self.arguments.iter().filter(|p| !p.is_optional).count()
    }

    /// Number of `Error` returns; more than one is rejected by the generator.
    pub fn error_returns(&self) -> usize {
        self.returns.iter().filter(|p| p.kind == ValueKind::Error).count()
    }
}

/// A function exposed as a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Rust path of the target function, e.g. `crate::tools::add`.
    pub internal_name: String,
    /// Name users type.
    pub exposed_name: String,
    pub signature: Signature,
    pub description: String,
}

/// Every command of one generated dispatcher, keyed by exposed name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    /// Name of the generated module.
    pub module_name: String,
    pub commands: BTreeMap<String, Command>,
}

impl Program {
    pub fn new(module_name: impl Into<String>) -> Self {
        Self { module_name: module_name.into(), commands: BTreeMap::new() }
    }

    /// Add a command under its exposed name, returning the one it replaced.
    pub fn insert(&mut self, command: Command) -> Option<Command> {
        self.commands.insert(command.exposed_name.clone(), command)
    }

    /// Find a command the way generated dispatchers do, ignoring case.
    pub fn find(&self, name: &str) -> Option<&Command> {
        let key = name.to_lowercase();
        self.commands.values().find(|c| c.exposed_name.to_lowercase() == key)
    }
}
