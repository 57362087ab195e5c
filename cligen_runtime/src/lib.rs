//! # cligen runtime
//!
//! Support code reached from dispatchers generated by `cligen_codegen`.
//!
//! - [`slice`] splits raw command-line tokens into flags and positional arguments.
//! - [`parse_int`], [`parse_uint`], [`parse_f32`] and [`parse_bool`] convert one token
//!   into the typed value bound to a target parameter.
//! - [`DispatchError`] is the error returned by every generated `start` function.
//!
//! Generated code depends on the exact splitting rules of [`slice`]; changing them
//! requires regenerating every dispatcher built against this crate.

pub mod convert;
pub mod error;
pub mod tokenizer;

pub use convert::{parse_bool, parse_f32, parse_int, parse_uint};
pub use error::{ArgumentError, ConversionError, DispatchError, TokenizeError};
pub use tokenizer::{Flags, slice};
