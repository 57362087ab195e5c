//! Text-to-value conversion for bound parameters.
//!
//! Every primitive takes the raw token and the parameter label used in the
//! error report. Integers are base 10 only.

use std::str::FromStr;

use crate::error::ConversionError;

#[inline]
fn convert<T: FromStr>(raw: &str, parameter: &str, expected: &'static str) -> Result<T, ConversionError> {
    raw.parse::<T>().map_err(|_| ConversionError {
        parameter: parameter.to_owned(),
        value: raw.to_owned(),
        expected,
    })
}

/// Signed integer at native machine width.
pub fn parse_int(raw: &str, parameter: &str) -> Result<isize, ConversionError> {
    convert(raw, parameter, "isize")
}

/// Unsigned integer at native machine width.
pub fn parse_uint(raw: &str, parameter: &str) -> Result<usize, ConversionError> {
    convert(raw, parameter, "usize")
}

/// Floating-point literal at 32-bit precision.
pub fn parse_f32(raw: &str, parameter: &str) -> Result<f32, ConversionError> {
    convert(raw, parameter, "f32")
}

/// Accepts exactly `true` or `false`.
pub fn parse_bool(raw: &str, parameter: &str) -> Result<bool, ConversionError> {
    convert(raw, parameter, "bool")
}
