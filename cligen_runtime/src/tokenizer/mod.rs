//! # Command-line slicing
//!
//! Splits a flat list of whitespace-separated tokens into named flags and
//! positional arguments.
//!
//! * Leading flags use one or two hyphens: `--name`, `--name=value`, `-v`, `-v=value`.
//! * A single hyphen followed by several characters is a bundle of short flags:
//!   `-sm=hello` is `-s -m=hello`.
//! * Flags without a value are set to `"true"`. Keys are stored lower-cased and a
//!   repeated key keeps its last value.
//! * The first token without a leading hyphen switches to positional mode for the
//!   rest of the input; hyphenated tokens after that point are positional too.
//! * A positional argument or flag value starting with `"` or `'` spans tokens until
//!   one ends with the same quote. The pieces are re-joined with single spaces.

use std::collections::HashMap;

use tracing::trace;

use crate::error::TokenizeError;

/// Flag name (lower-cased) to value.
pub type Flags = HashMap<String, String>;

const IMPLICIT_VALUE: &str = "true";

/// Slice `tokens` into flags and positional arguments.
pub fn slice<S: AsRef<str>>(tokens: &[S]) -> Result<(Flags, Vec<String>), TokenizeError> {
    let mut flags = Flags::new();
    let mut positionals = Vec::new();
    let mut rest = tokens.iter().map(|t| t.as_ref());
    let mut positional_mode = false;

    while let Some(token) = rest.next() {
        let hyphens = count_prefix(token, '-');

        // One-way switch: once a bare token is seen, everything else is positional.
        if hyphens == 0 {
            positional_mode = true;
        }

        if positional_mode {
            let value = match quote_delimiter(token) {
                Some(delim) => until_end_of_string(token, delim, &mut rest)?,
                None => token.to_owned(),
            };
            positionals.push(value);
            continue;
        }

        match hyphens {
            2 => {
                let (key, value) = flag_body(&token[2..], &mut rest)?;
                flags.insert(key.to_lowercase(), value);
            }
            1 => {
                let (key, value) = flag_body(&token[1..], &mut rest)?;
                let mut chars = key.chars();
                let last = chars.next_back();
                for c in chars {
                    flags.insert(c.to_lowercase().collect(), IMPLICIT_VALUE.to_owned());
                }
                // Always set: flag_body rejects an empty key.
                if let Some(last) = last {
                    flags.insert(last.to_lowercase().collect(), value);
                }
            }
            _ => return Err(TokenizeError::HyphenCount(token.to_owned())),
        }
    }

    trace!(flags = flags.len(), positionals = positionals.len(), "sliced command line");
    Ok((flags, positionals))
}

/// Parse `key`, `key=value` or `key="quoted value ..."`.
fn flag_body<'a>(
    body: &'a str,
    rest: &mut impl Iterator<Item = &'a str>,
) -> Result<(&'a str, String), TokenizeError> {
    let (key, value) = match body.split_once('=') {
        None => (body, None),
        Some((_, value)) if value.contains('=') => {
            return Err(TokenizeError::InvalidFlagFormat(body.to_owned()));
        }
        Some((key, value)) => (key, Some(value)),
    };

    if key.is_empty() {
        return Err(TokenizeError::EmptyFlagName);
    }

    let value = match value {
        None => IMPLICIT_VALUE.to_owned(),
        Some(value) => match quote_delimiter(value) {
            Some(delim) => until_end_of_string(value, delim, rest)?,
            None => value.to_owned(),
        },
    };

    Ok((key, value))
}

/// Collect a quoted literal starting at `start`, pulling further tokens from `rest`.
fn until_end_of_string<'a>(
    start: &'a str,
    delim: char,
    rest: &mut impl Iterator<Item = &'a str>,
) -> Result<String, TokenizeError> {
    let mut pieces: Vec<&str> = Vec::new();
    let mut current = &start[delim.len_utf8()..];

    loop {
        match current.find(delim) {
            None => pieces.push(current),
            Some(pos) if pos + delim.len_utf8() == current.len() => {
                pieces.push(&current[..pos]);
                return Ok(pieces.join(" "));
            }
            Some(_) => return Err(TokenizeError::MisplacedQuote(current.to_owned())),
        }
        current = rest.next().ok_or(TokenizeError::UnterminatedString)?;
    }
}

#[inline]
fn quote_delimiter(s: &str) -> Option<char> {
    s.chars().next().filter(|c| matches!(c, '"' | '\''))
}

#[inline]
fn count_prefix(s: &str, prefix: char) -> usize {
    s.chars().take_while(|&c| c == prefix).count()
}

// ================= TESTS ==========================
