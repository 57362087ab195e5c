//! Collision-free identifiers for generated code.
//!
//! Every local, variant and binding the generator emits is drawn from a seeded
//! pseudo-random stream, so two runs over the same [`crate::Program`] produce the
//! same text. Identifiers only contain the letters `a`..`j` (digits are shifted
//! onto letters) and are never reused within one generation.

use std::collections::HashSet;

use proc_macro2::{Ident, Span};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::trace;

use crate::error::GenerationError;

/// Seed used by [`IdentAllocator::new`].
pub const DEFAULT_SEED: u64 = 45_986_749_679_038_456;

/// Candidates are drawn from `0..ID_RANGE` and rendered in hex.
const ID_RANGE: u32 = 100_000;

/// Consecutive rejected candidates tolerated before giving up.
const MAX_ATTEMPTS: u32 = 4 * ID_RANGE;

/// Strict and reserved keywords, including the edition 2024 `gen`.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "Self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Issues short, unique, deterministic identifiers for generated code.
///
/// Names are drawn from a seeded ChaCha8 stream, so the same seed and the same
/// sequence of calls always yield the same names.
pub struct IdentAllocator {
    rng: ChaCha8Rng,
    used: HashSet<String>,
}

impl Default for IdentAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentAllocator {
    /// Allocator seeded with [`DEFAULT_SEED`].
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Allocator with its own seed and nothing reserved.
    pub fn with_seed(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed), used: HashSet::new() }
    }

    /// Keep `name` from ever being issued.
    pub fn reserve(&mut self, name: impl Into<String>) {
        self.used.insert(name.into());
    }

    /// Next unused identifier. `exported` capitalizes the first letter.
    pub fn next(&mut self, exported: bool) -> Result<Ident, GenerationError> {
        let name = self.next_name(exported)?;
        Ok(Ident::new(&name, Span::call_site()))
    }

    /// Like [`next`](Self::next) but returns the bare name. Fails with
    /// `IdentifiersExhausted` once every draw keeps hitting a used name.
    pub fn next_name(&mut self, exported: bool) -> Result<String, GenerationError> {
        for _ in 0..MAX_ATTEMPTS {
            let candidate = render(self.rng.random_range(0..ID_RANGE), exported);
            if KEYWORDS.contains(&candidate.as_str()) || self.used.contains(&candidate) {
                continue;
            }
            trace!(ident = %candidate, "allocated identifier");
            self.used.insert(candidate.clone());
            return Ok(candidate);
        }
        Err(GenerationError::IdentifiersExhausted)
    }
}

/// Hex digits `0`..`9` become `a`..`j`; the first letter's case follows `exported`.
fn render(value: u32, exported: bool) -> String {
    let mut name = String::new();
    for (i, c) in format!("{value:x}").chars().enumerate() {
        let letter = match c.to_digit(10) {
            Some(d) => char::from(b'a' + d as u8),
            None => c,
        };
        if i == 0 && exported {
            name.push(letter.to_ascii_uppercase());
        } else {
            name.push(letter);
        }
    }
    name
}
