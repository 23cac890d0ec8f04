//! Contraction expansion: "can't" → "cannot", "gonna" → "going to".
//!
//! The table is generated at build time from `config/contractions.toml`.
//! Lookup is per whitespace token and case-insensitive; the expansion takes
//! the casing of the token it replaces.

use once_cell::sync::Lazy;
use std::collections::HashMap;

include!(concat!(env!("OUT_DIR"), "/contractions.rs"));

static LOOKUP: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| CONTRACTIONS.iter().copied().collect());

/// Expands informal contractions against the static mapping table.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContractionExpander;

impl ContractionExpander {
    pub fn new() -> Self {
        Self
    }

    /// Number of known contractions.
    pub fn len(&self) -> usize {
        CONTRACTIONS.len()
    }

    pub fn is_empty(&self) -> bool {
        CONTRACTIONS.is_empty()
    }

    /// Expansion for a single token, ignoring case.
    pub fn lookup(&self, token: &str) -> Option<&'static str> {
        LOOKUP.get(token.to_lowercase().as_str()).copied()
    }

    /// Replace every known contraction in `text`.
    ///
    /// Tokens not in the table pass through unchanged; whitespace between
    /// tokens is collapsed to single spaces.
    pub fn expand(&self, text: &str) -> String {
        text.split_whitespace()
            .map(|token| match self.lookup(token) {
                Some(expansion) => match_case(token, expansion),
                None => token.to_string(),
            })
            .collect::<Vec<String>>()
            .join(" ")
    }
}

/// Give `expansion` the casing of `token`: ALL CAPS stays all caps,
/// a leading capital capitalizes the first letter.
fn match_case(token: &str, expansion: &str) -> String {
    let letters: Vec<char> = token.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.len() > 1 && letters.iter().all(|c| c.is_uppercase()) {
        return expansion.to_uppercase();
    }
    if letters.first().is_some_and(|c| c.is_uppercase()) {
        let mut chars = expansion.chars();
        return match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
    }
    expansion.to_string()
}
