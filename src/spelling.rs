//! Spell correction against a word-frequency dictionary.
//!
//! The normalizer only depends on the [`SpellCorrector`] trait so the model
//! can be swapped or stubbed. [`FrequencySpellCorrector`] is the default:
//! candidates within one or two edits of an unknown token are looked up in a
//! [`WordFrequency`] table and the most frequent one wins.
//!
//! Correction policy:
//! - only all-lowercase ASCII tokens of at least `min_word_len` characters are
//!   corrected; capitalized tokens are treated as proper nouns or acronyms;
//! - tokens with digits, apostrophes or hyphens are left alone;
//! - a token is known, and kept, when it is in the dictionary or is a regular
//!   inflection (`-s`, `-es`, `-ed`, `-ing`, `-er`, `-est`, `-ly`) of a
//!   dictionary word;
//! - a candidate must have at least `min_frequency` occurrences
//!   ([`DEFAULT_MIN_FREQUENCY`] unless configured); without one the token is
//!   left as is;
//! - edit distance 2 is opt-in and only tried when distance 1 yields nothing.
//!
//! The bundled list holds about 33k lowercase English words.

use once_cell::sync::Lazy;
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use crate::error::{CleanError, Result};

/// Minimum dictionary count for a correction candidate.
pub const DEFAULT_MIN_FREQUENCY: u64 = 100;

const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

// (suffix, stem ending) pairs tried when deciding whether a token is a
// regular inflection of a known word
const INFLECTIONS: &[(&str, &str)] = &[
    ("ies", "y"),
    ("ied", "y"),
    ("ier", "y"),
    ("iest", "y"),
    ("ily", "y"),
    ("es", ""),
    ("s", ""),
    ("ed", ""),
    ("ed", "e"),
    ("ing", ""),
    ("ing", "e"),
    ("er", ""),
    ("er", "e"),
    ("est", ""),
    ("est", "e"),
    ("ly", ""),
];

// Suffixes that double a final consonant ("stopped", "running")
const DOUBLING: &[&str] = &["ed", "ing", "er", "est"];

const MIN_STEM_LEN: usize = 3;
const BUNDLED_FREQUENCIES: &str = include_str!("../data/en_word_frequency.txt");

static BUNDLED_DICTIONARY: Lazy<WordFrequency> =
    Lazy::new(|| WordFrequency::parse(BUNDLED_FREQUENCIES).unwrap());

/// Corrects misspelled tokens in a normalized comment.
pub trait SpellCorrector {
    /// Returns the corrected text, or `None` when there is no usable content.
    fn correct(&self, text: &str) -> Option<String>;
}

/// Passes text through unchanged. Used when spelling is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSpellCorrector;

impl SpellCorrector for NoopSpellCorrector {
    fn correct(&self, text: &str) -> Option<String> {
        if text.trim().is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }
}

/// Word → occurrence count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordFrequency {
    counts: HashMap<String, u64>,
}

impl WordFrequency {
    /// The English list shipped with the crate.
    pub fn bundled() -> Self {
        BUNDLED_DICTIONARY.clone()
    }

    /// Parse `word [count]` lines. Blank lines and `#` comments are skipped;
    /// a missing count means 1.
    pub fn parse(text: &str) -> Result<Self> {
        let mut dictionary = Self::default();
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.split_whitespace();
            let Some(word) = parts.next() else {
                continue;
            };
            let count = match parts.next() {
                Some(raw) => raw.parse::<u64>().map_err(|err| {
                    CleanError::Dictionary(format!(
                        "line {}: invalid count `{raw}`: {err}",
                        line_no + 1
                    ))
                })?,
                None => 1,
            };
            if parts.next().is_some() {
                return Err(CleanError::Dictionary(format!(
                    "line {}: expected `word [count]`",
                    line_no + 1
                )));
            }
            dictionary.insert(word, count);
        }
        Ok(dictionary)
    }

    /// Parse a JSON object of `{"word": count}`.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let raw: HashMap<String, u64> = serde_json::from_str(text)
            .map_err(|err| CleanError::Dictionary(format!("invalid JSON dictionary: {err}")))?;
        let mut dictionary = Self::default();
        for (word, count) in raw {
            dictionary.insert(&word, count);
        }
        Ok(dictionary)
    }

    /// Load a dictionary file; `.json` files are read as a JSON object,
    /// anything else as `word [count]` lines.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let dictionary = if is_json {
            Self::from_json_str(&text)?
        } else {
            Self::parse(&text)?
        };
        if dictionary.is_empty() {
            return Err(CleanError::Dictionary(format!(
                "'{}' contains no words",
                path.display()
            )));
        }
        log::debug!(
            "event=dictionary_loaded path={} words={}",
            path.display(),
            dictionary.len()
        );
        Ok(dictionary)
    }

    /// Add `count` occurrences of `word` (stored lowercase).
    pub fn insert(&mut self, word: &str, count: u64) {
        *self.counts.entry(word.to_lowercase()).or_insert(0) += count;
    }

    pub fn frequency(&self, word: &str) -> u64 {
        self.counts.get(word).copied().unwrap_or(0)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.counts.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Frequency-ranked edit-distance corrector.
#[derive(Debug, Clone)]
pub struct FrequencySpellCorrector {
    dictionary: WordFrequency,
    max_edit_distance: u8,
    min_word_len: usize,
    min_frequency: u64,
}

impl FrequencySpellCorrector {
    pub fn new(dictionary: WordFrequency) -> Self {
        Self {
            dictionary,
            max_edit_distance: 1,
            min_word_len: 4,
            min_frequency: DEFAULT_MIN_FREQUENCY,
        }
    }

    /// Clamped to 1..=2.
    pub fn with_max_edit_distance(mut self, distance: u8) -> Self {
        self.max_edit_distance = distance.clamp(1, 2);
        self
    }

    pub fn with_min_word_len(mut self, len: usize) -> Self {
        self.min_word_len = len;
        self
    }

    pub fn with_min_frequency(mut self, frequency: u64) -> Self {
        self.min_frequency = frequency;
        self
    }

    pub fn dictionary(&self) -> &WordFrequency {
        &self.dictionary
    }

    /// Best replacement for one token, or `None` to keep it as is.
    pub fn correct_word(&self, word: &str) -> Option<String> {
        if !self.is_correctable(word) {
            return None;
        }

        let first = edits1(word);
        if let Some(best) = self.best_known(first.iter()) {
            return Some(best);
        }
        if self.max_edit_distance < 2 {
            return None;
        }
        let second: HashSet<String> = first.iter().flat_map(|edit| edits1(edit)).collect();
        self.best_known(second.iter())
    }

    /// In the dictionary, or a regular inflection of a dictionary word.
    pub fn is_known(&self, word: &str) -> bool {
        self.dictionary.contains(word)
            || inflection_stems(word)
                .iter()
                .any(|stem| stem.len() >= MIN_STEM_LEN && self.dictionary.contains(stem))
    }

    fn is_correctable(&self, word: &str) -> bool {
        word.len() >= self.min_word_len
            && word.bytes().all(|b| b.is_ascii_lowercase())
            && !self.is_known(word)
    }

    fn best_known<'a>(&self, candidates: impl Iterator<Item = &'a String>) -> Option<String> {
        candidates
            .filter_map(|candidate| {
                let frequency = self.dictionary.frequency(candidate);
                (frequency >= self.min_frequency.max(1)).then_some((frequency, candidate))
            })
            .max_by_key(|(frequency, candidate)| (*frequency, Reverse(*candidate)))
            .map(|(_, candidate)| candidate.clone())
    }
}

impl SpellCorrector for FrequencySpellCorrector {
    fn correct(&self, text: &str) -> Option<String> {
        if text.trim().is_empty() {
            return None;
        }
        let corrected: Vec<String> = text
            .split_whitespace()
            .map(|token| match self.correct_word(token) {
                Some(replacement) => {
                    log::trace!("event=spell_correct from={} to={}", token, replacement);
                    replacement
                }
                None => token.to_string(),
            })
            .collect();
        Some(corrected.join(" "))
    }
}

/// Possible base forms of `word` under the regular suffix rules.
fn inflection_stems(word: &str) -> Vec<String> {
    let mut stems = Vec::new();
    for (suffix, ending) in INFLECTIONS {
        let Some(stem) = word.strip_suffix(suffix) else {
            continue;
        };
        // "glass" is not a plural of "glas"
        if *suffix == "s" && stem.ends_with('s') {
            continue;
        }
        stems.push(format!("{stem}{ending}"));

        if ending.is_empty() && DOUBLING.contains(suffix) {
            let mut tail = stem.chars().rev();
            if let (Some(last), Some(before)) = (tail.next(), tail.next()) {
                if last == before {
                    stems.push(stem[..stem.len() - last.len_utf8()].to_string());
                }
            }
        }
    }
    stems
}

/// All strings one delete, transpose, replace or insert away from `word`.
/// `word` must be ASCII.
fn edits1(word: &str) -> HashSet<String> {
    let bytes = word.as_bytes();
    let mut edits = HashSet::new();

    for i in 0..=bytes.len() {
        let (left, right) = word.split_at(i);

        if !right.is_empty() {
            edits.insert(format!("{left}{}", &right[1..]));
        }
        if right.len() > 1 {
            let r = right.as_bytes();
            edits.insert(format!(
                "{left}{}{}{}",
                r[1] as char,
                r[0] as char,
                &right[2..]
            ));
        }
        for c in ALPHABET.chars() {
            if !right.is_empty() {
                edits.insert(format!("{left}{c}{}", &right[1..]));
            }
            edits.insert(format!("{left}{c}{right}"));
        }
    }

    edits.remove(word);
    edits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corrector() -> FrequencySpellCorrector {
        FrequencySpellCorrector::new(WordFrequency::bundled())
    }

    #[test]
    fn test_bundled_dictionary() {
        let dictionary = WordFrequency::bundled();
        assert!(dictionary.len() > 30_000);
        assert!(dictionary.contains("because"));
        assert!(!dictionary.contains("dont"));
        assert!(!dictionary.contains("gonna"));
        assert!(dictionary.frequency("the") > dictionary.frequency("weird"));
    }

    #[test]
    fn test_parse_dictionary() {
        let dictionary = WordFrequency::parse("# header\nApple 10\nbanana\n\n").unwrap();
        assert_eq!(dictionary.frequency("apple"), 10);
        assert_eq!(dictionary.frequency("banana"), 1);
        assert!(WordFrequency::parse("apple ten").is_err());
        assert!(WordFrequency::parse("apple 1 2").is_err());
    }

    #[test]
    fn test_json_dictionary() {
        let dictionary = WordFrequency::from_json_str(r#"{"hello": 5, "World": 2}"#).unwrap();
        assert_eq!(dictionary.frequency("world"), 2);
        assert!(WordFrequency::from_json_str("[1, 2]").is_err());
    }

    #[test]
    fn test_edits1_size() {
        // n deletes + (n-1) transposes + 26n replaces + 26(n+1) inserts, minus duplicates
        let edits = edits1("abc");
        assert!(edits.contains("ab"));
        assert!(edits.contains("bac"));
        assert!(edits.contains("abd"));
        assert!(edits.contains("abcd"));
        assert!(!edits.contains("abc"));
    }

    #[test]
    fn test_corrects_distance_one() {
        let speller = corrector();
        assert_eq!(speller.correct_word("recieve").as_deref(), Some("receive"));
        assert_eq!(speller.correct_word("becuase").as_deref(), Some("because"));
        assert_eq!(speller.correct_word("definately").as_deref(), Some("definitely"));
    }

    #[test]
    fn test_corrects_distance_two() {
        let speller = corrector().with_max_edit_distance(2);
        assert_eq!(speller.correct_word("wierdd").as_deref(), Some("weird"));
        assert_eq!(corrector().correct_word("wierdd"), None);
    }

    #[test]
    fn test_policy_leaves_tokens_alone() {
        let speller = corrector();
        assert_eq!(speller.correct_word("Recieve"), None);
        assert_eq!(speller.correct_word("teh"), None);
        assert_eq!(speller.correct_word("recieve2"), None);
        assert_eq!(speller.correct_word("check"), None);
        assert_eq!(speller.correct_word("xqzvjkw"), None);
    }

    #[test]
    fn test_min_frequency_threshold() {
        let mut dictionary = WordFrequency::default();
        dictionary.insert("rare", 2);
        let speller = FrequencySpellCorrector::new(dictionary).with_min_frequency(5);
        assert_eq!(speller.correct_word("rarr"), None);
    }

    #[test]
    fn test_default_threshold_ignores_rare_candidates() {
        let mut dictionary = WordFrequency::default();
        dictionary.insert("rare", DEFAULT_MIN_FREQUENCY - 1);
        dictionary.insert("core", DEFAULT_MIN_FREQUENCY);
        let speller = FrequencySpellCorrector::new(dictionary);
        assert_eq!(speller.correct_word("rarr"), None);
        assert_eq!(speller.correct_word("corr").as_deref(), Some("core"));
    }

    #[test]
    fn test_ordinary_words_pass_through() {
        let speller = corrector();
        for sentence in [
            "my cats love hats",
            "the dogs were barking loudly",
            "bitcoin prices crashed hard",
            "python rust golang",
            "the salty dude drank toxic kale lattes",
        ] {
            assert_eq!(speller.correct(sentence).as_deref(), Some(sentence));
        }
    }

    #[test]
    fn test_inflections_of_known_words() {
        let mut dictionary = WordFrequency::default();
        for word in ["hat", "stop", "bake", "city", "quick", "hate"] {
            dictionary.insert(word, 1000);
        }
        let speller = FrequencySpellCorrector::new(dictionary);
        for word in ["hats", "stopped", "baked", "cities", "quickly", "hating", "stopping"] {
            assert!(speller.is_known(word), "{word} should be known");
            assert_eq!(speller.correct_word(word), None);
        }
        assert!(!speller.is_known("hatx"));
        assert!(inflection_stems("glass").is_empty());
        assert_eq!(inflection_stems("running"), vec!["runn", "run", "runne"]);
    }

    #[test]
    fn test_ties_break_lexicographically() {
        let mut dictionary = WordFrequency::default();
        dictionary.insert("cart", 300);
        dictionary.insert("card", 300);
        let speller = FrequencySpellCorrector::new(dictionary);
        assert_eq!(speller.correct_word("carx").as_deref(), Some("card"));
    }

    #[test]
    fn test_correct_text() {
        let speller = corrector();
        assert_eq!(
            speller.correct("I recieve NOW the post").as_deref(),
            Some("I receive NOW the post")
        );
        assert_eq!(speller.correct("   "), None);
        assert_eq!(NoopSpellCorrector.correct("keep as is").as_deref(), Some("keep as is"));
        assert_eq!(NoopSpellCorrector.correct(""), None);
    }

    #[test]
    fn test_correction_is_stable() {
        let speller = corrector();
        let once = speller.correct("definately a wierd idae").unwrap();
        assert_eq!(speller.correct(&once).unwrap(), once);
    }
}
