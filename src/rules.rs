//! Comment rewrite rules: the ordered regex chain applied to raw text.
//!
//! Each rule is a compiled pattern plus a replacement. Rules run in a fixed
//! order and every rule sees the output of the previous one, so the order is
//! part of the contract: URLs are removed while their `://` and dots are still
//! intact, and apostrophes survive character filtering so contractions can be
//! expanded later.
//!
//! The word-dropping rules (period, hyphen and glued punctuation) are
//! deliberately aggressive. They remove legitimate compounds such as
//! `well-known` and contraction forms such as `don't`; that loss is accepted.

use once_cell::sync::Lazy;
use regex::Regex;

// ── Patterns ────────────────────────────────────────────────────────

// @handle mentions, up to the next whitespace
static MENTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"@[^\s]+").unwrap());

// 24h clock times with an optional am/pm marker ("12:34", "09:15 pm")
static CLOCK_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:[01]\d|2[0-3]):(?:[0-5]\d)\s*(?:[ap]\.?m\.?)?\b").unwrap()
});

// Emoji and pictographic symbol blocks. The last range is intentionally wide
// and also covers enclosed alphanumerics, CJK and other symbol planes.
static EMOJI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"[\x{1F600}-\x{1F64F}]|[\x{1F300}-\x{1F5FF}]|[\x{1F680}-\x{1F6FF}]",
        r"|[\x{1F700}-\x{1F77F}]|[\x{1F780}-\x{1F7FF}]|[\x{1F800}-\x{1F8FF}]",
        r"|[\x{1F900}-\x{1F9FF}]|[\x{1FA00}-\x{1FA6F}]|[\x{1FA70}-\x{1FAFF}]",
        r"|[\x{2702}-\x{27B0}]|[\x{24C2}-\x{1F251}]",
    ))
    .unwrap()
});

// Two or more leading lowercase "re:" / "fwd:" markers
static REPLY_MARKERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\s*(?:re|fwd):\s*){2,}").unwrap());

// http(s) URLs over the URL-safe character set
static URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://(?:[a-zA-Z]|[0-9]|[$-_@.&+]|[!*\\(\\),]|(?:%[0-9a-fA-F][0-9a-fA-F]))+")
        .unwrap()
});

// Anything that is not a word character, whitespace, apostrophe or hyphen
static SPECIAL_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s'-]").unwrap());

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static PERIOD_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w*\.\w+\b").unwrap());

static HYPHEN_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w*-\w+\b").unwrap());

// Punctuation glued between word fragments ("it's", "a,b", "wait!what")
static GLUED_PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\b\w*[.,;'"!?]+\w+\b"#).unwrap());

// A whole comment that is only a "Reply-To" marker followed by symbols
static MINIMAL_REPLY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*Reply-To [^\w\s]+\s*$").unwrap());

static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+@\S+").unwrap());

// ── Rule set ────────────────────────────────────────────────────────

/// One step of the rewrite chain.
#[derive(Debug, Clone)]
pub struct NormalizationRule {
    /// Short identifier used in debug logs.
    pub name: &'static str,
    pub matcher: Regex,
    pub replacement: &'static str,
}

impl NormalizationRule {
    pub fn new(name: &'static str, matcher: Regex, replacement: &'static str) -> Self {
        Self {
            name,
            matcher,
            replacement,
        }
    }

    fn rewrite(&self, text: &str) -> String {
        self.matcher
            .replace_all(text, self.replacement)
            .into_owned()
    }
}

static STANDARD_RULES: Lazy<Vec<NormalizationRule>> = Lazy::new(|| {
    vec![
        NormalizationRule::new("mention", MENTION.clone(), ""),
        NormalizationRule::new("clock_time", CLOCK_TIME.clone(), ""),
        NormalizationRule::new("emoji", EMOJI.clone(), ""),
        NormalizationRule::new("reply_markers", REPLY_MARKERS.clone(), ""),
        NormalizationRule::new("url", URL.clone(), ""),
        NormalizationRule::new("special_chars", SPECIAL_CHARS.clone(), ""),
        NormalizationRule::new("whitespace", WHITESPACE_RUN.clone(), " "),
        NormalizationRule::new("period_word", PERIOD_WORD.clone(), ""),
        NormalizationRule::new("hyphen_word", HYPHEN_WORD.clone(), ""),
        NormalizationRule::new("glued_punctuation", GLUED_PUNCTUATION.clone(), ""),
        NormalizationRule::new("minimal_reply", MINIMAL_REPLY.clone(), ""),
        NormalizationRule::new("email", EMAIL.clone(), ""),
    ]
});

/// Ordered chain of [`NormalizationRule`]s.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<NormalizationRule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl RuleSet {
    /// The comment-cleaning chain.
    pub fn standard() -> Self {
        Self {
            rules: STANDARD_RULES.clone(),
        }
    }

    /// A chain made of caller-supplied rules, applied in the given order.
    pub fn new(rules: Vec<NormalizationRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[NormalizationRule] {
        &self.rules
    }

    /// Run every rule over `text` and tidy the result.
    ///
    /// Blank input and text that a rule empties return `""` immediately.
    /// The result never has leading, trailing or repeated whitespace.
    pub fn apply(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return String::new();
        }

        let mut result = text.to_string();
        for rule in &self.rules {
            result = rule.rewrite(&result);
            if result.trim().is_empty() {
                log::trace!("event=rule_emptied rule={}", rule.name);
                return String::new();
            }
        }

        tidy_whitespace(&result)
    }
}

/// Collapse whitespace runs to one space and trim both ends.
///
/// Word-dropping rules leave double spaces behind; tidying here keeps the
/// chain idempotent.
pub fn tidy_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<&str>>().join(" ")
}
