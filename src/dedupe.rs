//! Batch-scoped deduplication of normalized comments.
//!
//! A [`Deduplicator`] owns the set of comments accepted so far in one batch.
//! Exact repeats are always rejected; with a similarity threshold it also
//! rejects near-duplicates scored by a longest-common-subsequence ratio.
//! The first accepted occurrence always wins.

use serde::Deserialize;
use std::collections::HashSet;

/// How a batch decides that a comment repeats an earlier one.
///
/// Built once per run from configuration; each batch gets a fresh
/// [`Deduplicator`] from it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DedupPolicy {
    /// Reject comments at least this similar (0.0-1.0) to an accepted one.
    /// `None` means exact matches only.
    pub similarity_threshold: Option<f64>,
}

impl DedupPolicy {
    pub fn exact() -> Self {
        Self::default()
    }

    pub fn fuzzy(threshold: f64) -> Self {
        Self {
            similarity_threshold: Some(threshold),
        }
    }

    pub fn deduplicator(&self) -> Deduplicator {
        Deduplicator::new(*self)
    }
}

/// The seen-set for one batch.
#[derive(Debug, Clone, Default)]
pub struct Deduplicator {
    policy: DedupPolicy,
    seen: HashSet<String>,
    // Casefolded accepted comments, in acceptance order; fuzzy mode only.
    accepted: Vec<String>,
}

impl Deduplicator {
    pub fn new(policy: DedupPolicy) -> Self {
        Self {
            policy,
            seen: HashSet::new(),
            accepted: Vec::new(),
        }
    }

    /// Record `comment` if it is new to this batch.
    ///
    /// Returns `false` for an exact repeat, or for a near-duplicate when the
    /// policy has a similarity threshold.
    pub fn accept(&mut self, comment: &str) -> bool {
        if self.seen.contains(comment) {
            return false;
        }

        if let Some(threshold) = self.policy.similarity_threshold {
            let folded = fold_comment(comment);
            if self
                .accepted
                .iter()
                .any(|earlier| raw_similarity_ratio(&folded, earlier) >= threshold)
            {
                return false;
            }
            self.accepted.push(folded);
        }

        self.seen.insert(comment.to_string());
        true
    }

    /// Number of comments accepted so far.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Lowercase `comment` word by word, joined with single spaces.
pub fn fold_comment(comment: &str) -> String {
    let mut folded = String::with_capacity(comment.len());
    for word in comment.split_whitespace() {
        if !folded.is_empty() {
            folded.push(' ');
        }
        folded.extend(word.chars().flat_map(char::to_lowercase));
    }
    folded
}

/// Similarity ratio between two comments (0.0 to 1.0).
///
/// `2 * M / T` where `M` is the longest common subsequence of the casefolded
/// texts and `T` their combined length. Pairs whose lengths differ by more
/// than half return the length ratio without running the LCS.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    raw_similarity_ratio(&fold_comment(a), &fold_comment(b))
}

/// Ratio on already-normalized strings.
fn raw_similarity_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let total = a_chars.len() + b_chars.len();

    let len_ratio = a_chars.len().min(b_chars.len()) as f64 / a_chars.len().max(b_chars.len()) as f64;
    if len_ratio < 0.5 {
        return len_ratio;
    }

    2.0 * common_subsequence_len(&a_chars, &b_chars) as f64 / total as f64
}

/// Longest common subsequence length, one DP row over the shorter input.
fn common_subsequence_len(a: &[char], b: &[char]) -> usize {
    let (outer, inner) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut row = vec![0usize; inner.len() + 1];

    for &x in outer {
        // row[j] from the previous outer step
        let mut diagonal = 0;
        for (j, &y) in inner.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if x == y {
                diagonal + 1
            } else {
                above.max(row[j])
            };
            diagonal = above;
        }
    }
    row[inner.len()]
}
