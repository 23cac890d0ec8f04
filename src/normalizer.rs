//! Comment normalization: rules, then contractions, then spelling.
//!
//! Stage order is fixed: the rule chain must run before contraction lookup
//! (URLs and noise are gone, apostrophes are still intact) and spelling runs
//! last so it sees whole expanded words. Any stage that leaves nothing but
//! whitespace ends the pipeline with an empty comment.

use crate::contractions::ContractionExpander;
use crate::rules::RuleSet;
use crate::spelling::{FrequencySpellCorrector, NoopSpellCorrector, SpellCorrector, WordFrequency};

/// Composes [`RuleSet`] → [`ContractionExpander`] → [`SpellCorrector`].
pub struct CommentNormalizer {
    rules: RuleSet,
    expander: ContractionExpander,
    speller: Box<dyn SpellCorrector + Send + Sync>,
}

impl std::fmt::Debug for CommentNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommentNormalizer")
            .field("rules", &self.rules.rules().len())
            .field("contractions", &self.expander.len())
            .finish_non_exhaustive()
    }
}

impl CommentNormalizer {
    pub fn new(
        rules: RuleSet,
        expander: ContractionExpander,
        speller: Box<dyn SpellCorrector + Send + Sync>,
    ) -> Self {
        Self {
            rules,
            expander,
            speller,
        }
    }

    /// Standard rules with the bundled English dictionary.
    pub fn standard() -> Self {
        Self::with_speller(FrequencySpellCorrector::new(WordFrequency::bundled()))
    }

    /// Standard rules and contractions, no spell correction.
    pub fn without_spelling() -> Self {
        Self::with_speller(NoopSpellCorrector)
    }

    /// Standard rules and contractions with an injected spelling model.
    pub fn with_speller(speller: impl SpellCorrector + Send + Sync + 'static) -> Self {
        Self::new(RuleSet::standard(), ContractionExpander::new(), Box::new(speller))
    }

    /// Normalize one raw comment. Returns `""` when nothing usable remains.
    pub fn normalize(&self, raw_comment: &str) -> String {
        let cleaned = self.rules.apply(raw_comment);
        if cleaned.is_empty() {
            return String::new();
        }

        let expanded = self.expander.expand(&cleaned);
        if expanded.trim().is_empty() {
            return String::new();
        }

        match self.speller.correct(&expanded) {
            Some(corrected) if !corrected.trim().is_empty() => corrected.trim().to_string(),
            _ => String::new(),
        }
    }

    /// [`normalize`](Self::normalize) for an optional comment; `None` is empty.
    pub fn normalize_opt(&self, raw_comment: Option<&str>) -> String {
        raw_comment
            .map(|text| self.normalize(text))
            .unwrap_or_default()
    }
}

impl Default for CommentNormalizer {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Adversarial inputs shared by the property-style tests below.
    const CORPUS: &[&str] = &[
        "",
        "   ",
        "@alice check http://x.com NOW!! :) ",
        "re: re: fwd: did u see https://t.co/abc?x=1 lol 😂😂",
        "I dont wanna recieve spam@mail.com at 10:30 pm",
        "well-known e.g. stuff... rock'n'roll!!",
        "Reply-To ###",
        "'cause im definately gonna win",
        "@@@ ::: ---",
        "mixed\tWHITESPACE\n\nand CAPS",
        "https://a.b/c@d http://e.f",
        "naïve café résumé 東京",
    ];

    struct Shout;

    impl SpellCorrector for Shout {
        fn correct(&self, text: &str) -> Option<String> {
            Some(text.to_uppercase())
        }
    }

    struct Blank;

    impl SpellCorrector for Blank {
        fn correct(&self, _text: &str) -> Option<String> {
            None
        }
    }

    #[test]
    fn test_end_to_end_example() {
        let normalizer = CommentNormalizer::standard();
        assert_eq!(
            normalizer.normalize("@alice check http://x.com NOW!! :) "),
            "check NOW"
        );
    }

    #[test]
    fn test_stages_compose() {
        let normalizer = CommentNormalizer::standard();
        assert_eq!(
            normalizer.normalize("I dont wanna recieve it at 10:30 pm"),
            "I do not want to receive it at"
        );
        assert_eq!(
            normalizer.normalize("'cause im definately gonna win"),
            "because I am definitely going to win"
        );
    }

    #[test]
    fn test_correct_words_are_not_rewritten() {
        let normalizer = CommentNormalizer::standard();
        for comment in [
            "my cats love hats",
            "the dogs were barking loudly",
            "bitcoin prices crashed hard",
            "python rust golang",
        ] {
            assert_eq!(normalizer.normalize(comment), comment);
        }
    }

    #[test]
    fn test_empty_results() {
        let normalizer = CommentNormalizer::standard();
        assert_eq!(normalizer.normalize(""), "");
        assert_eq!(normalizer.normalize("   "), "");
        assert_eq!(normalizer.normalize("@bob http://x.com 😀"), "");
        assert_eq!(normalizer.normalize_opt(None), "");
    }

    #[test]
    fn test_injected_speller() {
        let normalizer = CommentNormalizer::with_speller(Shout);
        assert_eq!(normalizer.normalize("dont stop"), "DO NOT STOP");

        let blank = CommentNormalizer::with_speller(Blank);
        assert_eq!(blank.normalize("perfectly fine text"), "");
    }

    #[test]
    fn test_without_spelling() {
        let normalizer = CommentNormalizer::without_spelling();
        assert_eq!(normalizer.normalize("recieve it"), "recieve it");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let normalizer = CommentNormalizer::standard();
        for sample in CORPUS {
            let once = normalizer.normalize(sample);
            assert_eq!(normalizer.normalize(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_no_urls_or_mentions_survive() {
        let normalizer = CommentNormalizer::standard();
        for sample in CORPUS {
            let out = normalizer.normalize(sample);
            assert!(!out.contains("http://"), "{out:?}");
            assert!(!out.contains("https://"), "{out:?}");
            assert!(!out.contains('@'), "{out:?}");
            assert_eq!(out.trim(), out);
        }
    }
}
