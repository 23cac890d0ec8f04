//! Cleaner configuration, loadable from TOML.
//!
//! ```toml
//! [records]
//! text_fields = ["body", "comment"]
//! timestamp_field = "created_utc"
//! date_format = "%d %b %Y"
//!
//! [output]
//! prefix = "clean_"
//! delete_source = true
//! skip_cleaned_inputs = true
//!
//! [spelling]
//! enabled = true
//! dictionary = "/data/en_full.txt"
//! max_edit_distance = 1
//! min_word_len = 4
//! min_frequency = 100
//!
//! [dedupe]
//! similarity_threshold = 0.9
//! ```
//!
//! Every section and key is optional.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::dedupe::DedupPolicy;
use crate::error::{CleanError, Result};
use crate::normalizer::CommentNormalizer;
use crate::record::RecordFields;
use crate::spelling::{FrequencySpellCorrector, WordFrequency, DEFAULT_MIN_FREQUENCY};

/// Where and how cleaned files are written.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// File name prefix of written output.
    pub prefix: String,
    /// Remove each input file once it has been processed.
    pub delete_source: bool,
    /// Ignore inputs whose name already carries `prefix`.
    pub skip_cleaned_inputs: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            prefix: "clean_".to_string(),
            delete_source: true,
            skip_cleaned_inputs: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpellingConfig {
    pub enabled: bool,
    /// Frequency list to use instead of the bundled one.
    pub dictionary: Option<PathBuf>,
    pub max_edit_distance: u8,
    pub min_word_len: usize,
    pub min_frequency: u64,
}

impl Default for SpellingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dictionary: None,
            max_edit_distance: 1,
            min_word_len: 4,
            min_frequency: DEFAULT_MIN_FREQUENCY,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CleanerConfig {
    pub records: RecordFields,
    pub output: OutputConfig,
    pub spelling: SpellingConfig,
    pub dedupe: DedupPolicy,
}

impl CleanerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)
            .map_err(|err| CleanError::Configuration(format!("invalid config: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|err| {
            CleanError::Configuration(format!("cannot read '{}': {err}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        self.records.validate()?;
        if self.output.prefix.is_empty() {
            return Err(CleanError::Configuration(
                "output.prefix cannot be empty".to_string(),
            ));
        }
        if !(1..=2).contains(&self.spelling.max_edit_distance) {
            return Err(CleanError::Configuration(format!(
                "spelling.max_edit_distance must be 1 or 2, got {}",
                self.spelling.max_edit_distance
            )));
        }
        if let Some(threshold) = self.dedupe.similarity_threshold {
            if !(threshold > 0.0 && threshold <= 1.0) {
                return Err(CleanError::Configuration(format!(
                    "dedupe.similarity_threshold must be in (0, 1], got {threshold}"
                )));
            }
        }
        Ok(())
    }

    /// Build the normalization pipeline, loading the spell dictionary once.
    pub fn build_normalizer(&self) -> Result<CommentNormalizer> {
        if !self.spelling.enabled {
            log::info!("event=spelling_disabled");
            return Ok(CommentNormalizer::without_spelling());
        }

        let dictionary = match &self.spelling.dictionary {
            Some(path) => WordFrequency::load(path)?,
            None => WordFrequency::bundled(),
        };
        log::info!(
            "event=spelling_ready words={} max_edit_distance={}",
            dictionary.len(),
            self.spelling.max_edit_distance
        );

        let speller = FrequencySpellCorrector::new(dictionary)
            .with_max_edit_distance(self.spelling.max_edit_distance)
            .with_min_word_len(self.spelling.min_word_len)
            .with_min_frequency(self.spelling.min_frequency);
        Ok(CommentNormalizer::with_speller(speller))
    }
}
