//! Comment cleaning for corpus preparation.
//!
//! Turns batches of raw comment records (`body` + optional `created_utc`)
//! into `{date, comment}` records whose text is free of mentions, clock
//! times, emoji, URLs, punctuation noise and repeats:
//! 1. Rewrite rules (`rules`) strip noise in a fixed order
//! 2. Contractions are expanded (`contractions`)
//! 3. Tokens are spell-corrected against a frequency dictionary (`spelling`)
//! 4. Each batch drops empty comments and keeps the first of any repeat (`batch`)
//!
//! ```rust
//! use comment_cleaner::CommentNormalizer;
//!
//! let normalizer = CommentNormalizer::standard();
//! assert_eq!(normalizer.normalize("@alice check http://x.com NOW!! :) "), "check NOW");
//! ```

pub mod batch;
pub mod config;
pub mod contractions;
pub mod dataset;
pub mod dedupe;
pub mod error;
pub mod logging;
pub mod normalizer;
pub mod record;
pub mod rules;
pub mod spelling;

#[cfg(feature = "python")]
mod python;

pub use batch::{BatchProcessor, BatchReport};
pub use config::{CleanerConfig, OutputConfig, SpellingConfig};
pub use contractions::ContractionExpander;
pub use dataset::{DatasetCleaner, DatasetSummary, FileOutcome, FileResult};
pub use dedupe::{similarity_ratio, DedupPolicy, Deduplicator};
pub use error::{CleanError, Result};
pub use normalizer::CommentNormalizer;
pub use record::{CleanedRecord, RawRecord, RecordFields, RecordTransformer};
pub use rules::{NormalizationRule, RuleSet};
pub use spelling::{FrequencySpellCorrector, NoopSpellCorrector, SpellCorrector, WordFrequency};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Python module entry point.
#[cfg(feature = "python")]
#[pymodule]
fn comment_cleaner(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(python::normalize_comment, m)?)?;
    m.add_function(wrap_pyfunction!(python::clean_records_json, m)?)?;
    m.add_function(wrap_pyfunction!(python::clean_folder, m)?)?;
    Ok(())
}
