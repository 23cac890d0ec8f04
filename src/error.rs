use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for batch, dataset, dictionary and configuration failures.
///
/// Missing text fields and comments that normalize to nothing are not errors;
/// they become empty comments and are dropped by the batch filter.
#[derive(Debug, Error)]
pub enum CleanError {
    #[error("record {index}: timestamp {value} is not a valid unix epoch")]
    UnparseableTimestamp { index: usize, value: String },
    #[error("batch input must be a list of records: {0}")]
    BatchInputType(String),
    #[error("invalid JSON in '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("spell dictionary error: {0}")]
    Dictionary(String),
    #[error("configuration error: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, CleanError>;
