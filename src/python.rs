//! Python bindings (cargo feature `python`).

use once_cell::sync::Lazy;
use pyo3::exceptions::{PyOSError, PyValueError};
use pyo3::prelude::*;

use crate::batch::BatchProcessor;
use crate::config::CleanerConfig;
use crate::dataset::DatasetCleaner;
use crate::error::CleanError;
use crate::normalizer::CommentNormalizer;
use crate::record::RecordTransformer;

static NORMALIZER: Lazy<CommentNormalizer> = Lazy::new(CommentNormalizer::standard);

fn to_py_err(err: CleanError) -> PyErr {
    match err {
        CleanError::Io(err) => PyOSError::new_err(err.to_string()),
        other => PyValueError::new_err(other.to_string()),
    }
}

/// Normalize a single comment string.
#[pyfunction]
pub fn normalize_comment(text: &str) -> String {
    NORMALIZER.normalize(text)
}

/// Clean a JSON array of raw records and return the cleaned array as JSON.
///
/// Raises ValueError for non-list input or an unparseable timestamp.
#[pyfunction]
pub fn clean_records_json(json_text: &str) -> PyResult<String> {
    let input: serde_json::Value = serde_json::from_str(json_text)
        .map_err(|err| PyValueError::new_err(format!("invalid JSON: {err}")))?;

    let config = CleanerConfig::default();
    let transformer = RecordTransformer::new(&NORMALIZER, &config.records);
    let records = BatchProcessor::new(transformer, config.dedupe)
        .process(&input)
        .map_err(to_py_err)?;

    serde_json::to_string(&records).map_err(|err| PyValueError::new_err(err.to_string()))
}

/// Clean every JSON file in `path`.
///
/// Returns (files, written, failed).
#[pyfunction]
#[pyo3(signature = (path, delete_source=true))]
pub fn clean_folder(path: &str, delete_source: bool) -> PyResult<(usize, usize, usize)> {
    let mut config = CleanerConfig::default();
    config.output.delete_source = delete_source;

    let summary = DatasetCleaner::new(path, &config, &NORMALIZER)
        .clean_dataset()
        .map_err(to_py_err)?;
    Ok((summary.files.len(), summary.written(), summary.failed()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::CleanedRecord;
    use std::fs;
    use std::io;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_comment() {
        assert_eq!(normalize_comment("@alice check http://x.com NOW!! :) "), "check NOW");
        assert_eq!(normalize_comment("my cats love hats"), "my cats love hats");
    }

    #[test]
    fn test_clean_records_json() {
        let out = clean_records_json(
            r#"[
                {"body": "Great game!!", "created_utc": 0},
                {"body": "   "},
                {"body": "Great game"}
            ]"#,
        )
        .unwrap();
        let records: Vec<CleanedRecord> = serde_json::from_str(&out).unwrap();
        assert_eq!(
            records,
            vec![CleanedRecord {
                date: Some("01 Jan 1970".to_string()),
                comment: "Great game".to_string(),
            }]
        );
    }

    #[test]
    fn test_bad_batches_raise_value_error() {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| {
            for input in [
                r#"{"body": "not a list"}"#,
                "[1, 2]",
                r#"[{"body": "hi", "created_utc": "yesterday"}]"#,
                "{not json",
            ] {
                let err = clean_records_json(input).unwrap_err();
                assert!(err.is_instance_of::<PyValueError>(py), "{input}: {err}");
            }
        });
    }

    #[test]
    fn test_error_mapping() {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| {
            let io_err = to_py_err(CleanError::Io(io::Error::new(io::ErrorKind::NotFound, "gone")));
            assert!(io_err.is_instance_of::<PyOSError>(py));

            let config_err = to_py_err(CleanError::Configuration("bad".to_string()));
            assert!(config_err.is_instance_of::<PyValueError>(py));
        });
    }

    #[test]
    fn test_clean_folder() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("a_good.json");
        let broken = dir.path().join("b_broken.json");
        fs::write(&good, r#"[{"body": "hello there", "created_utc": 0}]"#).unwrap();
        fs::write(&broken, "{not json").unwrap();
        let path = dir.path().to_str().unwrap();

        assert_eq!(clean_folder(path, false).unwrap(), (2, 1, 1));
        assert!(good.exists());
        assert!(dir.path().join("clean_a_good.json").exists());

        assert_eq!(clean_folder(path, true).unwrap(), (2, 1, 1));
        assert!(!good.exists());
        assert!(broken.exists());
    }

    #[test]
    fn test_clean_folder_missing() {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| {
            let err = clean_folder("/nonexistent/comments", true).unwrap_err();
            assert!(err.is_instance_of::<PyValueError>(py));
        });
    }
}
