//! Raw → cleaned record mapping.
//!
//! A raw record is any JSON object. The comment text is read from the first
//! configured text field holding a string (`body`, then `comment`); missing
//! or non-string text becomes an empty comment. An optional Unix-epoch
//! timestamp becomes a UTC calendar date such as `09 Sep 2001`.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CleanError, Result};
use crate::normalizer::CommentNormalizer;

pub const DEFAULT_DATE_FORMAT: &str = "%d %b %Y";

/// One input record, as decoded from JSON.
pub type RawRecord = Map<String, Value>;

/// One output record: both fields are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanedRecord {
    pub date: Option<String>,
    pub comment: String,
}

/// Which raw fields feed a [`CleanedRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecordFields {
    /// Text keys tried in order.
    pub text_fields: Vec<String>,
    pub timestamp_field: String,
    /// chrono strftime format for `date`.
    pub date_format: String,
}

impl Default for RecordFields {
    fn default() -> Self {
        Self {
            text_fields: vec!["body".to_string(), "comment".to_string()],
            timestamp_field: "created_utc".to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl RecordFields {
    pub fn validate(&self) -> Result<()> {
        if self.text_fields.is_empty() {
            return Err(CleanError::Configuration(
                "records.text_fields cannot be empty".to_string(),
            ));
        }
        if self.timestamp_field.trim().is_empty() {
            return Err(CleanError::Configuration(
                "records.timestamp_field cannot be empty".to_string(),
            ));
        }
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(CleanError::Configuration(format!(
                "records.date_format `{}` is not a valid strftime format",
                self.date_format
            )));
        }
        Ok(())
    }
}

/// Maps raw records to cleaned records through a [`CommentNormalizer`].
#[derive(Debug, Clone, Copy)]
pub struct RecordTransformer<'a> {
    normalizer: &'a CommentNormalizer,
    fields: &'a RecordFields,
}

impl<'a> RecordTransformer<'a> {
    pub fn new(normalizer: &'a CommentNormalizer, fields: &'a RecordFields) -> Self {
        Self { normalizer, fields }
    }

    /// Transform the record at position `index` of its batch.
    ///
    /// The comment may come back empty; callers filter those out. A present
    /// but unusable timestamp is an error rather than a missing date.
    pub fn transform(&self, index: usize, record: &RawRecord) -> Result<CleanedRecord> {
        let date = match record.get(&self.fields.timestamp_field) {
            Some(value) => format_timestamp(value, &self.fields.date_format)
                .map_err(|value| CleanError::UnparseableTimestamp { index, value })?,
            None => None,
        };

        let comment = self.normalizer.normalize_opt(self.raw_text(index, record));
        Ok(CleanedRecord { date, comment })
    }

    fn raw_text<'r>(&self, index: usize, record: &'r RawRecord) -> Option<&'r str> {
        for field in &self.fields.text_fields {
            match record.get(field) {
                Some(Value::String(text)) => return Some(text.as_str()),
                Some(Value::Null) | None => continue,
                Some(other) => {
                    log::debug!(
                        "event=non_text_field record={} field={} kind={}",
                        index,
                        field,
                        json_kind(other)
                    );
                }
            }
        }
        None
    }
}

/// Format an epoch-seconds value as a UTC date.
///
/// Null, `false` and blank strings mean "no timestamp". Integers, floats
/// (truncated) and integer strings are accepted; anything else is returned as
/// `Err` with the offending value rendered for the error message.
pub fn format_timestamp(value: &Value, date_format: &str) -> std::result::Result<Option<String>, String> {
    let seconds = match value {
        Value::Null | Value::Bool(false) => return Ok(None),
        Value::String(text) if text.trim().is_empty() => return Ok(None),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        _ => None,
    };

    let date = seconds
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .ok_or_else(|| value.to_string())?;
    Ok(Some(date.format(date_format).to_string()))
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
