//! Batch processing: transform every record, then drop empties and repeats.

use serde_json::Value;

use crate::dedupe::DedupPolicy;
use crate::error::{CleanError, Result};
use crate::record::{json_kind, CleanedRecord, RawRecord, RecordTransformer};

/// Counts for one processed batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub total: usize,
    pub kept: usize,
    pub empty: usize,
    pub duplicates: usize,
}

/// Cleans one batch of raw records.
#[derive(Debug, Clone, Copy)]
pub struct BatchProcessor<'a> {
    transformer: RecordTransformer<'a>,
    policy: DedupPolicy,
}

impl<'a> BatchProcessor<'a> {
    pub fn new(transformer: RecordTransformer<'a>, policy: DedupPolicy) -> Self {
        Self {
            transformer,
            policy,
        }
    }

    /// Clean a decoded JSON document, which must be an array of objects.
    pub fn process(&self, input: &Value) -> Result<Vec<CleanedRecord>> {
        self.process_with_report(input).map(|(records, _)| records)
    }

    /// [`process`](Self::process) plus batch counts.
    pub fn process_with_report(&self, input: &Value) -> Result<(Vec<CleanedRecord>, BatchReport)> {
        let records = as_records(input)?;
        self.process_records(&records)
    }

    /// Clean already-validated records.
    ///
    /// Every record is transformed first, so a bad timestamp anywhere fails
    /// the whole batch before any output exists. Survivors keep their input
    /// order; for repeated comments the earliest record (and its date) wins.
    pub fn process_records(
        &self,
        records: &[&RawRecord],
    ) -> Result<(Vec<CleanedRecord>, BatchReport)> {
        let transformed = records
            .iter()
            .enumerate()
            .map(|(index, record)| self.transformer.transform(index, record))
            .collect::<Result<Vec<CleanedRecord>>>()?;

        let mut report = BatchReport {
            total: transformed.len(),
            ..Default::default()
        };
        let mut dedup = self.policy.deduplicator();
        let mut kept = Vec::with_capacity(transformed.len());

        for record in transformed {
            if record.comment.trim().is_empty() {
                report.empty += 1;
            } else if !dedup.accept(&record.comment) {
                report.duplicates += 1;
            } else {
                kept.push(record);
            }
        }
        report.kept = kept.len();

        log::debug!(
            "event=batch_processed total={} kept={} empty={} duplicates={}",
            report.total,
            report.kept,
            report.empty,
            report.duplicates
        );
        Ok((kept, report))
    }
}

/// Check that `input` is an array of objects, borrowing each record.
fn as_records(input: &Value) -> Result<Vec<&RawRecord>> {
    let Some(items) = input.as_array() else {
        return Err(CleanError::BatchInputType(format!(
            "expected an array, found {}",
            json_kind(input)
        )));
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.as_object().ok_or_else(|| {
                CleanError::BatchInputType(format!(
                    "record {index} is {}, expected an object",
                    json_kind(item)
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::CommentNormalizer;
    use crate::record::RecordFields;
    use serde_json::json;

    fn run(input: Value, policy: DedupPolicy) -> Result<(Vec<CleanedRecord>, BatchReport)> {
        let normalizer = CommentNormalizer::standard();
        let fields = RecordFields::default();
        let processor = BatchProcessor::new(RecordTransformer::new(&normalizer, &fields), policy);
        processor.process_with_report(&input)
    }

    #[test]
    fn test_blank_comment_dropped() {
        let (records, report) = run(json!([{"body": "   "}]), DedupPolicy::exact()).unwrap();
        assert!(records.is_empty());
        assert_eq!(report.empty, 1);
    }

    #[test]
    fn test_duplicates_keep_earliest_date() {
        let input = json!([
            {"body": "Great game!!", "created_utc": 0},
            {"body": "nothing here", "created_utc": 86_400},
            {"body": "@fan great game", "created_utc": 1_000_000_000},
            {"body": "great game"},
        ]);
        let (records, report) = run(input, DedupPolicy::exact()).unwrap();
        assert_eq!(
            records,
            vec![
                CleanedRecord {
                    date: Some("01 Jan 1970".to_string()),
                    comment: "Great game".to_string(),
                },
                CleanedRecord {
                    date: Some("02 Jan 1970".to_string()),
                    comment: "nothing here".to_string(),
                },
                CleanedRecord {
                    date: Some("09 Sep 2001".to_string()),
                    comment: "great game".to_string(),
                },
            ]
        );
        assert_eq!(
            report,
            BatchReport {
                total: 4,
                kept: 3,
                empty: 0,
                duplicates: 1,
            }
        );
    }

    #[test]
    fn test_fuzzy_policy() {
        let input = json!([
            {"body": "Great game"},
            {"body": "great game"},
        ]);
        let (records, report) = run(input, DedupPolicy::fuzzy(0.95)).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(report.duplicates, 1);
    }

    #[test]
    fn test_end_to_end_record() {
        let input = json!([{"body": "@alice check http://x.com NOW!! :) ", "created_utc": 1_000_000_000}]);
        let (records, _) = run(input, DedupPolicy::exact()).unwrap();
        assert_eq!(
            records,
            vec![CleanedRecord {
                date: Some("09 Sep 2001".to_string()),
                comment: "check NOW".to_string(),
            }]
        );
    }

    #[test]
    fn test_non_list_input_rejected() {
        let err = run(json!({"body": "hi"}), DedupPolicy::exact()).unwrap_err();
        assert!(matches!(err, CleanError::BatchInputType(_)));
        let err = run(json!([{"body": "hi"}, "oops"]), DedupPolicy::exact()).unwrap_err();
        assert!(err.to_string().contains("record 1 is string"));
    }

    #[test]
    fn test_bad_timestamp_fails_whole_batch() {
        let input = json!([
            {"body": "fine", "created_utc": 0},
            {"body": "broken", "created_utc": "soon"},
        ]);
        let err = run(input, DedupPolicy::exact()).unwrap_err();
        assert!(matches!(err, CleanError::UnparseableTimestamp { index: 1, .. }));
    }

    #[test]
    fn test_empty_batch() {
        let (records, report) = run(json!([]), DedupPolicy::exact()).unwrap();
        assert!(records.is_empty());
        assert_eq!(report, BatchReport::default());
    }
}
