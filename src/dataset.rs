//! Folder-level cleaning: one JSON file in, one cleaned JSON file out.
//!
//! Each `*.json` file directly inside the folder is one batch. A file whose
//! batch cleans to nothing produces no output. The source file is removed
//! after processing unless configured otherwise, but only when processing
//! succeeded; a failing file is left in place and reported.

use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::batch::{BatchProcessor, BatchReport};
use crate::config::CleanerConfig;
use crate::error::{CleanError, Result};
use crate::normalizer::CommentNormalizer;
use crate::record::{CleanedRecord, RecordTransformer};

/// What happened to one input file.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    /// Cleaned records were written to `output`.
    Written { output: PathBuf, report: BatchReport },
    /// Nothing survived cleaning; no output was written.
    Empty { report: BatchReport },
    /// Processing failed; the source file was kept.
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileResult {
    pub source: PathBuf,
    pub outcome: FileOutcome,
}

/// Per-file results of a [`DatasetCleaner::clean_dataset`] run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetSummary {
    pub files: Vec<FileResult>,
}

impl DatasetSummary {
    pub fn written(&self) -> usize {
        self.count(|outcome| matches!(outcome, FileOutcome::Written { .. }))
    }

    pub fn empty(&self) -> usize {
        self.count(|outcome| matches!(outcome, FileOutcome::Empty { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, FileOutcome::Failed { .. }))
    }

    /// Records kept across all successfully processed files.
    pub fn records_kept(&self) -> usize {
        self.files
            .iter()
            .map(|file| match &file.outcome {
                FileOutcome::Written { report, .. } => report.kept,
                _ => 0,
            })
            .sum()
    }

    fn count(&self, predicate: impl Fn(&FileOutcome) -> bool) -> usize {
        self.files.iter().filter(|file| predicate(&file.outcome)).count()
    }
}

/// Cleans every JSON file in one folder.
///
/// The normalizer (and its dictionary) is built once by the caller and shared
/// by all files; each file gets its own deduplication state.
#[derive(Debug)]
pub struct DatasetCleaner<'a> {
    folder: PathBuf,
    config: &'a CleanerConfig,
    normalizer: &'a CommentNormalizer,
    dry_run: bool,
}

impl<'a> DatasetCleaner<'a> {
    pub fn new(
        folder: impl Into<PathBuf>,
        config: &'a CleanerConfig,
        normalizer: &'a CommentNormalizer,
    ) -> Self {
        Self {
            folder: folder.into(),
            config,
            normalizer,
            dry_run: false,
        }
    }

    /// Process and report without writing or deleting anything.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// `*.json` files directly inside the folder, sorted by name.
    pub fn list_input_files(&self) -> Result<Vec<PathBuf>> {
        if !self.folder.is_dir() {
            return Err(CleanError::Configuration(format!(
                "input folder '{}' is not a directory",
                self.folder.display()
            )));
        }

        let prefix = &self.config.output.prefix;
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.folder)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.file_type().is_file())
        {
            let path = entry.path();
            let Some(ext) = path.extension().and_then(|v| v.to_str()) else {
                continue;
            };
            if !ext.eq_ignore_ascii_case("json") {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if self.config.output.skip_cleaned_inputs && name.starts_with(prefix.as_str()) {
                log::debug!("event=file_skipped file={} reason=already_cleaned", name);
                continue;
            }
            files.push(path.to_path_buf());
        }
        Ok(files)
    }

    /// Clean every input file, continuing past per-file failures.
    pub fn clean_dataset(&self) -> Result<DatasetSummary> {
        let inputs = self.list_input_files()?;
        log::info!(
            "event=dataset_start folder={} files={} dry_run={}",
            self.folder.display(),
            inputs.len(),
            self.dry_run
        );

        let mut summary = DatasetSummary::default();
        for (position, source) in inputs.into_iter().enumerate() {
            log::info!("event=file_start file={} position={}", source.display(), position + 1);
            let outcome = match self.clean_file(&source) {
                Ok(outcome) => outcome,
                Err(err) => {
                    log::warn!(
                        "event=file_failed file={} error={}",
                        source.display(),
                        err
                    );
                    FileOutcome::Failed {
                        error: err.to_string(),
                    }
                }
            };
            summary.files.push(FileResult { source, outcome });
        }

        log::info!(
            "event=dataset_done written={} empty={} failed={} records_kept={}",
            summary.written(),
            summary.empty(),
            summary.failed(),
            summary.records_kept()
        );
        Ok(summary)
    }

    /// Clean one file. On error nothing is written and the source is kept.
    pub fn clean_file(&self, source: &Path) -> Result<FileOutcome> {
        let text = fs::read_to_string(source)?;
        let input: Value = serde_json::from_str(&text).map_err(|err| CleanError::Json {
            path: source.to_path_buf(),
            source: err,
        })?;

        let transformer = RecordTransformer::new(self.normalizer, &self.config.records);
        let processor = BatchProcessor::new(transformer, self.config.dedupe);
        let (records, report) = processor.process_with_report(&input)?;

        let outcome = if records.is_empty() {
            log::info!(
                "event=file_cleaned file={} kept=0 empty={} duplicates={} output=none",
                source.display(),
                report.empty,
                report.duplicates
            );
            FileOutcome::Empty { report }
        } else {
            let output = self.output_path(source);
            if !self.dry_run {
                write_records(&output, &records)?;
            }
            log::info!(
                "event=file_cleaned file={} kept={} empty={} duplicates={} output={}",
                source.display(),
                report.kept,
                report.empty,
                report.duplicates,
                output.display()
            );
            FileOutcome::Written { output, report }
        };

        if self.config.output.delete_source && !self.dry_run {
            fs::remove_file(source)?;
            log::info!("event=source_removed file={}", source.display());
        }
        Ok(outcome)
    }

    fn output_path(&self, source: &Path) -> PathBuf {
        let name = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        source.with_file_name(format!("{}{}", self.config.output.prefix, name))
    }
}

/// Write records as pretty-printed JSON (2-space indent).
pub fn write_records(path: &Path, records: &[CleanedRecord]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, records).map_err(|err| CleanError::Json {
        path: path.to_path_buf(),
        source: err,
    })?;
    writer.flush()?;
    Ok(())
}
