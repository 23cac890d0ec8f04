//! `comment-cleaner`: clean every JSON comment file in a folder.

use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use comment_cleaner::logging::init_logging;
use comment_cleaner::{CleanError, CleanerConfig, DatasetCleaner, DatasetSummary, FileOutcome};

/// Exit codes for the CLI.
mod exit_codes {
    /// Every file was processed.
    pub const OK: u8 = 0;
    /// At least one file failed and was left in place.
    pub const FILES_FAILED: u8 = 1;
    /// Bad arguments, configuration or input folder.
    pub const USAGE_ERROR: u8 = 2;
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Folder containing the JSON files to clean (prompted for when omitted)
    folder: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Word frequency list for spell correction (`word count` lines or JSON)
    #[arg(long)]
    dictionary: Option<PathBuf>,

    /// Skip spell correction
    #[arg(long)]
    no_spelling: bool,

    /// Keep input files after cleaning
    #[arg(long)]
    keep_source: bool,

    /// Also drop near-duplicate comments at or above this similarity (0-1]
    #[arg(long)]
    similarity: Option<f64>,

    /// Process and report without writing or deleting files
    #[arg(long)]
    dry_run: bool,

    /// Log level (trace|debug|info|warn|error); RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(err) = init_logging(&args.log_level) {
        eprintln!("error: {err}");
        return ExitCode::from(exit_codes::USAGE_ERROR);
    }

    match run(args) {
        Ok(summary) => {
            print_summary(&summary);
            if summary.failed() > 0 {
                ExitCode::from(exit_codes::FILES_FAILED)
            } else {
                ExitCode::from(exit_codes::OK)
            }
        }
        Err(err) => {
            log::error!("event=run_failed error={}", err);
            eprintln!("error: {err}");
            ExitCode::from(exit_codes::USAGE_ERROR)
        }
    }
}

fn run(args: Args) -> Result<DatasetSummary, CleanError> {
    let mut config = match &args.config {
        Some(path) => CleanerConfig::load(path)?,
        None => CleanerConfig::default(),
    };
    if args.dictionary.is_some() {
        config.spelling.dictionary = args.dictionary;
    }
    if args.no_spelling {
        config.spelling.enabled = false;
    }
    if args.keep_source {
        config.output.delete_source = false;
    }
    if args.similarity.is_some() {
        config.dedupe.similarity_threshold = args.similarity;
    }
    config.validate()?;

    let folder = match args.folder {
        Some(folder) => folder,
        None => prompt_folder()?,
    };

    let normalizer = config.build_normalizer()?;
    DatasetCleaner::new(folder, &config, &normalizer)
        .dry_run(args.dry_run)
        .clean_dataset()
}

fn prompt_folder() -> Result<PathBuf, CleanError> {
    print!("Enter the folder path containing JSON files: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(CleanError::Configuration("no folder given".to_string()));
    }
    Ok(PathBuf::from(trimmed))
}

fn print_summary(summary: &DatasetSummary) {
    for file in &summary.files {
        let name = file.source.display();
        match &file.outcome {
            FileOutcome::Written { output, report } => println!(
                "{name}: kept {} of {} -> {}",
                report.kept,
                report.total,
                output.display()
            ),
            FileOutcome::Empty { report } => {
                println!("{name}: no non-empty comments ({} records)", report.total)
            }
            FileOutcome::Failed { error } => println!("{name}: FAILED ({error})"),
        }
    }
    println!(
        "{} files: {} written, {} empty, {} failed",
        summary.files.len(),
        summary.written(),
        summary.empty(),
        summary.failed()
    );
}
