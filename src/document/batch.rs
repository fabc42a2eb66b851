//! Folding a rule over every file of a values directory.
//!
//! A failing file is logged and recorded, then the scan moves on. Only
//! errors that concern the directory itself abort the batch.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::Result;

use super::transform::{Rule, Tally, Transformer};
use super::values_dir::{display_name, ValuesDir};

/// What happened to a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    /// At least one entry changed and the file was rewritten (or would be, in a dry run).
    Updated,
    /// Nothing matched; the file was left untouched.
    Unchanged,
    /// The file could not be processed.
    Failed {
        /// Error description.
        reason: String,
    },
}

/// Per-file outcome.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport<T> {
    /// File name.
    pub file: String,
    /// Outcome.
    #[serde(flatten)]
    pub status: FileStatus,
    /// Entries modified in this file.
    pub modified: usize,
    /// Rule statistics for this file.
    pub tally: T,
}

/// Aggregate outcome of a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport<T> {
    /// Rule name.
    pub rule: String,
    /// Whether files were left unwritten.
    pub dry_run: bool,
    /// One entry per file, in processing order.
    pub files: Vec<FileReport<T>>,
    /// Sum of the per-file tallies of updated files.
    pub total: T,
}

impl<T> BatchReport<T> {
    /// Number of files that were updated.
    #[must_use]
    pub fn updated_count(&self) -> usize {
        self.files.iter().filter(|f| f.status == FileStatus::Updated).count()
    }

    /// Number of files left unchanged.
    #[must_use]
    pub fn unchanged_count(&self) -> usize {
        self.files.iter().filter(|f| f.status == FileStatus::Unchanged).count()
    }

    /// Number of files that failed.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.status, FileStatus::Failed { .. }))
            .count()
    }

    /// Total entries modified across all updated files.
    #[must_use]
    pub fn entries_modified(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.status == FileStatus::Updated)
            .map(|f| f.modified)
            .sum()
    }
}

/// Options for a batch run.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    /// Compute changes without writing files.
    pub dry_run: bool,
}

/// Applies a transformer to every values file in `dir`.
///
/// # Errors
///
/// Returns an error only if the directory cannot be listed. Per-file failures
/// are recorded in the report.
pub fn run_batch<R: Rule>(
    dir: &ValuesDir,
    transformer: &Transformer<R>,
    options: BatchOptions,
) -> Result<BatchReport<R::Tally>> {
    let rule = transformer.rule().name();
    info!("Running '{rule}' over {}", dir.root().display());

    let mut report = BatchReport {
        rule: rule.to_string(),
        dry_run: options.dry_run,
        files: Vec::new(),
        total: R::Tally::default(),
    };

    for (path, loaded) in dir.documents()? {
        let file = display_name(&path);
        info!("Processing file: {file}");

        let outcome = loaded.and_then(|mut doc| {
            let result = transformer.apply(&mut doc.value)?;
            if !result.is_unchanged() && !options.dry_run {
                doc.save()?;
            }
            Ok(result)
        });

        let file_report = match outcome {
            Ok(result) if result.is_unchanged() => {
                info!("No changes made to file: {file}");
                FileReport {
                    file,
                    status: FileStatus::Unchanged,
                    modified: 0,
                    tally: R::Tally::default(),
                }
            }
            Ok(result) => {
                if options.dry_run {
                    info!("Would update file: {file} ({} entries)", result.modified);
                } else {
                    info!("Updated file: {file} ({} entries)", result.modified);
                }
                report.total.merge(&result.tally);
                FileReport {
                    file,
                    status: FileStatus::Updated,
                    modified: result.modified,
                    tally: result.tally,
                }
            }
            Err(e) => {
                warn!("Error processing file {file}: {e}");
                FileReport {
                    file,
                    status: FileStatus::Failed {
                        reason: e.to_string(),
                    },
                    modified: 0,
                    tally: R::Tally::default(),
                }
            }
        };

        report.files.push(file_report);
    }

    debug!(
        "Batch '{rule}' finished: {} updated, {} unchanged, {} failed",
        report.updated_count(),
        report.unchanged_count(),
        report.failed_count()
    );

    Ok(report)
}
