//! Output formatting for CLI commands.
//!
//! This module provides formatting utilities for displaying
//! batch reports, set differences and onboarding results in text or JSON.

use colored::Colorize;
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::clickup::{OnboardingPreview, OnboardingReport};
use crate::document::{BatchReport, FileStatus, Tally};
use crate::rules::{CommentTally, MemoryTally, SetDifference};

use super::commands::OutputFormat;

/// Summary lines a tally contributes to the text report.
pub trait TallySummary {
    /// Label/value pairs printed under the file table.
    fn summary_lines(&self) -> Vec<(&'static str, String)>;
}

impl TallySummary for () {
    fn summary_lines(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

impl TallySummary for MemoryTally {
    fn summary_lines(&self) -> Vec<(&'static str, String)> {
        let increase = self.increase_percent().map_or_else(
            || format!("{:.2} Gi", self.increase_gi()),
            |pct| format!("{:.2} Gi ({pct}%)", self.increase_gi()),
        );
        vec![
            ("Total original memory", format!("{:.2} Gi", self.original_gi)),
            ("Total limit memory", format!("{:.2} Gi", self.limit_gi)),
            ("Memory increase", increase),
        ]
    }
}

impl TallySummary for CommentTally {
    fn summary_lines(&self) -> Vec<(&'static str, String)> {
        vec![("Keys commented", self.keys_commented.to_string())]
    }
}

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// File row for table display.
#[derive(Tabled)]
struct FileRow {
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Modified")]
    modified: usize,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a batch report for display.
    #[must_use]
    pub fn format_batch<T: Tally + TallySummary>(&self, report: &BatchReport<T>) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report).unwrap_or_default(),
            OutputFormat::Text => Self::format_batch_text(report),
        }
    }

    fn format_batch_text<T: Tally + TallySummary>(report: &BatchReport<T>) -> String {
        let mut output = String::new();

        let mode = if report.dry_run { " (dry run)" } else { "" };
        let _ = write!(output, "\n{}{mode}\n\n", report.rule.bold());

        if report.files.is_empty() {
            output.push_str("   No values files found.\n");
            return output;
        }

        let rows: Vec<FileRow> = report
            .files
            .iter()
            .map(|f| FileRow {
                file: f.file.clone(),
                status: Self::format_file_status(&f.status),
                modified: f.modified,
            })
            .collect();

        output.push_str(&Table::new(rows).to_string());
        output.push('\n');

        let _ = writeln!(output, "\nFiles processed: {}", report.updated_count());
        let _ = writeln!(output, "Entries modified: {}", report.entries_modified());
        for (label, value) in report.total.summary_lines() {
            let _ = writeln!(output, "{label}: {value}");
        }

        let _ = write!(
            output,
            "\nResult: {} updated, {} unchanged, {} failed\n",
            report.updated_count().to_string().green(),
            report.unchanged_count().to_string().dimmed(),
            report.failed_count().to_string().red()
        );

        if report.failed_count() > 0 {
            let _ = write!(output, "\n{} Errors:\n", "⚠".yellow());
            for file in &report.files {
                if let FileStatus::Failed { reason } = &file.status {
                    let _ = writeln!(output, "   - {}: {reason}", file.file);
                }
            }
        }

        output
    }

    /// Formats a set difference.
    #[must_use]
    pub fn format_set_difference(&self, diff: &SetDifference) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&serde_json::json!({
                "elements": diff.elements,
                "size": diff.len(),
            }))
            .unwrap_or_default(),
            OutputFormat::Text => {
                if diff.is_empty() {
                    return format!("{} The first set is contained in the second.\n", "✓".green());
                }

                let mut output = String::from("Elements in set1 but not in set2:\n");
                for element in &diff.elements {
                    let _ = writeln!(output, "{element}");
                }
                let _ = writeln!(output, "Size of the difference: {}", diff.len());
                output
            }
        }
    }

    /// Formats the tasks created for an environment.
    #[must_use]
    pub fn format_onboarding(&self, report: &OnboardingReport) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report).unwrap_or_default(),
            OutputFormat::Text => {
                let mut output = format!(
                    "{} Created onboarding tasks for {}\n\n",
                    "✓".green(),
                    report.environment_code.bold()
                );
                let _ = writeln!(
                    output,
                    "   Main task: {}{}",
                    report.main_task.id,
                    report
                        .main_task
                        .url
                        .as_deref()
                        .map_or_else(String::new, |url| format!(" ({url})"))
                );
                let _ = writeln!(output, "   Subtasks: {}", report.subtasks.len());
                output
            }
        }
    }

    /// Formats the request bodies of a dry run.
    #[must_use]
    pub fn format_onboarding_preview(&self, preview: &OnboardingPreview) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(preview).unwrap_or_default(),
            OutputFormat::Text => {
                let mut output = format!(
                    "{} Dry run, nothing sent to {}\n\n",
                    "⚠".yellow(),
                    preview.endpoint
                );
                let _ = writeln!(output, "{}", serde_json::to_string_pretty(&preview.main_task).unwrap_or_default());
                for subtask in &preview.subtasks {
                    let _ = writeln!(output, "   - {}", subtask.name);
                }
                output
            }
        }
    }

    /// Formats a file status with color.
    fn format_file_status(status: &FileStatus) -> String {
        match status {
            FileStatus::Updated => "updated".green().to_string(),
            FileStatus::Unchanged => "no changes".dimmed().to_string(),
            FileStatus::Failed { .. } => "failed".red().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clickup::Task;
    use crate::document::FileReport;

    fn report() -> BatchReport<MemoryTally> {
        BatchReport {
            rule: String::from("add-limits"),
            dry_run: false,
            files: vec![
                FileReport {
                    file: String::from("a.yaml"),
                    status: FileStatus::Updated,
                    modified: 1,
                    tally: MemoryTally { original_gi: 4.0, limit_gi: 6.0 },
                },
                FileReport {
                    file: String::from("b.yaml"),
                    status: FileStatus::Failed { reason: String::from("bad yaml") },
                    modified: 0,
                    tally: MemoryTally::default(),
                },
            ],
            total: MemoryTally { original_gi: 4.0, limit_gi: 6.0 },
        }
    }

    #[test]
    fn test_batch_text_summary() {
        colored::control::set_override(false);
        let text = OutputFormatter::new(OutputFormat::Text).format_batch(&report());

        assert!(text.contains("Files processed: 1"));
        assert!(text.contains("1 updated, 0 unchanged, 1 failed"));
        assert!(text.contains("Entries modified: 1"));
        assert!(text.contains("Total original memory: 4.00 Gi"));
        assert!(text.contains("Memory increase: 2.00 Gi (50%)"));
        assert!(text.contains("b.yaml: bad yaml"));
    }

    #[test]
    fn test_batch_json() {
        let json = OutputFormatter::new(OutputFormat::Json).format_batch(&report());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["rule"], "add-limits");
        assert_eq!(value["files"][0]["status"], "updated");
        assert_eq!(value["files"][1]["reason"], "bad yaml");
        assert_eq!(value["total"]["limit_gi"], 6.0);
    }

    #[test]
    fn test_set_difference_text() {
        let diff = SetDifference { elements: vec![String::from("a")] };
        let text = OutputFormatter::new(OutputFormat::Text).format_set_difference(&diff);

        assert!(text.contains("Elements in set1 but not in set2:\na\n"));
        assert!(text.contains("Size of the difference: 1"));
    }

    #[test]
    fn test_onboarding_json() {
        let report = OnboardingReport {
            environment_code: String::from("SHOP__PRD"),
            main_task: Task { id: String::from("86abc"), name: None, url: None },
            subtasks: Vec::new(),
        };
        let json = OutputFormatter::new(OutputFormat::Json).format_onboarding(&report);
        assert!(json.contains("\"86abc\""));
    }
}
