//! Pass report types.
//!
//! Every pass returns a [`ConversionReport`] instead of bumping global
//! counters: how many files were processed or skipped, why, which encoding
//! each file used, and why individual lines were dropped.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::Mode;
use crate::gt::TextEncoding;

/// A report generated by one pass.
#[derive(Clone, Debug, Serialize)]
pub struct ConversionReport {
    /// Pass name (`train`, `val`, ...).
    pub pass: String,
    pub mode: Mode,
    /// Manifest written by the pass.
    pub output: PathBuf,
    /// Crop directory, per-line passes only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crops_dir: Option<PathBuf>,
    pub counts: ConversionCounts,
    pub dropped: DroppedLines,
    /// One record per annotation file, in processing order.
    pub files: Vec<FileRecord>,
    /// Issues discovered during the pass.
    pub issues: Vec<ConversionIssue>,
}

impl ConversionReport {
    /// Create a new empty report for a pass.
    pub fn new(pass: impl Into<String>, mode: Mode, output: &Path) -> Self {
        Self {
            pass: pass.into(),
            mode,
            output: output.to_path_buf(),
            crops_dir: None,
            counts: ConversionCounts::default(),
            dropped: DroppedLines::default(),
            files: Vec::new(),
            issues: Vec::new(),
        }
    }

    /// Add an issue to the report.
    pub fn add(&mut self, issue: ConversionIssue) {
        self.issues.push(issue);
    }

    /// Record an annotation file that produced output.
    pub fn record_processed(&mut self, stem: &str, encoding: TextEncoding, rows: usize) {
        self.counts.processed_files += 1;
        self.counts.rows_written += rows;
        self.files.push(FileRecord {
            stem: stem.to_string(),
            encoding: Some(encoding),
            status: FileStatus::Processed { rows },
        });
    }

    /// Record an annotation file that was skipped, with a warning.
    pub fn record_skipped(
        &mut self,
        stem: &str,
        encoding: Option<TextEncoding>,
        code: IssueCode,
        message: impl Into<String>,
    ) {
        let message = message.into();
        tracing::warn!("{message}");

        self.counts.skipped_files += 1;
        self.files.push(FileRecord {
            stem: stem.to_string(),
            encoding,
            status: FileStatus::Skipped { reason: code },
        });
        self.add(ConversionIssue {
            severity: ConversionSeverity::Warning,
            code,
            file: Some(stem.to_string()),
            message,
        });
    }

    /// Count of warning-level issues.
    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == ConversionSeverity::Warning)
            .count()
    }

    /// Count of info-level issues.
    pub fn info_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == ConversionSeverity::Info)
            .count()
    }

    /// Look up the record for an annotation file by stem.
    pub fn file(&self, stem: &str) -> Option<&FileRecord> {
        self.files.iter().find(|record| record.stem == stem)
    }
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        writeln!(f, "{rule}")?;
        writeln!(f, "Pass '{}' ({}) complete", self.pass, self.mode)?;
        writeln!(
            f,
            "  Annotation files: {}",
            self.counts.annotation_files
        )?;
        writeln!(f, "  Processed: {} files", self.counts.processed_files)?;
        writeln!(f, "  Skipped: {} files", self.counts.skipped_files)?;

        match self.mode {
            Mode::FullText => writeln!(f, "  Rows written: {}", self.counts.rows_written)?,
            Mode::PerLine => {
                writeln!(f, "  Extracted {} text lines", self.counts.rows_written)?
            }
        }

        if self.dropped.total() > 0 {
            writeln!(f, "  Dropped lines: {}", self.dropped)?;
        }
        if self.counts.sanitized_labels > 0 {
            writeln!(
                f,
                "  Labels with tabs/newlines replaced: {}",
                self.counts.sanitized_labels
            )?;
        }

        if let Some(crops_dir) = &self.crops_dir {
            writeln!(f, "  Saved to: {}", crops_dir.display())?;
        }
        writeln!(f, "  Created: {}", self.output.display())?;

        let warnings = self.warning_count();
        if warnings > 0 {
            writeln!(f)?;
            writeln!(f, "Warnings ({}):", warnings)?;
            for issue in self
                .issues
                .iter()
                .filter(|i| i.severity == ConversionSeverity::Warning)
            {
                writeln!(f, "  - {}", issue.message)?;
            }
        }

        let infos = self.info_count();
        if infos > 0 {
            writeln!(f)?;
            writeln!(f, "Notes ({}):", infos)?;
            for issue in self
                .issues
                .iter()
                .filter(|i| i.severity == ConversionSeverity::Info)
            {
                writeln!(f, "  - {}", issue.message)?;
            }
        }

        writeln!(f, "{rule}")
    }
}

/// File and row totals for a pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConversionCounts {
    /// `.txt` files found in the annotation directory.
    pub annotation_files: usize,
    pub processed_files: usize,
    pub skipped_files: usize,
    /// Manifest rows; equals extracted lines in per-line mode.
    pub rows_written: usize,
    /// Labels whose tabs/CR/LF were replaced before writing.
    pub sanitized_labels: usize,
}

/// Lines that produced no output, by reason.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DroppedLines {
    /// Fewer than nine comma-separated fields.
    pub malformed: usize,
    /// A coordinate that is not a finite number (per-line mode).
    pub bad_coordinates: usize,
    /// Label empty after trimming (per-line mode).
    pub empty_text: usize,
    /// Box empty after clipping (per-line mode).
    pub degenerate_box: usize,
    /// Box under the minimum crop size (per-line mode).
    pub too_small: usize,
    /// Crop could not be saved (per-line mode).
    pub save_failed: usize,
}

impl DroppedLines {
    pub fn total(&self) -> usize {
        self.malformed
            + self.bad_coordinates
            + self.empty_text
            + self.degenerate_box
            + self.too_small
            + self.save_failed
    }
}

impl fmt::Display for DroppedLines {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = [
            ("malformed", self.malformed),
            ("bad coordinates", self.bad_coordinates),
            ("empty text", self.empty_text),
            ("degenerate box", self.degenerate_box),
            ("too small", self.too_small),
            ("save failed", self.save_failed),
        ];
        let shown: Vec<String> = parts
            .iter()
            .filter(|(_, count)| *count > 0)
            .map(|(label, count)| format!("{count} {label}"))
            .collect();
        write!(f, "{}", shown.join(", "))
    }
}

/// Outcome for one annotation file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    pub stem: String,
    /// Encoding that decoded the file; `None` if it was never decoded.
    pub encoding: Option<TextEncoding>,
    pub status: FileStatus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Processed { rows: usize },
    Skipped { reason: IssueCode },
}

/// A single issue discovered during a pass.
#[derive(Clone, Debug, Serialize)]
pub struct ConversionIssue {
    pub severity: ConversionSeverity,
    pub code: IssueCode,
    /// Annotation stem the issue belongs to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub message: String,
}

impl ConversionIssue {
    pub fn warning(code: IssueCode, file: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            severity: ConversionSeverity::Warning,
            code,
            file: file.map(str::to_string),
            message: message.into(),
        }
    }

    pub fn info(code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: ConversionSeverity::Info,
            code,
            file: None,
            message: message.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionSeverity {
    Warning,
    Info,
}

/// Stable codes for pass issues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    /// The annotation directory is missing or has no `.txt` files.
    NoAnnotationFiles,
    ImageNotFound,
    /// The image exists but could not be decoded.
    ImageUnreadable,
    AnnotationUnreadable,
    /// No candidate encoding could decode the annotation file.
    AnnotationUndecodable,
    /// The annotation file has no well-formed lines.
    NoLabels,
    CropSaveFailed,
    /// Labels had tabs or newlines replaced.
    LabelsSanitized,
}

/// Totals across several passes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunTotals {
    pub passes: usize,
    pub processed_files: usize,
    pub skipped_files: usize,
    pub rows_written: usize,
}

impl RunTotals {
    pub fn from_reports(reports: &[ConversionReport]) -> Self {
        reports.iter().fold(Self::default(), |mut totals, report| {
            totals.passes += 1;
            totals.processed_files += report.counts.processed_files;
            totals.skipped_files += report.counts.skipped_files;
            totals.rows_written += report.counts.rows_written;
            totals
        })
    }
}

impl fmt::Display for RunTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "All passes ({}): {} files processed, {} skipped, {} rows written",
            self.passes, self.processed_files, self.skipped_files, self.rows_written
        )
    }
}
