//! Batch passes from ground-truth directories to training manifests.
//!
//! Both passes walk the annotation directory in sorted file-name order,
//! pair each `<stem>.txt` with `<images_dir>/<stem>.<ext>`, and process
//! every pair in isolation. Problems with one file or line are recorded in
//! the returned [`ConversionReport`] and never abort the pass.

pub mod full_text;
pub mod per_line;
pub mod report;

pub use full_text::convert_full_text;
pub use per_line::{crop_file_name, crop_lines};
pub use report::{
    ConversionCounts, ConversionIssue, ConversionReport, ConversionSeverity, DroppedLines,
    FileRecord, FileStatus, IssueCode, RunTotals,
};

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::{JobFile, Mode, PassConfig};
use crate::error::GtPrepError;
use crate::gt::io_gt_txt::GT_EXTENSION;

/// Runs one pass according to its mode.
pub fn run_pass(name: &str, config: &PassConfig) -> Result<ConversionReport, GtPrepError> {
    config.validate()?;
    match config.mode {
        Mode::FullText => convert_full_text(name, config),
        Mode::PerLine => crop_lines(name, config),
    }
}

/// Runs every pass of a job file in order.
pub fn run_job(job: &JobFile) -> Result<Vec<ConversionReport>, GtPrepError> {
    job.passes
        .iter()
        .map(|pass| {
            tracing::info!(pass = %pass.name, mode = %pass.config.mode, "starting pass");
            run_pass(&pass.name, &pass.config)
        })
        .collect()
}

/// Ground-truth files directly inside `gt_dir`, sorted by file name.
///
/// The extension must be exactly `txt`; `notes.TXT` is not collected.
///
/// A missing or empty directory is not an error: it is recorded as a
/// `NoAnnotationFiles` warning and the pass writes an empty manifest.
fn collect_gt_files(gt_dir: &Path, report: &mut ConversionReport) -> Vec<PathBuf> {
    let mut files = Vec::new();

    if gt_dir.is_dir() {
        for entry in WalkDir::new(gt_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!("Error while listing {}: {err}", gt_dir.display());
                    continue;
                }
            };
            if entry.file_type().is_file() && has_extension(entry.path(), GT_EXTENSION) {
                files.push(entry.into_path());
            }
        }
    }

    report.counts.annotation_files = files.len();
    if files.is_empty() {
        let message = format!("No .{GT_EXTENSION} files found in {}", gt_dir.display());
        tracing::warn!("{message}");
        report.add(ConversionIssue::warning(
            IssueCode::NoAnnotationFiles,
            None,
            message,
        ));
    }

    files
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == ext)
        .unwrap_or(false)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Issue code for a failed annotation read.
fn read_issue_code(err: &GtPrepError) -> IssueCode {
    match err {
        GtPrepError::AnnotationUndecodable { .. } => IssueCode::AnnotationUndecodable,
        _ => IssueCode::AnnotationUnreadable,
    }
}

/// Adds a note when labels had tabs or newlines replaced.
fn note_sanitized_labels(report: &mut ConversionReport) {
    let count = report.counts.sanitized_labels;
    if count > 0 {
        report.add(ConversionIssue::info(
            IssueCode::LabelsSanitized,
            format!("{count} label(s) contained tabs or newlines; replaced with spaces"),
        ));
    }
}
