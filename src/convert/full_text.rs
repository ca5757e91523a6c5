//! Full-text manifests: one row per image.

use crate::config::{Mode, PassConfig};
use crate::error::GtPrepError;
use crate::gt::io_gt_txt::read_gt_file;
use crate::manifest::{prefixed_path, ManifestWriter};

use super::{
    collect_gt_files, file_stem, note_sanitized_labels, read_issue_code, ConversionReport,
    IssueCode,
};

/// Writes `<image_prefix>/<stem>.<ext>\t<all labels space-joined>` for every
/// annotation file whose image exists and which has at least one
/// well-formed line.
pub fn convert_full_text(name: &str, config: &PassConfig) -> Result<ConversionReport, GtPrepError> {
    let mut report = ConversionReport::new(name, Mode::FullText, &config.output);
    let mut writer = ManifestWriter::create(&config.output)?;

    let gt_files = collect_gt_files(&config.gt_dir, &mut report);

    for gt_path in &gt_files {
        let stem = file_stem(gt_path);
        let image_name = config.image_file_name(&stem);
        let image_path = config.images_dir.join(&image_name);

        if !image_path.is_file() {
            report.record_skipped(
                &stem,
                None,
                IssueCode::ImageNotFound,
                format!("Image not found - {}", image_path.display()),
            );
            continue;
        }

        let gt = match read_gt_file(gt_path, &config.encodings) {
            Ok(gt) => gt,
            Err(err) => {
                report.record_skipped(&stem, None, read_issue_code(&err), err.to_string());
                continue;
            }
        };
        report.dropped.malformed += gt.malformed_lines;

        if gt.lines.is_empty() {
            report.record_skipped(
                &stem,
                Some(gt.encoding),
                IssueCode::NoLabels,
                format!("No valid text found in {}", gt_path.display()),
            );
            continue;
        }

        let row_path = prefixed_path(&config.image_prefix, &image_name);
        if writer.write_row(&row_path, &gt.joined_text())? {
            report.counts.sanitized_labels += 1;
        }
        report.record_processed(&stem, gt.encoding, 1);
    }

    writer.finish()?;
    note_sanitized_labels(&mut report);

    tracing::info!(
        processed = report.counts.processed_files,
        skipped = report.counts.skipped_files,
        "conversion complete, created {}",
        config.output.display()
    );

    Ok(report)
}
