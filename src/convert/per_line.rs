//! Line-level crops: one JPEG and one manifest row per text line.

use std::fs;
use std::path::Path;

use image::{imageops, ImageFormat, ImageReader, RgbImage};

use crate::config::{CropIndex, Mode, PassConfig};
use crate::error::GtPrepError;
use crate::gt::io_gt_txt::read_gt_file;
use crate::gt::{CropRect, GtLine};
use crate::manifest::ManifestWriter;

use super::{
    collect_gt_files, file_stem, note_sanitized_labels, read_issue_code, ConversionIssue,
    ConversionReport, DroppedLines, IssueCode,
};

/// Crops every usable text line into `<crops_dir>/<stem>_line<NNN>.jpg` and
/// writes `<crop file name>\t<label>` for each saved crop.
pub fn crop_lines(name: &str, config: &PassConfig) -> Result<ConversionReport, GtPrepError> {
    fs::create_dir_all(&config.crops_dir).map_err(|source| GtPrepError::CropDirCreate {
        path: config.crops_dir.clone(),
        source,
    })?;

    let mut report = ConversionReport::new(name, Mode::PerLine, &config.output);
    report.crops_dir = Some(config.crops_dir.clone());
    let mut writer = ManifestWriter::create(&config.output)?;

    let gt_files = collect_gt_files(&config.gt_dir, &mut report);
    tracing::info!("Found {} GT files to process...", gt_files.len());

    for gt_path in &gt_files {
        let stem = file_stem(gt_path);
        let image_path = config.images_dir.join(config.image_file_name(&stem));

        if !image_path.is_file() {
            report.record_skipped(
                &stem,
                None,
                IssueCode::ImageNotFound,
                format!("Image not found - {}", image_path.display()),
            );
            continue;
        }

        let image = match load_rgb_image(&image_path) {
            Ok(image) => image,
            Err(err) => {
                report.record_skipped(&stem, None, IssueCode::ImageUnreadable, err.to_string());
                continue;
            }
        };

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

        let mut rows = 0;
        for line in &gt.lines {
            let rect = match line_crop_rect(line, &image, config.min_crop_size) {
                Ok(rect) => rect,
                Err(reason) => {
                    reason.count(&mut report.dropped);
                    tracing::debug!(file = %stem, line = line.index, ?reason, "dropping line");
                    continue;
                }
            };

            let index = match config.crop_index {
                CropIndex::Line => line.index,
                CropIndex::Dense => rows,
            };
            let crop_name = crop_file_name(&stem, index);
            let crop_path = config.crops_dir.join(&crop_name);

            if let Err(err) = save_crop(&image, rect, &crop_path) {
                tracing::warn!("{err}");
                report.dropped.save_failed += 1;
                report.add(ConversionIssue::warning(
                    IssueCode::CropSaveFailed,
                    Some(&stem),
                    err.to_string(),
                ));
                continue;
            }

            if writer.write_row(&crop_name, &line.text)? {
                report.counts.sanitized_labels += 1;
            }
            rows += 1;
        }

        report.record_processed(&stem, gt.encoding, rows);

        if report.counts.processed_files % config.progress_every == 0 {
            tracing::info!(
                "Processed {}/{} files, {} lines extracted",
                report.counts.processed_files,
                gt_files.len(),
                report.counts.rows_written
            );
        }
    }

    writer.finish()?;
    note_sanitized_labels(&mut report);

    tracing::info!(
        processed = report.counts.processed_files,
        lines = report.counts.rows_written,
        "processing complete, crops saved to {}",
        config.crops_dir.display()
    );

    Ok(report)
}

/// `<stem>_line<index, 3-digit zero-padded>.jpg`
pub fn crop_file_name(stem: &str, index: usize) -> String {
    format!("{stem}_line{index:03}.jpg")
}

/// Why a line produced no crop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LineDrop {
    BadCoordinates,
    EmptyText,
    DegenerateBox,
    TooSmall,
}

impl LineDrop {
    fn count(self, dropped: &mut DroppedLines) {
        match self {
            LineDrop::BadCoordinates => dropped.bad_coordinates += 1,
            LineDrop::EmptyText => dropped.empty_text += 1,
            LineDrop::DegenerateBox => dropped.degenerate_box += 1,
            LineDrop::TooSmall => dropped.too_small += 1,
        }
    }
}

fn line_crop_rect(line: &GtLine, image: &RgbImage, min_size: u32) -> Result<CropRect, LineDrop> {
    let quad = line.quad.ok_or(LineDrop::BadCoordinates)?;
    if line.text.is_empty() {
        return Err(LineDrop::EmptyText);
    }

    let bbox = quad.bbox();
    if bbox.clip(image.width(), image.height()).is_degenerate() {
        return Err(LineDrop::DegenerateBox);
    }

    bbox.crop_rect(image.width(), image.height(), min_size)
        .ok_or(LineDrop::TooSmall)
}

/// Decodes an image, sniffing the format from its content.
fn load_rgb_image(path: &Path) -> Result<RgbImage, GtPrepError> {
    let to_err = |source| GtPrepError::ImageRead {
        path: path.to_path_buf(),
        source,
    };

    let image = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|err| to_err(image::ImageError::IoError(err)))?
        .decode()
        .map_err(to_err)?;

    Ok(image.to_rgb8())
}

fn save_crop(image: &RgbImage, rect: CropRect, path: &Path) -> Result<(), GtPrepError> {
    let crop = imageops::crop_imm(image, rect.x, rect.y, rect.width, rect.height).to_image();
    crop.save_with_format(path, ImageFormat::Jpeg)
        .map_err(|source| GtPrepError::CropSave {
            path: path.to_path_buf(),
            source,
        })
}
