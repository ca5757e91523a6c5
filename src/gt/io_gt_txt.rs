//! Reader for per-image ground-truth text files.
//!
//! Each non-blank line holds one text-line annotation:
//!
//! ```text
//! x1,y1,x2,y2,x3,y3,x4,y4,label
//! ```
//!
//! The first eight comma-separated fields are the quadrilateral; everything
//! after the eighth comma is the label, so labels may themselves contain
//! commas (`10,20,30,20,30,40,10,40,Hello, World` has label `Hello, World`).

use std::fs;
use std::path::Path;

use super::encoding::{candidate_names, decode_with_fallback, TextEncoding};
use super::model::{GtFile, GtLine, Quad};
use crate::error::GtPrepError;

/// File extension of ground-truth files.
pub const GT_EXTENSION: &str = "txt";

const COORD_FIELDS: usize = 8;

/// Reads and parses a ground-truth file, trying `encodings` in order.
pub fn read_gt_file(path: &Path, encodings: &[TextEncoding]) -> Result<GtFile, GtPrepError> {
    let bytes = fs::read(path).map_err(|source| GtPrepError::AnnotationRead {
        path: path.to_path_buf(),
        source,
    })?;

    let (encoding, text) = decode_with_fallback(&bytes, encodings).ok_or_else(|| {
        GtPrepError::AnnotationUndecodable {
            path: path.to_path_buf(),
            tried: candidate_names(encodings),
        }
    })?;

    Ok(from_gt_str(&text, encoding))
}

/// Parses already-decoded ground-truth text.
pub fn from_gt_str(text: &str, encoding: TextEncoding) -> GtFile {
    let mut lines = Vec::new();
    let mut malformed_lines = 0;

    for (index, line) in split_lines(text).enumerate() {
        match parse_gt_line(line, index) {
            Ok(Some(parsed)) => lines.push(parsed),
            Ok(None) => {}
            Err(LineError::TooFewFields { found }) => {
                tracing::debug!(line = index, found, "dropping line with too few fields");
                malformed_lines += 1;
            }
        }
    }

    GtFile {
        encoding,
        lines,
        malformed_lines,
    }
}

/// Splits on `\r\n`, `\n` and a lone `\r`, without the terminators.
///
/// Files saved with classic Mac line endings use bare carriage returns.
/// A trailing terminator does not produce an extra empty line.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        match rest.find(['\r', '\n']) {
            Some(pos) => {
                let line = &rest[..pos];
                let terminator = if rest[pos..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[pos + terminator..];
                Some(line)
            }
            None => Some(std::mem::take(&mut rest)),
        }
    })
}

/// Why a non-blank line was rejected.
#[derive(Debug, PartialEq, Eq)]
pub enum LineError {
    /// Fewer than eight coordinates plus a label.
    TooFewFields { found: usize },
}

/// Parses one line. Blank lines yield `Ok(None)`.
///
/// A line whose coordinates are not numeric is still returned, with
/// `quad: None`, because its label is usable without geometry.
pub fn parse_gt_line(line: &str, index: usize) -> Result<Option<GtLine>, LineError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let fields: Vec<&str> = trimmed.split(',').collect();
    if fields.len() <= COORD_FIELDS {
        return Err(LineError::TooFewFields {
            found: fields.len(),
        });
    }

    let quad = Quad::from_fields(&fields[..COORD_FIELDS]);
    let text = fields[COORD_FIELDS..].join(",").trim().to_string();

    Ok(Some(GtLine { index, quad, text }))
}

/// Fuzz-only entrypoint for single-line parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_gt_line(input: &str) {
    if let Ok(Some(line)) = parse_gt_line(input, 0) {
        if let Some(quad) = line.quad {
            let _ = quad.bbox().crop_rect(u32::MAX, u32::MAX, 5);
        }
    }
}
