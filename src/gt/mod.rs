//! Ground-truth annotations for OCR text lines.
//!
//! A ground-truth (GT) file sits next to each training image and lists the
//! text lines found on it, one per line, as a quadrilateral plus a label.
//! This module decodes and parses those files and derives the axis-aligned
//! crop regions used for line-level training data.
//!
//! # Example
//!
//! ```
//! use gtprep::gt::{io_gt_txt::from_gt_str, BBoxXYXY, TextEncoding};
//!
//! let file = from_gt_str("10,90,90,10,10,10,90,90,Hello, World\n", TextEncoding::Utf8);
//! let line = &file.lines[0];
//! assert_eq!(line.text, "Hello, World");
//!
//! let bbox = line.quad.expect("numeric coordinates").bbox();
//! assert_eq!(bbox, BBoxXYXY::from_xyxy(10, 10, 90, 90));
//! ```

mod bbox;
mod coord;
pub mod encoding;
pub mod io_gt_txt;
mod model;

pub use bbox::{BBoxXYXY, CropRect};
pub use coord::Coord;
pub use encoding::TextEncoding;
pub use model::{GtFile, GtLine, Quad};
