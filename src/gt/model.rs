//! Ground-truth annotation types.

use serde::Serialize;

use super::bbox::BBoxXYXY;
use super::coord::{parse_coord_field, Coord};
use super::encoding::TextEncoding;

/// A text-line quadrilateral: four vertices in file order.
///
/// Vertex order is whatever the annotation tool wrote; it is not guaranteed
/// to be clockwise or convex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Quad {
    pub points: [Coord; 4],
}

impl Quad {
    /// Builds a quad from the eight `x1,y1,...,x4,y4` fields of a line.
    ///
    /// Returns `None` if there are not exactly eight fields or any of them
    /// fails numeric conversion.
    pub fn from_fields(fields: &[&str]) -> Option<Self> {
        if fields.len() != 8 {
            return None;
        }

        let mut values = [0i64; 8];
        for (slot, raw) in values.iter_mut().zip(fields) {
            *slot = parse_coord_field(raw)?;
        }

        Some(Self {
            points: [
                Coord::new(values[0], values[1]),
                Coord::new(values[2], values[3]),
                Coord::new(values[4], values[5]),
                Coord::new(values[6], values[7]),
            ],
        })
    }

    /// Axis-aligned box enclosing the quad.
    pub fn bbox(&self) -> BBoxXYXY {
        BBoxXYXY::from_quad(self)
    }
}

/// One well-formed annotation line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GtLine {
    /// 0-based index of the line in the source file, blank lines included.
    pub index: usize,
    /// `None` when a coordinate field is not numeric.
    pub quad: Option<Quad>,
    /// Trimmed label text; may contain commas.
    pub text: String,
}

/// A decoded and parsed ground-truth file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GtFile {
    /// The candidate encoding that decoded the file.
    pub encoding: TextEncoding,
    /// Well-formed lines in file order.
    pub lines: Vec<GtLine>,
    /// Non-blank lines dropped for having fewer than nine fields.
    pub malformed_lines: usize,
}

impl GtFile {
    /// Labels in file order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|line| line.text.as_str())
    }

    /// All labels joined with a single space, as used for full-text rows.
    pub fn joined_text(&self) -> String {
        self.texts().collect::<Vec<_>>().join(" ")
    }
}
