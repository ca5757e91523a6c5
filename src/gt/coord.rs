//! Integer pixel coordinates.

use serde::Serialize;

/// A 2D pixel coordinate.
///
/// Ground-truth files may carry floats (`12.7`), but every coordinate is
/// truncated toward zero on the way in, so the rest of the crate works in
/// whole pixels. Values may be negative or lie outside the image; clipping
/// happens when a bounding box is derived.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Coord {
    pub x: i64,
    pub y: i64,
}

impl Coord {
    /// Creates a new coordinate with the given x and y values.
    #[inline]
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Debug for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Parses one coordinate field the way the annotation tools write them.
///
/// Accepts integers and floats with surrounding whitespace; floats are
/// truncated toward zero. Non-finite values are rejected.
pub(crate) fn parse_coord_field(raw: &str) -> Option<i64> {
    let value = raw.trim().parse::<f64>().ok()?;
    if !value.is_finite() || value < i64::MIN as f64 || value > i64::MAX as f64 {
        return None;
    }
    Some(value.trunc() as i64)
}
