//! Axis-aligned bounding boxes in XYXY format.

use serde::Serialize;

use super::coord::Coord;
use super::model::Quad;

/// An axis-aligned bounding box in XYXY format (xmin, ymin, xmax, ymax).
///
/// Note: This type does NOT enforce that min < max in the constructor.
/// Degenerate boxes can be represented, and [`BBoxXYXY::crop_rect`] is
/// where they get rejected.
#[derive(Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BBoxXYXY {
    pub min: Coord,
    pub max: Coord,
}

/// A validated crop region in image space (top-left corner plus size).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BBoxXYXY {
    /// Creates a new bounding box from min and max coordinates.
    #[inline]
    pub fn new(min: Coord, max: Coord) -> Self {
        Self { min, max }
    }

    /// Creates a new bounding box from explicit coordinates.
    #[inline]
    pub fn from_xyxy(xmin: i64, ymin: i64, xmax: i64, ymax: i64) -> Self {
        Self {
            min: Coord::new(xmin, ymin),
            max: Coord::new(xmax, ymax),
        }
    }

    /// Smallest box enclosing all four vertices of a quadrilateral.
    ///
    /// Min and max are taken independently per axis, so vertex order and
    /// winding do not matter.
    pub fn from_quad(quad: &Quad) -> Self {
        let xs = quad.points.map(|p| p.x);
        let ys = quad.points.map(|p| p.y);
        let min_of = |values: [i64; 4]| values.into_iter().min().unwrap_or_default();
        let max_of = |values: [i64; 4]| values.into_iter().max().unwrap_or_default();

        Self::from_xyxy(min_of(xs), min_of(ys), max_of(xs), max_of(ys))
    }

    #[inline]
    pub fn xmin(&self) -> i64 {
        self.min.x
    }

    #[inline]
    pub fn ymin(&self) -> i64 {
        self.min.y
    }

    #[inline]
    pub fn xmax(&self) -> i64 {
        self.max.x
    }

    #[inline]
    pub fn ymax(&self) -> i64 {
        self.max.y
    }

    /// Returns the width of the bounding box.
    ///
    /// May be zero or negative if the box is degenerate.
    #[inline]
    pub fn width(&self) -> i64 {
        self.max.x - self.min.x
    }

    /// Returns the height of the bounding box.
    ///
    /// May be zero or negative if the box is degenerate.
    #[inline]
    pub fn height(&self) -> i64 {
        self.max.y - self.min.y
    }

    /// Returns true if the box encloses no pixels (xmax <= xmin or ymax <= ymin).
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.max.x <= self.min.x || self.max.y <= self.min.y
    }

    /// Clamps every edge into `[0, image_width] x [0, image_height]`.
    pub fn clip(&self, image_width: u32, image_height: u32) -> Self {
        let w = i64::from(image_width);
        let h = i64::from(image_height);
        Self::from_xyxy(
            self.min.x.clamp(0, w),
            self.min.y.clamp(0, h),
            self.max.x.clamp(0, w),
            self.max.y.clamp(0, h),
        )
    }

    /// Clips the box to the image and turns it into a crop region.
    ///
    /// Returns `None` when the clipped box is degenerate or narrower than
    /// `min_size` pixels on either axis.
    pub fn crop_rect(&self, image_width: u32, image_height: u32, min_size: u32) -> Option<CropRect> {
        let clipped = self.clip(image_width, image_height);
        if clipped.is_degenerate() {
            return None;
        }
        if clipped.width() < i64::from(min_size) || clipped.height() < i64::from(min_size) {
            return None;
        }

        // Clipping bounds every edge by a u32, so these conversions cannot fail.
        Some(CropRect {
            x: u32::try_from(clipped.xmin()).ok()?,
            y: u32::try_from(clipped.ymin()).ok()?,
            width: u32::try_from(clipped.width()).ok()?,
            height: u32::try_from(clipped.height()).ok()?,
        })
    }
}

impl std::fmt::Debug for BBoxXYXY {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BBoxXYXY")
            .field("xmin", &self.min.x)
            .field("ymin", &self.min.y)
            .field("xmax", &self.max.x)
            .field("ymax", &self.max.y)
            .finish()
    }
}
