//! Bounding-rectangle derivation from layout-service polygons.
//!
//! The layout service describes each detected region as a flat list of
//! alternating x/y coordinates. Crops need an axis-aligned rectangle, so the
//! region is reduced to the tightest box containing every vertex.

use serde::{Deserialize, Serialize};

use crate::error::ExtractError;

/// A detected region's bounding polygon: alternating x/y coordinates, in the
/// coordinate space of the analyzed page image.
pub type Polygon = Vec<f64>;

/// An axis-aligned rectangle with `x1 <= x2` and `y1 <= y2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Rect {
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Convert to integer crop bounds `(x, y, width, height)` clamped to an
    /// image of the given dimensions. Minima are floored and maxima ceiled so
    /// the crop covers the full region.
    pub fn to_pixel_crop(&self, image_width: u32, image_height: u32) -> (u32, u32, u32, u32) {
        let x = (self.x1.max(0.0).floor() as u32).min(image_width);
        let y = (self.y1.max(0.0).floor() as u32).min(image_height);
        let x2 = (self.x2.max(0.0).ceil() as u32).min(image_width);
        let y2 = (self.y2.max(0.0).ceil() as u32).min(image_height);
        (x, y, x2.saturating_sub(x), y2.saturating_sub(y))
    }
}

/// Reduce a bounding polygon to its axis-aligned bounding rectangle: the
/// minimum and maximum of the x coordinates and of the y coordinates.
///
/// Errors when the coordinate list is empty or has odd length.
pub fn bounding_rect(polygon: &[f64]) -> Result<Rect, ExtractError> {
    if polygon.is_empty() || polygon.len() % 2 != 0 {
        return Err(ExtractError::MalformedPolygon { len: polygon.len() });
    }

    let mut rect = Rect {
        x1: f64::INFINITY,
        y1: f64::INFINITY,
        x2: f64::NEG_INFINITY,
        y2: f64::NEG_INFINITY,
    };

    for pair in polygon.chunks_exact(2) {
        let (x, y) = (pair[0], pair[1]);
        rect.x1 = rect.x1.min(x);
        rect.y1 = rect.y1.min(y);
        rect.x2 = rect.x2.max(x);
        rect.y2 = rect.y2.max(y);
    }

    Ok(rect)
}
