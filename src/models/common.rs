use serde::{Deserialize, Serialize};

/// Pixels per inch assumed when converting markup lengths to slide units.
pub const PX_PER_INCH: f64 = 96.0;
/// Points per inch.
pub const PT_PER_INCH: f64 = 72.0;

/// A rectangle in slide-relative units (inches from the top-left corner).
/// A missing height means "size to content".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h: Option<f64>,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: Option<f64>) -> Self {
        Self { x, y, w, h }
    }

    /// Returns a copy moved down by `dy`.
    pub fn offset_y(&self, dy: f64) -> Self {
        Self {
            y: self.y + dy,
            ..*self
        }
    }

    /// Returns a copy with an explicit height.
    pub fn with_height(&self, h: f64) -> Self {
        Self { h: Some(h), ..*self }
    }
}

/// Converts CSS pixels to inches.
pub fn px_to_inches(px: f64) -> f64 {
    px / PX_PER_INCH
}

/// Converts CSS pixels to points.
pub fn px_to_pt(px: f64) -> f64 {
    px * PT_PER_INCH / PX_PER_INCH
}
