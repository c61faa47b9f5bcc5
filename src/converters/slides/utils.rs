//! Utility functions for slide assembly: style override layering, font and color
//! resolution, height estimates and the vertical layout cursor.

use super::constants::*;
use crate::converters::html::style::{css_length_to_pt, BASE_FONT_PT};
use crate::models::colors::normalize_color;
use crate::models::common::{Rect, PT_PER_INCH};
use crate::models::elements::StyleMap;

// --- Style Overrides ---

/// Style overrides for one element: the element's own map wins over the config map for its
/// kind, which wins over the layout rectangle and theme defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleLayers<'a> {
    config: Option<&'a StyleMap>,
    element: Option<&'a StyleMap>,
}

impl<'a> StyleLayers<'a> {
    pub fn new(config: Option<&'a StyleMap>, element: Option<&'a StyleMap>) -> Self {
        Self { config, element }
    }

    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.element
            .and_then(|styles| styles.get(key))
            .or_else(|| self.config.and_then(|styles| styles.get(key)))
            .map(String::as_str)
    }

    /// A numeric override. Values that do not parse are ignored.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key)
            .and_then(|value| value.trim().parse::<f64>().ok())
            .filter(|value| value.is_finite())
    }

    /// Applies `x`, `y`, `w` and `h` overrides to a layout rectangle.
    pub fn apply_geometry(&self, rect: Rect) -> Rect {
        Rect {
            x: self.number("x").unwrap_or(rect.x),
            y: self.number("y").unwrap_or(rect.y),
            w: self.number("w").unwrap_or(rect.w),
            h: self.number("h").or(rect.h),
        }
    }

    /// True when the vertical position is pinned by an override.
    pub fn has_explicit_y(&self) -> bool {
        self.number("y").is_some()
    }

    /// Font size override in points. Bare numbers are points; CSS lengths are converted.
    pub fn font_size(&self) -> Option<f64> {
        let value = self.get("fontSize")?;
        value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|size| *size > 0.0)
            .or_else(|| css_length_to_pt(value, BASE_FONT_PT))
    }

    pub fn color(&self) -> Option<String> {
        self.get("color").and_then(normalize_color)
    }

    pub fn font_face(&self) -> Option<String> {
        self.get("fontFace").map(str::to_string)
    }
}

// --- Fonts and Colors ---

/// Default font size for a heading level, or the body size.
pub fn heading_font_size(level: Option<u8>) -> f64 {
    match level {
        Some(level @ 1..=6) => HEADING_FONT_SIZES_PT[usize::from(level) - 1],
        _ => BODY_FONT_SIZE_PT,
    }
}

/// Converts an authored CSS font size to points.
pub fn css_font_size(value: Option<&str>) -> Option<f64> {
    value.and_then(|value| css_length_to_pt(value, BASE_FONT_PT))
}

/// Normalizes an authored color, falling back to `fallback` (already hex).
pub fn resolve_color(value: Option<&str>, fallback: &str) -> String {
    value
        .and_then(normalize_color)
        .unwrap_or_else(|| fallback.to_string())
}

// --- Height Estimates ---

/// Estimated height of a text box: wrapped line count times line height, plus padding.
pub fn estimate_text_height(text: &str, font_size_pt: f64, width_in: f64) -> f64 {
    let char_width_in = font_size_pt * CHAR_WIDTH_FACTOR / PT_PER_INCH;
    let chars_per_line = (width_in / char_width_in).floor().max(1.0);
    let lines: f64 = text
        .split('\n')
        .map(|line| (line.chars().count() as f64 / chars_per_line).ceil().max(1.0))
        .sum();
    lines * font_size_pt * LINE_HEIGHT_FACTOR / PT_PER_INCH + TEXT_PADDING_IN
}

/// Estimated height of a table with `rows` rows (header included).
pub fn estimate_table_height(rows: usize, font_size_pt: f64) -> f64 {
    rows.max(1) as f64 * (font_size_pt * LINE_HEIGHT_FACTOR / PT_PER_INCH + TABLE_ROW_PADDING_IN)
}

// --- Layout Cursor ---

/// Stacks the elements of one slide vertically.
///
/// Each element starts at its kind's rectangle `y` or below the previous element, whichever
/// is lower. Elements pinned by an explicit `y` override keep it and do not move the cursor.
#[derive(Debug, Clone, Default)]
pub struct LayoutCursor {
    next_y: Option<f64>,
}

impl LayoutCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Places an element of `height` inches and returns its final rectangle.
    pub fn place(&mut self, rect: Rect, height: f64, explicit_y: bool) -> Rect {
        if explicit_y {
            return rect.with_height(height);
        }
        let y = self.next_y.map_or(rect.y, |next| next.max(rect.y));
        self.next_y = Some(y + height + ELEMENT_GAP_IN);
        Rect {
            y,
            h: Some(height),
            ..rect
        }
    }
}
