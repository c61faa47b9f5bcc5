//! Defines constants used by the slide assembler. Sizes are points, distances inches.

pub const BODY_FONT_SIZE_PT: f64 = 18.0;
pub const TITLE_FONT_SIZE_PT: f64 = 32.0;
/// Font sizes for `h1` to `h6`.
pub const HEADING_FONT_SIZES_PT: [f64; 6] = [32.0, 28.0, 24.0, 20.0, 18.0, 16.0];
pub const TABLE_FONT_SIZE_PT: f64 = 14.0;
pub const LINK_FONT_SIZE_PT: f64 = 16.0;

pub const LINK_COLOR: &str = "0563C1";
pub const HEADER_TEXT_COLOR: &str = "FFFFFF";
/// Body row fills by row index parity (even, odd).
pub const ZEBRA_FILLS: [&str; 2] = ["FFFFFF", "F2F2F2"];
pub const TABLE_BORDER_COLOR: &str = "BFBFBF";

pub const MIN_COLUMN_WIDTH_IN: f64 = 0.6;
/// Vertical space left between stacked elements.
pub const ELEMENT_GAP_IN: f64 = 0.15;
pub const LINE_HEIGHT_FACTOR: f64 = 1.2;
/// Average glyph width as a fraction of the font size, for line-wrap estimates.
pub const CHAR_WIDTH_FACTOR: f64 = 0.5;
/// Inner padding added to every text box estimate.
pub const TEXT_PADDING_IN: f64 = 0.1;
pub const TABLE_ROW_PADDING_IN: f64 = 0.12;
