//! Fully resolved rendering options handed to a Presentation Backend.
//!
//! The assembler maps extracted resources onto these; a backend never needs to look at
//! markup or CSS. Colors are six-digit hex without `#`, sizes are points, positions inches.

use serde::{Deserialize, Serialize};

use crate::models::bullet::BulletDescriptor;
use crate::models::common::Rect;
use crate::models::properties::{Alignment, VerticalAlignment};

/// A hyperlink binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hyperlink {
    pub url: String,
    pub tooltip: String,
}

/// Formatting of a single run of text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOptions {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike: bool,
    pub superscript: bool,
    pub subscript: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_face: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hyperlink: Option<Hyperlink>,
}

/// A run of text with its formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    pub text: String,
    pub options: RunOptions,
}

/// Box-level options for a text block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextOptions {
    pub rect: Rect,
    pub font_face: String,
    pub font_size: f64,
    pub color: String,
    pub bold: bool,
    pub align: Alignment,
    /// Runs making up the block, in order.
    pub runs: Vec<TextRun>,
}

/// Where the image bytes come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageData {
    /// Inline `data:` URI (original or re-encoded).
    DataUri(String),
    /// The unprocessed source reference, for backends that load it themselves.
    Path(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePlacement {
    pub rect: Rect,
    pub data: ImageData,
    pub alt: String,
    /// False when processing failed and the original geometry is used.
    pub processed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCellOptions {
    pub text: String,
    pub bold: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    pub color: String,
    pub align: Alignment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valign: Option<VerticalAlignment>,
    pub colspan: u32,
    pub rowspan: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableOptions {
    pub rect: Rect,
    pub col_widths: Vec<f64>,
    /// Header row first.
    pub rows: Vec<Vec<TableCellOptions>>,
    pub font_face: String,
    pub font_size: f64,
    pub border_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOptions {
    pub rect: Rect,
    pub bullet: BulletDescriptor,
    /// One entry per item; flattened nested items are embedded as extra lines.
    pub lines: Vec<String>,
    pub font_face: String,
    pub font_size: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperlinkOptions {
    pub rect: Rect,
    pub text: String,
    pub hyperlink: Hyperlink,
    pub color: String,
    pub underline: bool,
    pub font_face: String,
    pub font_size: f64,
}
