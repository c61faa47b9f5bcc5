use serde::{Deserialize, Serialize};

use crate::models::properties::Alignment;

/// Fallback width in pixels when neither an attribute nor a style gives one.
pub const DEFAULT_IMAGE_WIDTH: u32 = 300;
/// Fallback height in pixels.
pub const DEFAULT_IMAGE_HEIGHT: u32 = 200;

/// Presentation hints captured from an `<img>` element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
    /// Derived from the legacy `hspace` attribute or an inline `margin`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<String>,
    pub align: Alignment,
}

impl Default for ImageStyle {
    fn default() -> Self {
        Self {
            border: None,
            margin: None,
            align: Alignment::Center,
        }
    }
}

/// An image found in the document.
/// `width` and `height` are always positive pixel sizes after extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResource {
    pub src: String,
    pub alt: String,
    pub width: u32,
    pub height: u32,
    /// Set when `src` itself is a `data:` URI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<ImageStyle>,
}
