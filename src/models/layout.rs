//! Fixed position tables for each layout variant.
//!
//! Coordinates are inches from the top-left of the slide. Element-level style overrides always
//! win over the rectangles returned here.

use serde::{Deserialize, Serialize};

use crate::models::common::Rect;
use crate::models::elements::ElementKind;

/// A named set of position rectangles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutVariant {
    /// 16:9, 10 x 5.625 in.
    #[default]
    Standard,
    /// 16:9 widescreen, 13.33 x 7.5 in.
    Wide,
    /// 10 x 5.625 in with regions widened towards the slide edges.
    Custom,
}

impl LayoutVariant {
    /// Slide width and height in inches.
    pub fn slide_size(&self) -> (f64, f64) {
        match self {
            LayoutVariant::Standard | LayoutVariant::Custom => (10.0, 5.625),
            LayoutVariant::Wide => (13.333, 7.5),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LayoutVariant::Standard => "standard",
            LayoutVariant::Wide => "wide",
            LayoutVariant::Custom => "custom",
        }
    }
}

/// Position rectangles per element kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPositions {
    pub title: Rect,
    pub text: Rect,
    pub image: Rect,
    pub table: Rect,
    pub list: Rect,
    pub link: Rect,
}

impl LayoutPositions {
    pub fn rect_for(&self, kind: ElementKind) -> Rect {
        match kind {
            ElementKind::Title => self.title,
            ElementKind::Text => self.text,
            ElementKind::Image => self.image,
            ElementKind::Table => self.table,
            ElementKind::List => self.list,
            ElementKind::Link => self.link,
        }
    }
}

const STANDARD: LayoutPositions = LayoutPositions {
    title: Rect::new(0.5, 0.25, 9.0, Some(0.75)),
    text: Rect::new(0.5, 1.2, 9.0, None),
    image: Rect::new(1.0, 1.2, 8.0, Some(4.0)),
    table: Rect::new(0.5, 1.2, 9.0, None),
    list: Rect::new(0.5, 1.2, 9.0, None),
    link: Rect::new(0.5, 1.2, 9.0, Some(0.4)),
};

const WIDE: LayoutPositions = LayoutPositions {
    title: Rect::new(0.5, 0.3, 12.333, Some(0.9)),
    text: Rect::new(0.5, 1.4, 12.333, None),
    image: Rect::new(1.5, 1.4, 10.333, Some(5.4)),
    table: Rect::new(0.5, 1.4, 12.333, None),
    list: Rect::new(0.5, 1.4, 12.333, None),
    link: Rect::new(0.5, 1.4, 12.333, Some(0.5)),
};

// 95% of the 10in slide for most regions; images 85%, lists 90%.
const CUSTOM: LayoutPositions = LayoutPositions {
    title: Rect::new(0.25, 0.2, 9.5, Some(0.75)),
    text: Rect::new(0.25, 1.1, 9.5, None),
    image: Rect::new(0.75, 1.1, 8.5, Some(4.2)),
    table: Rect::new(0.25, 1.1, 9.5, None),
    list: Rect::new(0.5, 1.1, 9.0, None),
    link: Rect::new(0.25, 1.1, 9.5, Some(0.4)),
};

/// Looks up the position table for a layout variant.
pub fn positions_for(variant: LayoutVariant) -> LayoutPositions {
    match variant {
        LayoutVariant::Standard => STANDARD,
        LayoutVariant::Wide => WIDE,
        LayoutVariant::Custom => CUSTOM,
    }
}
