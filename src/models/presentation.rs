use serde::{Deserialize, Serialize};

use crate::backend::options::{
    HyperlinkOptions, ImagePlacement, ListOptions, TableOptions, TextOptions,
};
use crate::models::layout::LayoutVariant;
use crate::models::theme::ThemeDefinition;

/// A positioned element on a deck slide.
/// The JSON representation carries the element kind in a `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DeckElement {
    Text(TextOptions),
    Image(ImagePlacement),
    Table(TableOptions),
    List(ListOptions),
    Hyperlink(HyperlinkOptions),
}

/// A slide in a deck description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckSlide {
    /// The section title the slide was built from.
    pub name: String,
    pub background_color: String,
    /// Elements in the order the assembler rendered them.
    pub elements: Vec<DeckElement>,
}

/// A deck description: the artifact produced by the reference backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub layout: LayoutVariant,
    /// Slide width in inches.
    pub width: f64,
    /// Slide height in inches.
    pub height: f64,
    pub theme: ThemeDefinition,
    pub slides: Vec<DeckSlide>,
}

impl Deck {
    /// Every element of every slide, in order.
    pub fn elements(&self) -> impl Iterator<Item = &DeckElement> {
        self.slides.iter().flat_map(|slide| slide.elements.iter())
    }
}
