// src/models/elements.rs

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::models::image::ImageResource;
use crate::models::link::LinkResource;
use crate::models::list::ListResource;
use crate::models::table::TableResource;
use crate::models::text::TextResource;

/// Style overrides keyed by property name (`x`, `y`, `w`, `h`, `color`, `fontSize`, `fontFace`, ...).
pub type StyleMap = IndexMap<String, String>;

/// The kinds of positioned regions on a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    Title,
    Text,
    Image,
    Table,
    List,
    Link,
}

impl ElementKind {
    pub const ALL: [ElementKind; 6] = [
        ElementKind::Title,
        ElementKind::Text,
        ElementKind::Image,
        ElementKind::Table,
        ElementKind::List,
        ElementKind::Link,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Title => "title",
            ElementKind::Text => "text",
            ElementKind::Image => "image",
            ElementKind::Table => "table",
            ElementKind::List => "list",
            ElementKind::Link => "link",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

/// The resource carried by a slide element. The variant decides which extractor produced it
/// and which backend call renders it.
/// The JSON representation uses the kind as the key (e.g. `"table": {...}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementResource {
    Text(TextResource),
    Image(ImageResource),
    Table(TableResource),
    List(ListResource),
    Link(LinkResource),
}

/// A resource bound to a slide, with optional per-element style overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideElement {
    #[serde(flatten)]
    pub resource: ElementResource,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleMap>,
}

impl SlideElement {
    pub fn new(resource: ElementResource) -> Self {
        Self {
            resource,
            style: None,
        }
    }

    pub fn kind(&self) -> ElementKind {
        match &self.resource {
            ElementResource::Text(_) => ElementKind::Text,
            ElementResource::Image(_) => ElementKind::Image,
            ElementResource::Table(_) => ElementKind::Table,
            ElementResource::List(_) => ElementKind::List,
            ElementResource::Link(_) => ElementKind::Link,
        }
    }
}

impl From<ElementResource> for SlideElement {
    fn from(resource: ElementResource) -> Self {
        SlideElement::new(resource)
    }
}
