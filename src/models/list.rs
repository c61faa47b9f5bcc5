use serde::{Deserialize, Serialize};

use crate::models::bullet::{BulletDescriptor, BulletKind};

/// Styling captured from a `<ul>`/`<ol>` element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListStyle {
    /// One of `disc`, `1`, `A`, `a`, `I`, `i`.
    #[serde(rename = "type")]
    pub list_type: String,
    /// 1-based numbering offset.
    pub start: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Default for ListStyle {
    fn default() -> Self {
        Self {
            list_type: BulletKind::Disc.type_code().to_string(),
            start: 1,
            font_size: None,
            font_family: None,
            color: None,
        }
    }
}

/// A list; `items` hold each `<li>`'s inner markup, formatted at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResource {
    pub items: Vec<String>,
    pub ordered: bool,
    pub style: ListStyle,
}

impl ListResource {
    /// Bullet descriptor derived from the list's style.
    pub fn bullet(&self) -> BulletDescriptor {
        let kind = BulletKind::from_type(self.ordered, Some(&self.style.list_type));
        BulletDescriptor::new(kind, self.style.start)
    }
}
