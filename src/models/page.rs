// src/models/page.rs

use serde::{Deserialize, Serialize};

use crate::models::elements::SlideElement;

/// Title used when no better title can be found.
pub const UNTITLED: &str = "Untitled";

/// A titled, ordered slice of the source document destined for one slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Never empty; falls back to `"Untitled"`.
    pub title: String,
    /// Serialized markup of the nodes that make up the section, heading included.
    pub source_fragment: String,
    /// Elements in document order. Empty until the section assembler runs.
    #[serde(default)]
    pub elements: Vec<SlideElement>,
}

impl Section {
    pub fn new(title: impl Into<String>, source_fragment: impl Into<String>) -> Self {
        let title = title.into();
        let title = if title.trim().is_empty() {
            UNTITLED.to_string()
        } else {
            title
        };
        Self {
            title,
            source_fragment: source_fragment.into(),
            elements: Vec::new(),
        }
    }

    pub fn is_untitled(&self) -> bool {
        self.title == UNTITLED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_title_falls_back() {
        let section = Section::new("   ", "<p>x</p>");
        assert_eq!(section.title, UNTITLED);
        assert!(section.is_untitled());
        assert!(section.elements.is_empty());
    }
}
