// src/models/text.rs

use serde::{Deserialize, Serialize};

use crate::models::properties::FormatDescriptor;

/// A piece of text with the formatting it was authored with.
///
/// Block-level text elements carry their flattened runs in `runs` when the source block
/// mixes inline formatting; a run itself never has nested runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextResource {
    /// Plain text with markup stripped and whitespace collapsed.
    pub content: String,
    pub format: FormatDescriptor,
    /// Flattened formatting runs, in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub runs: Vec<TextResource>,
}

impl TextResource {
    pub fn new(content: impl Into<String>, format: FormatDescriptor) -> Self {
        Self {
            content: content.into(),
            format,
            runs: Vec::new(),
        }
    }

    /// True when the resource should be rendered run by run.
    pub fn has_runs(&self) -> bool {
        !self.runs.is_empty()
    }
}
