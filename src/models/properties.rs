// src/models/properties.rs

use serde::{Deserialize, Serialize};

/// Horizontal alignment of a block of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    /// Parses a CSS `text-align` value or a legacy `align` attribute.
    /// `start`/`end` are treated as left-to-right.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" | "start" => Some(Alignment::Left),
            "center" | "middle" => Some(Alignment::Center),
            "right" | "end" => Some(Alignment::Right),
            "justify" => Some(Alignment::Justify),
            _ => None,
        }
    }
}

/// Vertical alignment of table cell content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlignment {
    Top,
    Middle,
    Bottom,
}

impl VerticalAlignment {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "top" => Some(VerticalAlignment::Top),
            "middle" | "center" => Some(VerticalAlignment::Middle),
            "bottom" => Some(VerticalAlignment::Bottom),
            _ => None,
        }
    }
}

/// Formatting read from a markup fragment.
/// Unset fields mean "not specified" and are omitted when serialized. Runs produced by
/// flattening carry every boolean explicitly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatDescriptor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strikethrough: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub superscript: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscript: Option<bool>,

    /// CSS color as authored; normalized to hex at render time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// CSS length as authored (e.g. `"16px"`, `"1.2em"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,

    /// 1-6 for `h1`-`h6`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading_level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,

    /// True iff the source fragment holds more than one inline-formatting descendant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_nested_formatting: Option<bool>,
}

impl FormatDescriptor {
    /// Merges `specific` over `self`: boolean flags are OR'd together, every other field
    /// takes the value from `specific` when it is set there.
    pub fn inherit(&self, specific: &FormatDescriptor) -> FormatDescriptor {
        fn or_flag(a: Option<bool>, b: Option<bool>) -> Option<bool> {
            match (a, b) {
                (None, None) => None,
                (a, b) => Some(a.unwrap_or(false) || b.unwrap_or(false)),
            }
        }

        FormatDescriptor {
            bold: or_flag(self.bold, specific.bold),
            italic: or_flag(self.italic, specific.italic),
            underline: or_flag(self.underline, specific.underline),
            strikethrough: or_flag(self.strikethrough, specific.strikethrough),
            superscript: or_flag(self.superscript, specific.superscript),
            subscript: or_flag(self.subscript, specific.subscript),
            color: specific.color.clone().or_else(|| self.color.clone()),
            background_color: specific
                .background_color
                .clone()
                .or_else(|| self.background_color.clone()),
            font_family: specific
                .font_family
                .clone()
                .or_else(|| self.font_family.clone()),
            font_size: specific.font_size.clone().or_else(|| self.font_size.clone()),
            heading_level: specific.heading_level.or(self.heading_level),
            alignment: specific.alignment.or(self.alignment),
            has_nested_formatting: specific.has_nested_formatting.or(self.has_nested_formatting),
        }
    }

    /// Sets every boolean flag explicitly (`None` becomes `false`).
    pub fn with_explicit_flags(mut self) -> Self {
        for flag in [
            &mut self.bold,
            &mut self.italic,
            &mut self.underline,
            &mut self.strikethrough,
            &mut self.superscript,
            &mut self.subscript,
            &mut self.has_nested_formatting,
        ] {
            *flag = Some(flag.unwrap_or(false));
        }
        self
    }

    pub fn is_bold(&self) -> bool {
        self.bold.unwrap_or(false)
    }

    pub fn is_italic(&self) -> bool {
        self.italic.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inherit_ors_flags_and_overrides_values() {
        let parent = FormatDescriptor {
            bold: Some(true),
            color: Some("red".to_string()),
            font_size: Some("12px".to_string()),
            ..Default::default()
        };
        let child = FormatDescriptor {
            italic: Some(true),
            bold: Some(false),
            color: Some("blue".to_string()),
            ..Default::default()
        };
        let merged = parent.inherit(&child);
        assert_eq!(merged.bold, Some(true));
        assert_eq!(merged.italic, Some(true));
        assert_eq!(merged.underline, None);
        assert_eq!(merged.color.as_deref(), Some("blue"));
        assert_eq!(merged.font_size.as_deref(), Some("12px"));
    }

    #[test]
    fn test_explicit_flags() {
        let format = FormatDescriptor::default().with_explicit_flags();
        assert_eq!(format.bold, Some(false));
        assert_eq!(format.subscript, Some(false));
        assert_eq!(format.color, None);
    }

    #[test]
    fn test_unset_fields_are_omitted() {
        let format = FormatDescriptor {
            heading_level: Some(2),
            ..Default::default()
        };
        let json = serde_json::to_string(&format).unwrap();
        assert_eq!(json, r#"{"headingLevel":2}"#);
    }

    #[test]
    fn test_alignment_parse() {
        assert_eq!(Alignment::parse(" Center "), Some(Alignment::Center));
        assert_eq!(Alignment::parse("start"), Some(Alignment::Left));
        assert_eq!(Alignment::parse("inherit"), None);
    }
}
