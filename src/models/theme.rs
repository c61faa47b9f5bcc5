//! Named themes: colors and fonts applied uniformly across a presentation.

use serde::{Deserialize, Serialize};

/// Selects one of the built-in themes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeSelector {
    #[default]
    Default,
    Professional,
    Creative,
    Minimal,
}

/// Title label and base colors of a theme. Colors are backend hex (no `#`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeProperties {
    pub title: String,
    pub heading_color: String,
    pub body_color: String,
    pub background_color: String,
}

/// Fonts by role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontSet {
    pub heading: String,
    pub body: String,
    pub accent: String,
}

/// A fully resolved theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeDefinition {
    pub properties: ThemeProperties,
    pub color_palette: [String; 9],
    pub font_set: FontSet,
}

impl ThemeDefinition {
    /// First accent color, used for table header fills.
    pub fn accent(&self) -> &str {
        &self.color_palette[0]
    }
}

struct ThemeTable {
    title: &'static str,
    heading: &'static str,
    body: &'static str,
    background: &'static str,
    palette: [&'static str; 9],
    fonts: [&'static str; 3],
}

const DEFAULT: ThemeTable = ThemeTable {
    title: "Default",
    heading: "363636",
    body: "000000",
    background: "FFFFFF",
    palette: [
        "4472C4", "ED7D31", "A5A5A5", "FFC000", "5B9BD5", "70AD47", "264478", "9E480E", "636363",
    ],
    fonts: ["Arial", "Arial", "Arial"],
};

const PROFESSIONAL: ThemeTable = ThemeTable {
    title: "Professional",
    heading: "1F3864",
    body: "333333",
    background: "FFFFFF",
    palette: [
        "1F3864", "2E75B6", "8497B0", "C9A227", "44546A", "A5A5A5", "203864", "5B9BD5", "D6DCE4",
    ],
    fonts: ["Calibri Light", "Calibri", "Georgia"],
};

const CREATIVE: ThemeTable = ThemeTable {
    title: "Creative",
    heading: "7030A0",
    body: "404040",
    background: "FFF9F0",
    palette: [
        "7030A0", "FF6F61", "FFB400", "00A6A6", "6B5B95", "88B04B", "F7CAC9", "92A8D1", "955251",
    ],
    fonts: ["Trebuchet MS", "Verdana", "Georgia"],
};

const MINIMAL: ThemeTable = ThemeTable {
    title: "Minimal",
    heading: "222222",
    body: "555555",
    background: "FAFAFA",
    palette: [
        "222222", "555555", "888888", "AAAAAA", "CCCCCC", "E0E0E0", "0077CC", "333333", "F0F0F0",
    ],
    fonts: ["Helvetica", "Helvetica", "Courier New"],
};

/// Looks up the theme definition for a selector.
pub fn theme_for(selector: ThemeSelector) -> ThemeDefinition {
    let table = match selector {
        ThemeSelector::Default => &DEFAULT,
        ThemeSelector::Professional => &PROFESSIONAL,
        ThemeSelector::Creative => &CREATIVE,
        ThemeSelector::Minimal => &MINIMAL,
    };

    ThemeDefinition {
        properties: ThemeProperties {
            title: table.title.to_string(),
            heading_color: table.heading.to_string(),
            body_color: table.body.to_string(),
            background_color: table.background.to_string(),
        },
        color_palette: table.palette.map(str::to_string),
        font_set: FontSet {
            heading: table.fonts[0].to_string(),
            body: table.fonts[1].to_string(),
            accent: table.fonts[2].to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::colors::RgbColor;

    #[test]
    fn test_every_theme_has_valid_hex_colors() {
        for selector in [
            ThemeSelector::Default,
            ThemeSelector::Professional,
            ThemeSelector::Creative,
            ThemeSelector::Minimal,
        ] {
            let theme = theme_for(selector);
            let props = &theme.properties;
            for color in [&props.heading_color, &props.body_color, &props.background_color]
                .into_iter()
                .chain(theme.color_palette.iter())
            {
                assert!(RgbColor::from_hex(color).is_some(), "{selector:?}: {color}");
            }
            assert!(!theme.font_set.heading.is_empty());
        }
    }

    #[test]
    fn test_lookup_is_by_selector() {
        assert_eq!(theme_for(ThemeSelector::Minimal).properties.title, "Minimal");
        assert_eq!(theme_for(ThemeSelector::default()).properties.title, "Default");
        assert_eq!(theme_for(ThemeSelector::Professional).accent(), "1F3864");
    }
}
