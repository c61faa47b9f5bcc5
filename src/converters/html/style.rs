//! Inline CSS helpers: declaration parsing and length conversion.

use indexmap::IndexMap;
use markup5ever_rcdom::Handle;

use super::dom::attr;

/// Base font size in points that relative lengths (`em`, `rem`, `%`) resolve against.
pub const BASE_FONT_PT: f64 = 12.0;

/// Parses a `style` attribute into lowercase property names and trimmed values.
/// Later declarations of the same property win.
pub fn parse_style(style: &str) -> IndexMap<String, String> {
    let mut declarations = IndexMap::new();
    for declaration in style.split(';') {
        let Some((property, value)) = declaration.split_once(':') else {
            continue;
        };
        let property = property.trim().to_ascii_lowercase();
        let value = value.trim().trim_end_matches("!important").trim();
        if property.is_empty() || value.is_empty() {
            continue;
        }
        declarations.insert(property, value.to_string());
    }
    declarations
}

/// The parsed `style` attribute of an element (empty when absent).
pub fn inline_style(node: &Handle) -> IndexMap<String, String> {
    attr(node, "style")
        .map(|style| parse_style(&style))
        .unwrap_or_default()
}

fn split_number(value: &str) -> Option<(f64, String)> {
    let value = value.trim().to_ascii_lowercase();
    let end = value
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
        .unwrap_or(value.len());
    let number = value[..end].parse::<f64>().ok()?;
    Some((number, value[end..].trim().to_string()))
}

/// Converts a CSS length to points.
///
/// `px` is 0.75pt, `em`/`rem` and `%` scale `base_pt`, unitless numbers are pixels.
/// Absolute keywords (`small`, `large`, ...) follow the usual browser table.
pub fn css_length_to_pt(value: &str, base_pt: f64) -> Option<f64> {
    let keyword = match value.trim().to_ascii_lowercase().as_str() {
        "xx-small" => Some(7.0),
        "x-small" => Some(7.5),
        "small" => Some(10.0),
        "medium" => Some(12.0),
        "large" => Some(13.5),
        "x-large" => Some(18.0),
        "xx-large" => Some(24.0),
        _ => None,
    };
    if keyword.is_some() {
        return keyword;
    }

    let (number, unit) = split_number(value)?;
    let points = match unit.as_str() {
        "" | "px" => number * 0.75,
        "pt" => number,
        "em" | "rem" => number * base_pt,
        "%" => number * base_pt / 100.0,
        "in" => number * 72.0,
        "cm" => number * 72.0 / 2.54,
        "mm" => number * 72.0 / 25.4,
        _ => return None,
    };
    (points.is_finite() && points > 0.0).then_some(points)
}

/// Converts a CSS length or HTML dimension attribute to whole pixels.
/// Relative units cannot be resolved without a viewport and yield `None`.
pub fn css_length_to_px(value: &str) -> Option<u32> {
    let (number, unit) = split_number(value)?;
    let pixels = match unit.as_str() {
        "" | "px" => number,
        "pt" => number * 4.0 / 3.0,
        "in" => number * 96.0,
        _ => return None,
    };
    if pixels.is_finite() && pixels >= 1.0 {
        Some(pixels.round() as u32)
    } else {
        None
    }
}

/// The first family of a `font-family` list, unquoted.
pub fn primary_font_family(value: &str) -> Option<String> {
    value
        .split(',')
        .next()
        .map(|family| family.trim().trim_matches(|c| c == '"' || c == '\'').trim().to_string())
        .filter(|family| !family.is_empty())
}
