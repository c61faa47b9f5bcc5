use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// An RGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RgbColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

static RGB_FUNCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*[\d.]+\s*)?\)$")
        .expect("valid rgb() regex")
});

/// CSS named colors commonly found in authored markup.
const NAMED_COLORS: &[(&str, RgbColor)] = &[
    ("black", RgbColor::new(0, 0, 0)),
    ("white", RgbColor::new(255, 255, 255)),
    ("red", RgbColor::new(255, 0, 0)),
    ("green", RgbColor::new(0, 128, 0)),
    ("lime", RgbColor::new(0, 255, 0)),
    ("blue", RgbColor::new(0, 0, 255)),
    ("navy", RgbColor::new(0, 0, 128)),
    ("yellow", RgbColor::new(255, 255, 0)),
    ("orange", RgbColor::new(255, 165, 0)),
    ("purple", RgbColor::new(128, 0, 128)),
    ("gray", RgbColor::new(128, 128, 128)),
    ("grey", RgbColor::new(128, 128, 128)),
    ("silver", RgbColor::new(192, 192, 192)),
    ("maroon", RgbColor::new(128, 0, 0)),
    ("olive", RgbColor::new(128, 128, 0)),
    ("teal", RgbColor::new(0, 128, 128)),
    ("aqua", RgbColor::new(0, 255, 255)),
    ("cyan", RgbColor::new(0, 255, 255)),
    ("fuchsia", RgbColor::new(255, 0, 255)),
    ("magenta", RgbColor::new(255, 0, 255)),
    ("pink", RgbColor::new(255, 192, 203)),
    ("brown", RgbColor::new(165, 42, 42)),
];

impl RgbColor {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parses a CSS color value: `#rgb`, `#rrggbb`, `rgb()`/`rgba()`, or a named color.
    /// Returns `None` for anything else (`transparent`, `inherit`, gradients, ...).
    pub fn from_css(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Some(hex) = value.strip_prefix('#') {
            return Self::from_hex(hex);
        }
        if let Some(caps) = RGB_FUNCTION.captures(value) {
            let channel = |i: usize| -> Option<u8> {
                caps.get(i)
                    .and_then(|m| m.as_str().parse::<u16>().ok())
                    .map(|v| v.min(255) as u8)
            };
            return Some(Self::new(channel(1)?, channel(2)?, channel(3)?));
        }
        let lower = value.to_ascii_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, color)| *color)
    }

    /// Parses 3 or 6 hex digits (no leading `#`).
    pub fn from_hex(hex: &str) -> Option<Self> {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            3 => {
                let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|d| d * 17);
                Some(Self::new(digit(0)?, digit(1)?, digit(2)?))
            }
            6 => {
                let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
                Some(Self::new(pair(0)?, pair(2)?, pair(4)?))
            }
            _ => None,
        }
    }

    /// Backend hex form: six uppercase digits, no `#`.
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

/// Normalizes any CSS color string to backend hex form, or `None` if it cannot be parsed.
pub fn normalize_color(value: &str) -> Option<String> {
    RgbColor::from_css(value).map(|c| c.to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_forms() {
        assert_eq!(normalize_color("#fff").as_deref(), Some("FFFFFF"));
        assert_eq!(normalize_color("#1a2B3c").as_deref(), Some("1A2B3C"));
        assert_eq!(normalize_color("#12345"), None);
        assert_eq!(normalize_color("#ggg"), None);
    }

    #[test]
    fn test_rgb_function_and_names() {
        assert_eq!(normalize_color("rgb(255, 0, 0)").as_deref(), Some("FF0000"));
        assert_eq!(normalize_color("RGBA(0,128,255,0.5)").as_deref(), Some("0080FF"));
        assert_eq!(normalize_color("Navy").as_deref(), Some("000080"));
        assert_eq!(normalize_color("transparent"), None);
    }
}
