use serde::{Deserialize, Serialize};

/// Glyph used for unordered lists and for flattened nested items.
pub const DISC_GLYPH: &str = "\u{2022}";

/// The numbering or glyph style of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BulletKind {
    /// A literal bullet glyph.
    Disc,
    /// 1, 2, 3, ...
    Decimal,
    /// A, B, C, ...
    UpperLetter,
    /// a, b, c, ...
    LowerLetter,
    /// I, II, III, ...
    UpperRoman,
    /// i, ii, iii, ...
    LowerRoman,
}

impl BulletKind {
    /// Maps a list's `type` attribute to a bullet kind.
    /// Unordered lists are always `Disc`; unknown or absent ordered types are `Decimal`.
    pub fn from_type(ordered: bool, list_type: Option<&str>) -> Self {
        if !ordered {
            return BulletKind::Disc;
        }
        match list_type.map(str::trim) {
            Some("A") => BulletKind::UpperLetter,
            Some("a") => BulletKind::LowerLetter,
            Some("I") => BulletKind::UpperRoman,
            Some("i") => BulletKind::LowerRoman,
            _ => BulletKind::Decimal,
        }
    }

    /// The canonical `type` value for this kind (`disc` for unordered).
    pub fn type_code(&self) -> &'static str {
        match self {
            BulletKind::Disc => "disc",
            BulletKind::Decimal => "1",
            BulletKind::UpperLetter => "A",
            BulletKind::LowerLetter => "a",
            BulletKind::UpperRoman => "I",
            BulletKind::LowerRoman => "i",
        }
    }
}

/// Describes how a list's bullets are rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletDescriptor {
    pub kind: BulletKind,
    /// The literal glyph, only for `Disc`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glyph: Option<String>,
    /// Numbering start, only when it is not 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,
}

impl BulletDescriptor {
    pub fn new(kind: BulletKind, start: u32) -> Self {
        let glyph = (kind == BulletKind::Disc).then(|| DISC_GLYPH.to_string());
        let start = (kind != BulletKind::Disc && start != 1).then_some(start);
        Self { kind, glyph, start }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mapping_table() {
        assert_eq!(BulletKind::from_type(false, None), BulletKind::Disc);
        assert_eq!(BulletKind::from_type(false, Some("A")), BulletKind::Disc);
        assert_eq!(BulletKind::from_type(true, None), BulletKind::Decimal);
        assert_eq!(BulletKind::from_type(true, Some("1")), BulletKind::Decimal);
        assert_eq!(BulletKind::from_type(true, Some("A")), BulletKind::UpperLetter);
        assert_eq!(BulletKind::from_type(true, Some("a")), BulletKind::LowerLetter);
        assert_eq!(BulletKind::from_type(true, Some("I")), BulletKind::UpperRoman);
        assert_eq!(BulletKind::from_type(true, Some("i")), BulletKind::LowerRoman);
        assert_eq!(BulletKind::from_type(true, Some("square")), BulletKind::Decimal);
    }

    #[test]
    fn test_type_code_round_trips_through_mapping() {
        for kind in [
            BulletKind::Decimal,
            BulletKind::UpperLetter,
            BulletKind::LowerLetter,
            BulletKind::UpperRoman,
            BulletKind::LowerRoman,
        ] {
            assert_eq!(BulletKind::from_type(true, Some(kind.type_code())), kind);
        }
    }

    #[test]
    fn test_descriptor_start_and_glyph() {
        let disc = BulletDescriptor::new(BulletKind::Disc, 1);
        assert_eq!(disc.glyph.as_deref(), Some(DISC_GLYPH));
        assert_eq!(disc.start, None);

        let letters = BulletDescriptor::new(BulletKind::UpperLetter, 3);
        assert_eq!(letters.glyph, None);
        assert_eq!(letters.start, Some(3));

        assert_eq!(BulletDescriptor::new(BulletKind::Decimal, 1).start, None);
    }
}
