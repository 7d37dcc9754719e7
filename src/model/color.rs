use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A color tag from the board palette.
///
/// Serialized with the document's class names (`bg-yellow-200`, ...) so
/// boards written by older versions load unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorTag {
    #[default]
    Yellow,
    Pink,
    Blue,
    Green,
    Purple,
    Orange,
    Red,
    Teal,
    /// List background
    PaleBlue,
    /// List background
    PaleGreen,
}

/// Palette cycled through by new sub-lists and offered by recolor actions.
pub const PALETTE: [ColorTag; 8] = [
    ColorTag::Yellow,
    ColorTag::Pink,
    ColorTag::Blue,
    ColorTag::Green,
    ColorTag::Purple,
    ColorTag::Orange,
    ColorTag::Red,
    ColorTag::Teal,
];

/// Backgrounds offered for lists.
pub const LIST_PALETTE: [ColorTag; 2] = [ColorTag::PaleBlue, ColorTag::PaleGreen];

impl ColorTag {
    /// The document name of this tag
    pub fn class_name(self) -> &'static str {
        match self {
            ColorTag::Yellow => "bg-yellow-200",
            ColorTag::Pink => "bg-pink-200",
            ColorTag::Blue => "bg-blue-200",
            ColorTag::Green => "bg-green-200",
            ColorTag::Purple => "bg-purple-200",
            ColorTag::Orange => "bg-orange-200",
            ColorTag::Red => "bg-red-200",
            ColorTag::Teal => "bg-teal-200",
            ColorTag::PaleBlue => "bg-blue-100",
            ColorTag::PaleGreen => "bg-green-100",
        }
    }

    /// Short human name, used by the CLI and the TUI
    pub fn hue_name(self) -> &'static str {
        match self {
            ColorTag::Yellow => "yellow",
            ColorTag::Pink => "pink",
            ColorTag::Blue => "blue",
            ColorTag::Green => "green",
            ColorTag::Purple => "purple",
            ColorTag::Orange => "orange",
            ColorTag::Red => "red",
            ColorTag::Teal => "teal",
            ColorTag::PaleBlue => "pale-blue",
            ColorTag::PaleGreen => "pale-green",
        }
    }

    /// Parse either a document class name or a hue name.
    pub fn parse(s: &str) -> Option<ColorTag> {
        let s = s.trim();
        ALL.iter()
            .copied()
            .find(|c| c.class_name() == s || c.hue_name().eq_ignore_ascii_case(s))
    }

    /// Palette entry for the n-th sub-list of a list
    pub fn cycled(n: usize) -> ColorTag {
        PALETTE[n % PALETTE.len()]
    }

    /// Next color in the palette this tag belongs to
    pub fn next(self) -> ColorTag {
        if let Some(i) = LIST_PALETTE.iter().position(|c| *c == self) {
            return LIST_PALETTE[(i + 1) % LIST_PALETTE.len()];
        }
        let i = PALETTE.iter().position(|c| *c == self).unwrap_or(0);
        PALETTE[(i + 1) % PALETTE.len()]
    }
}

const ALL: [ColorTag; 10] = [
    ColorTag::Yellow,
    ColorTag::Pink,
    ColorTag::Blue,
    ColorTag::Green,
    ColorTag::Purple,
    ColorTag::Orange,
    ColorTag::Red,
    ColorTag::Teal,
    ColorTag::PaleBlue,
    ColorTag::PaleGreen,
];

impl fmt::Display for ColorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hue_name())
    }
}

impl Serialize for ColorTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.class_name())
    }
}

impl<'de> Deserialize<'de> for ColorTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        match ColorTag::parse(&s) {
            Some(c) => Ok(c),
            None => {
                tracing::warn!(color = %s, "unknown color tag, using default");
                Ok(ColorTag::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_class_and_hue_names() {
        assert_eq!(ColorTag::parse("bg-pink-200"), Some(ColorTag::Pink));
        assert_eq!(ColorTag::parse("Teal"), Some(ColorTag::Teal));
        assert_eq!(ColorTag::parse("bg-green-100"), Some(ColorTag::PaleGreen));
        assert_eq!(ColorTag::parse("bg-mauve-900"), None);
    }

    #[test]
    fn cycled_wraps_around_palette() {
        assert_eq!(ColorTag::cycled(0), ColorTag::Yellow);
        assert_eq!(ColorTag::cycled(1), ColorTag::Pink);
        assert_eq!(ColorTag::cycled(8), ColorTag::Yellow);
    }

    #[test]
    fn next_stays_in_own_palette() {
        assert_eq!(ColorTag::Teal.next(), ColorTag::Yellow);
        assert_eq!(ColorTag::PaleBlue.next(), ColorTag::PaleGreen);
        assert_eq!(ColorTag::PaleGreen.next(), ColorTag::PaleBlue);
    }

    #[test]
    fn serde_uses_class_names() {
        let json = serde_json::to_string(&ColorTag::Purple).unwrap();
        assert_eq!(json, "\"bg-purple-200\"");
        let back: ColorTag = serde_json::from_str("\"bg-orange-200\"").unwrap();
        assert_eq!(back, ColorTag::Orange);
        let unknown: ColorTag = serde_json::from_str("\"bg-mauve-900\"").unwrap();
        assert_eq!(unknown, ColorTag::Yellow);
    }
}
