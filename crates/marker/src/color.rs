use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid hex color {0:?}: expected six hex digits with an optional leading '#'")]
pub struct ColorParseError(pub String);

/// An sRGB color written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    r: u8,
    g: u8,
    b: u8,
}

/// Foreground picked for legibility against a highlight background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextColor {
    Black,
    White,
}

impl TextColor {
    pub fn as_str(self) -> &'static str {
        match self {
            TextColor::Black => "black",
            TextColor::White => "white",
        }
    }
}

impl HexColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// BT.601 luma scaled to `0.0..=1.0`.
    pub fn luminance(self) -> f64 {
        (0.299 * f64::from(self.r) + 0.587 * f64::from(self.g) + 0.114 * f64::from(self.b))
            / 255.0
    }

    pub fn is_light(self) -> bool {
        self.luminance() > 0.5
    }

    pub fn contrast_text(self) -> TextColor {
        if self.is_light() {
            TextColor::Black
        } else {
            TextColor::White
        }
    }
}

/// Parses `#rrggbb` / `rrggbb` (any case). Shorthand, named and functional
/// colors are rejected.
pub fn hex_to_rgb(hex: &str) -> Option<[u8; 3]> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |ix: usize| u8::from_str_radix(&digits[ix..ix + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// `None` when `color` is not a six-digit hex color.
pub fn is_light(color: &str) -> Option<bool> {
    color.parse::<HexColor>().ok().map(HexColor::is_light)
}

impl FromStr for HexColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [r, g, b] = hex_to_rgb(s).ok_or_else(|| ColorParseError(s.to_string()))?;
        Ok(Self { r, g, b })
    }
}

impl TryFrom<String> for HexColor {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(value: HexColor) -> Self {
        value.to_string()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_to_rgb_accepts_optional_hash_and_any_case() {
        assert_eq!(hex_to_rgb("#FFeb3B"), Some([0xff, 0xeb, 0x3b]));
        assert_eq!(hex_to_rgb("00ff7f"), Some([0x00, 0xff, 0x7f]));
    }

    #[test]
    fn hex_to_rgb_rejects_everything_else() {
        for bad in ["#fff", "red", "rgb(1,2,3)", "##ffffff", "#fffffff", "#gggggg", ""] {
            assert_eq!(hex_to_rgb(bad), None, "{bad}");
        }
    }

    #[test]
    fn mid_grey_is_just_over_the_line() {
        let grey: HexColor = "#808080".parse().unwrap();
        assert!((grey.luminance() - 128.0 / 255.0).abs() < 1e-9);
        assert!(grey.is_light());

        let darker: HexColor = "#7f7f7f".parse().unwrap();
        assert!(!darker.is_light());
    }

    #[test]
    fn display_is_lowercase_with_hash() {
        let color: HexColor = "ABCDEF".parse().unwrap();
        assert_eq!(color.to_string(), "#abcdef");
        assert_eq!(String::from(color), "#abcdef");
    }
}
