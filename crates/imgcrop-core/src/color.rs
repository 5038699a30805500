//! Background fill color for overhang and rotation corners.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a fill color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid fill color {0:?}: expected a color name or #rgb/#rrggbb")]
pub struct ColorParseError(pub String);

/// Opaque RGB fill color.
///
/// Deserializes from either a small set of CSS color names or a hex string,
/// so configuration can say `fill_color = "white"` or `"#f0f0f0"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FillColor(pub [u8; 3]);

impl FillColor {
    pub const WHITE: FillColor = FillColor([255, 255, 255]);
    pub const BLACK: FillColor = FillColor([0, 0, 0]);

    /// Parse a color name or hex string.
    pub fn parse(value: &str) -> Result<Self, ColorParseError> {
        let trimmed = value.trim();
        let named = match trimmed.to_ascii_lowercase().as_str() {
            "white" => Some([255, 255, 255]),
            "black" => Some([0, 0, 0]),
            "gray" | "grey" => Some([128, 128, 128]),
            "silver" => Some([192, 192, 192]),
            "whitesmoke" => Some([245, 245, 245]),
            _ => None,
        };
        if let Some(rgb) = named {
            return Ok(FillColor(rgb));
        }

        let hex = trimmed
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError(value.to_string()))?;
        let digit = |c: u8| (c as char).to_digit(16).map(|d| d as u8);
        let bytes = hex.as_bytes();

        let rgb = match bytes.len() {
            3 => {
                let mut rgb = [0u8; 3];
                for (slot, &c) in rgb.iter_mut().zip(bytes) {
                    let d = digit(c).ok_or_else(|| ColorParseError(value.to_string()))?;
                    *slot = d * 17;
                }
                rgb
            }
            6 => {
                let mut rgb = [0u8; 3];
                for (slot, pair) in rgb.iter_mut().zip(bytes.chunks(2)) {
                    let hi = digit(pair[0]).ok_or_else(|| ColorParseError(value.to_string()))?;
                    let lo = digit(pair[1]).ok_or_else(|| ColorParseError(value.to_string()))?;
                    *slot = hi * 16 + lo;
                }
                rgb
            }
            _ => return Err(ColorParseError(value.to_string())),
        };
        Ok(FillColor(rgb))
    }

    /// The color as an RGB triple.
    #[inline]
    pub fn rgb(self) -> [u8; 3] {
        self.0
    }
}

impl Default for FillColor {
    fn default() -> Self {
        FillColor::WHITE
    }
}

impl TryFrom<String> for FillColor {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        FillColor::parse(&value)
    }
}

impl From<FillColor> for String {
    fn from(color: FillColor) -> Self {
        let [r, g, b] = color.0;
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_colors() {
        assert_eq!(FillColor::parse("white").unwrap(), FillColor::WHITE);
        assert_eq!(FillColor::parse("Black").unwrap(), FillColor::BLACK);
        assert_eq!(FillColor::parse(" grey ").unwrap().rgb(), [128, 128, 128]);
    }

    #[test]
    fn test_hex_colors() {
        assert_eq!(FillColor::parse("#ff8000").unwrap().rgb(), [255, 128, 0]);
        assert_eq!(FillColor::parse("#FFF").unwrap(), FillColor::WHITE);
        assert_eq!(FillColor::parse("#0a0").unwrap().rgb(), [0, 170, 0]);
    }

    #[test]
    fn test_invalid_colors() {
        assert!(FillColor::parse("ff8000").is_err());
        assert!(FillColor::parse("#ff80").is_err());
        assert!(FillColor::parse("#gggggg").is_err());
        assert!(FillColor::parse("mauve-ish").is_err());
    }

    #[test]
    fn test_string_roundtrip_is_hex() {
        let s: String = FillColor::parse("white").unwrap().into();
        assert_eq!(s, "#ffffff");
    }

    #[test]
    fn test_default_is_white() {
        assert_eq!(FillColor::default(), FillColor::WHITE);
    }
}
