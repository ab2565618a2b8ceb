//! sRGB hex colors.

use std::fmt;
use std::str::FromStr;

use fgradient_common::error::FgradientError;
use serde::{Deserialize, Serialize};

/// An 8-bit sRGB color with straight (non-premultiplied) alpha.
///
/// Parsed from `#rgb`, `#rrggbb` or `#rrggbbaa`; the leading `#` is
/// optional and digits are case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl HexColor {
    /// Opaque color from channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from channels with alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Whether the alpha channel is fully opaque.
    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// Linear interpolation per channel, rounded to the nearest step.
    pub fn lerp(a: HexColor, b: HexColor, t: f64) -> HexColor {
        let t = t.clamp(0.0, 1.0);
        let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
        HexColor {
            r: mix(a.r, b.r),
            g: mix(a.g, b.g),
            b: mix(a.b, b.b),
            a: mix(a.a, b.a),
        }
    }
}

impl FromStr for HexColor {
    type Err = FgradientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        let invalid = || FgradientError::config(format!("Invalid hex color: {s:?}"));

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let nibble = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).map_err(|_| invalid());
        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());

        match digits.len() {
            3 => Ok(HexColor::rgb(
                nibble(0)? * 17,
                nibble(1)? * 17,
                nibble(2)? * 17,
            )),
            6 => Ok(HexColor::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(HexColor::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for HexColor {
    type Error = FgradientError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "#{:02x}{:02x}{:02x}{:02x}",
                self.r, self.g, self.b, self.a
            )
        }
    }
}
