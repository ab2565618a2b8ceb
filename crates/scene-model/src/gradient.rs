//! Three-stop linear gradient configuration.
//!
//! Angles follow the CSS `linear-gradient` convention: 0° points up and
//! angles grow clockwise, so 90° runs left-to-right.

use std::fmt;
use std::str::FromStr;

use fgradient_common::error::FgradientError;
use serde::{Deserialize, Serialize};

use crate::color::HexColor;

/// Gradient direction: one of the fixed presets, or a custom angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Left to right.
    #[serde(rename = "90deg")]
    Horizontal,
    /// Top to bottom.
    #[serde(rename = "180deg")]
    Vertical,
    /// Bottom-left to top-right.
    #[serde(rename = "45deg")]
    DiagonalDown,
    /// Top-left to bottom-right.
    #[serde(rename = "135deg")]
    DiagonalAlt,
    /// Use [`GradientConfig::custom_degree`].
    #[serde(rename = "custom")]
    Custom,
}

impl Direction {
    /// All selectable directions, in menu order.
    pub const ALL: [Direction; 5] = [
        Direction::Horizontal,
        Direction::Vertical,
        Direction::DiagonalDown,
        Direction::DiagonalAlt,
        Direction::Custom,
    ];

    /// The token used in configuration and CSS (`"45deg"`, `"custom"`).
    pub fn token(self) -> &'static str {
        match self {
            Direction::Horizontal => "90deg",
            Direction::Vertical => "180deg",
            Direction::DiagonalDown => "45deg",
            Direction::DiagonalAlt => "135deg",
            Direction::Custom => "custom",
        }
    }

    /// Menu label.
    pub fn label(self) -> &'static str {
        match self {
            Direction::Horizontal => "Horizontal (90°)",
            Direction::Vertical => "Vertical (180°)",
            Direction::DiagonalDown => "Diagonal (45°)",
            Direction::DiagonalAlt => "Diagonal (135°)",
            Direction::Custom => "Custom",
        }
    }

    /// Fixed angle of a preset. `None` for [`Direction::Custom`].
    pub fn preset_degrees(self) -> Option<u32> {
        match self {
            Direction::Horizontal => Some(90),
            Direction::Vertical => Some(180),
            Direction::DiagonalDown => Some(45),
            Direction::DiagonalAlt => Some(135),
            Direction::Custom => None,
        }
    }
}

impl FromStr for Direction {
    type Err = FgradientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        Direction::ALL
            .into_iter()
            .find(|d| d.token() == token)
            .ok_or_else(|| {
                FgradientError::config(format!(
                    "Unknown gradient direction: {s:?}. Use: 90deg, 180deg, 45deg, 135deg, custom"
                ))
            })
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Normalize any degree value into `[0, 360)`.
pub fn normalize_degrees(degrees: i32) -> u32 {
    degrees.rem_euclid(360) as u32
}

/// Gradient colors and direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradientConfig {
    pub start_color: HexColor,
    pub mid_color: HexColor,
    pub end_color: HexColor,
    pub direction: Direction,

    /// Only used when `direction` is [`Direction::Custom`], but kept in
    /// state otherwise so switching back restores it.
    #[serde(default)]
    pub custom_degree: i32,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            start_color: HexColor::rgb(0x14, 0xb8, 0xa6),
            mid_color: HexColor::rgb(0x06, 0xb6, 0xd4),
            end_color: HexColor::rgb(0x3b, 0x82, 0xf6),
            direction: Direction::DiagonalDown,
            custom_degree: 45,
        }
    }
}

impl GradientConfig {
    /// Effective CSS angle in degrees, normalized into `[0, 360)`.
    pub fn angle_degrees(&self) -> u32 {
        match self.direction.preset_degrees() {
            Some(deg) => deg,
            None => normalize_degrees(self.custom_degree),
        }
    }

    /// Stops in order: start, mid, end.
    pub fn stops(&self) -> [(f64, HexColor); 3] {
        [
            (0.0, self.start_color),
            (0.5, self.mid_color),
            (1.0, self.end_color),
        ]
    }

    /// Human-readable angle for info displays (`"45°"`).
    pub fn angle_label(&self) -> String {
        format!("{}°", self.angle_degrees())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_angles() {
        let mut g = GradientConfig::default();
        for (dir, deg) in [
            (Direction::Horizontal, 90),
            (Direction::Vertical, 180),
            (Direction::DiagonalDown, 45),
            (Direction::DiagonalAlt, 135),
        ] {
            g.direction = dir;
            assert_eq!(g.angle_degrees(), deg);
        }
    }

    #[test]
    fn test_custom_degree_ignored_for_presets() {
        let g = GradientConfig {
            direction: Direction::Vertical,
            custom_degree: 17,
            ..GradientConfig::default()
        };
        assert_eq!(g.angle_degrees(), 180);
        assert_eq!(g.custom_degree, 17);
    }

    #[test]
    fn test_custom_degree_normalized() {
        let mut g = GradientConfig {
            direction: Direction::Custom,
            ..GradientConfig::default()
        };
        for (input, expected) in [(0, 0), (360, 0), (370, 10), (-90, 270), (-720, 0), (725, 5)] {
            g.custom_degree = input;
            assert_eq!(g.angle_degrees(), expected, "custom {input}");
        }
    }

    #[test]
    fn test_direction_tokens_round_trip() {
        for dir in Direction::ALL {
            assert_eq!(dir.token().parse::<Direction>().unwrap(), dir);
            let json = serde_json::to_string(&dir).unwrap();
            assert_eq!(json, format!("\"{}\"", dir.token()));
        }
        assert!("to right".parse::<Direction>().is_err());
    }

    #[test]
    fn test_gradient_json_shape() {
        let json = serde_json::to_value(GradientConfig::default()).unwrap();
        assert_eq!(json["startColor"], "#14b8a6");
        assert_eq!(json["midColor"], "#06b6d4");
        assert_eq!(json["endColor"], "#3b82f6");
        assert_eq!(json["direction"], "45deg");
        assert_eq!(json["customDegree"], 45);
    }

    #[test]
    fn test_stops_are_ordered() {
        let g = GradientConfig::default();
        let stops = g.stops();
        assert_eq!(stops[0], (0.0, g.start_color));
        assert_eq!(stops[1], (0.5, g.mid_color));
        assert_eq!(stops[2], (1.0, g.end_color));
    }
}
