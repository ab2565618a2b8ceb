//! Gradient geometry: direction → concrete axis segment.
//!
//! Angles use the CSS convention (0° up, clockwise). In y-down pixel space
//! the unit direction for angle θ is `(sin θ, -cos θ)`, and the axis is
//! long enough that the perpendicular lines through its endpoints touch
//! the canvas corners: `|w·sin θ| + |h·cos θ|`.

use fgradient_scene_model::color::HexColor;
use fgradient_scene_model::gradient::GradientConfig;

/// A point in buffer pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisPoint {
    pub x: f64,
    pub y: f64,
}

/// A color at a relative position along the axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f64,
    pub color: HexColor,
}

/// The resolved gradient line plus its stops.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientAxis {
    /// CSS angle in degrees, `[0, 360)`.
    pub angle_degrees: f64,
    pub start: AxisPoint,
    pub end: AxisPoint,
    pub stops: [ColorStop; 3],
}

/// Resolve the gradient for a canvas of `width` × `height` pixels.
pub fn resolve_axis(gradient: &GradientConfig, width: f64, height: f64) -> GradientAxis {
    let stops = gradient
        .stops()
        .map(|(offset, color)| ColorStop { offset, color });
    axis_for_angle(gradient.angle_degrees() as f64, width, height, stops)
}

/// Build an axis for an arbitrary CSS angle.
pub fn axis_for_angle(
    angle_degrees: f64,
    width: f64,
    height: f64,
    stops: [ColorStop; 3],
) -> GradientAxis {
    let angle_degrees = angle_degrees.rem_euclid(360.0);
    let radians = angle_degrees.to_radians();
    let (dx, dy) = (radians.sin(), -radians.cos());
    let length = (width * dx).abs() + (height * dy).abs();

    let cx = width / 2.0;
    let cy = height / 2.0;
    let half = length / 2.0;

    GradientAxis {
        angle_degrees,
        start: AxisPoint {
            x: cx - dx * half,
            y: cy - dy * half,
        },
        end: AxisPoint {
            x: cx + dx * half,
            y: cy + dy * half,
        },
        stops,
    }
}

impl GradientAxis {
    /// Distance between start and end.
    pub fn length(&self) -> f64 {
        let (dx, dy) = (self.end.x - self.start.x, self.end.y - self.start.y);
        (dx * dx + dy * dy).sqrt()
    }

    /// Relative position of a point projected onto the axis; 0 at start,
    /// 1 at end. Not clamped.
    pub fn project(&self, x: f64, y: f64) -> f64 {
        let (ax, ay) = (self.end.x - self.start.x, self.end.y - self.start.y);
        let len_sq = ax * ax + ay * ay;
        if len_sq <= f64::EPSILON {
            return 0.0;
        }
        ((x - self.start.x) * ax + (y - self.start.y) * ay) / len_sq
    }

    /// Interpolated color at relative position `t` (clamped to `[0, 1]`).
    pub fn color_at(&self, t: f64) -> HexColor {
        let t = t.clamp(0.0, 1.0);
        let [a, b, c] = self.stops;
        if t <= a.offset {
            return a.color;
        }
        if t >= c.offset {
            return c.color;
        }
        let (lo, hi) = if t <= b.offset { (a, b) } else { (b, c) };
        let span = hi.offset - lo.offset;
        if span <= f64::EPSILON {
            return hi.color;
        }
        HexColor::lerp(lo.color, hi.color, (t - lo.offset) / span)
    }

    /// Color at a buffer pixel center.
    pub fn color_at_pixel(&self, px: u32, py: u32) -> HexColor {
        self.color_at(self.project(px as f64 + 0.5, py as f64 + 0.5))
    }
}
