//! Canvas sizing configuration.
//!
//! All dimensions are logical pixels; the export scale is applied later.

use serde::{Deserialize, Serialize};

/// Smallest allowed canvas edge.
pub const MIN_DIMENSION: u32 = 100;
/// Largest allowed canvas edge.
pub const MAX_DIMENSION: u32 = 2000;
/// Largest allowed corner radius.
pub const MAX_BORDER_RADIUS: u32 = 100;

/// Width and height that a freshly uploaded image is fitted into when the
/// aspect lock is off.
pub const UPLOAD_FIT_WIDTH: u32 = 800;
pub const UPLOAD_FIT_HEIGHT: u32 = 600;

/// Clamp a canvas edge into `[MIN_DIMENSION, MAX_DIMENSION]`.
pub fn clamp_dimension(value: i64) -> u32 {
    value.clamp(MIN_DIMENSION as i64, MAX_DIMENSION as i64) as u32
}

/// Clamp a corner radius into `[0, MAX_BORDER_RADIUS]`.
pub fn clamp_border_radius(value: i64) -> u32 {
    value.clamp(0, MAX_BORDER_RADIUS as i64) as u32
}

/// Canvas dimensions, aspect lock and corner radius.
///
/// Fields are private so the clamping invariant cannot be bypassed; use
/// [`SizingConfig::new`] or the setters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawSizing")]
pub struct SizingConfig {
    width: u32,
    height: u32,
    lock_aspect_ratio: bool,
    border_radius: u32,
}

/// Unchecked wire form, clamped on the way in.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawSizing {
    width: i64,
    height: i64,
    lock_aspect_ratio: bool,
    border_radius: i64,
}

impl Default for RawSizing {
    fn default() -> Self {
        let d = SizingConfig::default();
        Self {
            width: d.width as i64,
            height: d.height as i64,
            lock_aspect_ratio: d.lock_aspect_ratio,
            border_radius: d.border_radius as i64,
        }
    }
}

impl From<RawSizing> for SizingConfig {
    fn from(raw: RawSizing) -> Self {
        SizingConfig::new(
            raw.width,
            raw.height,
            raw.lock_aspect_ratio,
            raw.border_radius,
        )
    }
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            lock_aspect_ratio: false,
            border_radius: 0,
        }
    }
}

/// A usable aspect ratio, or `None` when unknown or degenerate.
fn usable_ratio(ratio: Option<f64>) -> Option<f64> {
    ratio.filter(|r| r.is_finite() && *r > 0.0)
}

impl SizingConfig {
    /// Create a sizing config, clamping every field.
    pub fn new(width: i64, height: i64, lock_aspect_ratio: bool, border_radius: i64) -> Self {
        Self {
            width: clamp_dimension(width),
            height: clamp_dimension(height),
            lock_aspect_ratio,
            border_radius: clamp_border_radius(border_radius),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn lock_aspect_ratio(&self) -> bool {
        self.lock_aspect_ratio
    }

    pub fn border_radius(&self) -> u32 {
        self.border_radius
    }

    /// Current width / height.
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Set the width. With the lock on and a known image ratio, the height
    /// follows.
    pub fn set_width(&mut self, width: i64, original_aspect_ratio: Option<f64>) {
        self.width = clamp_dimension(width);
        if self.lock_aspect_ratio {
            if let Some(ratio) = usable_ratio(original_aspect_ratio) {
                self.height = clamp_dimension((self.width as f64 / ratio).round() as i64);
            }
        }
    }

    /// Set the height. With the lock on and a known image ratio, the width
    /// follows.
    pub fn set_height(&mut self, height: i64, original_aspect_ratio: Option<f64>) {
        self.height = clamp_dimension(height);
        if self.lock_aspect_ratio {
            if let Some(ratio) = usable_ratio(original_aspect_ratio) {
                self.width = clamp_dimension((self.height as f64 * ratio).round() as i64);
            }
        }
    }

    pub fn set_lock_aspect_ratio(&mut self, locked: bool) {
        self.lock_aspect_ratio = locked;
    }

    pub fn set_border_radius(&mut self, radius: i64) {
        self.border_radius = clamp_border_radius(radius);
    }

    /// Fit the canvas to a newly uploaded image. Only applies while the
    /// aspect lock is off.
    pub fn fit_to_upload(&mut self, natural_width: u32, natural_height: u32) {
        if self.lock_aspect_ratio {
            return;
        }
        self.width = clamp_dimension(natural_width.min(UPLOAD_FIT_WIDTH) as i64);
        self.height = clamp_dimension(natural_height.min(UPLOAD_FIT_HEIGHT) as i64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_clamps() {
        let s = SizingConfig::new(50, 5000, false, 250);
        assert_eq!(s.width(), 100);
        assert_eq!(s.height(), 2000);
        assert_eq!(s.border_radius(), 100);

        let s = SizingConfig::new(800, 600, true, -4);
        assert_eq!(s.border_radius(), 0);
    }

    #[test]
    fn test_locked_width_drives_height() {
        let mut s = SizingConfig::new(800, 600, true, 0);
        s.set_width(1000, Some(4.0 / 3.0));
        assert_eq!(s.width(), 1000);
        assert_eq!(s.height(), 750);
    }

    #[test]
    fn test_locked_height_drives_width() {
        let mut s = SizingConfig::new(800, 600, true, 0);
        s.set_height(300, Some(16.0 / 9.0));
        assert_eq!(s.height(), 300);
        assert_eq!(s.width(), 533);
    }

    #[test]
    fn test_locked_follower_is_clamped() {
        let mut s = SizingConfig::new(800, 600, true, 0);
        s.set_width(2000, Some(0.5));
        assert_eq!(s.height(), 2000);
        s.set_height(100, Some(0.1));
        assert_eq!(s.width(), 100);
    }

    #[test]
    fn test_unlocked_or_unknown_ratio_leaves_other_edge() {
        let mut s = SizingConfig::new(800, 600, false, 0);
        s.set_width(1200, Some(2.0));
        assert_eq!(s.height(), 600);

        s.set_lock_aspect_ratio(true);
        s.set_width(900, None);
        assert_eq!(s.height(), 600);
        s.set_width(900, Some(0.0));
        assert_eq!(s.height(), 600);
        s.set_width(900, Some(f64::INFINITY));
        assert_eq!(s.height(), 600);
    }

    #[test]
    fn test_fit_to_upload() {
        let mut s = SizingConfig::default();
        s.fit_to_upload(400, 300);
        assert_eq!((s.width(), s.height()), (400, 300));

        s.fit_to_upload(4000, 3000);
        assert_eq!((s.width(), s.height()), (800, 600));

        s.fit_to_upload(40, 30);
        assert_eq!((s.width(), s.height()), (100, 100));

        s.set_lock_aspect_ratio(true);
        s.fit_to_upload(400, 300);
        assert_eq!((s.width(), s.height()), (100, 100));
    }

    #[test]
    fn test_deserialize_clamps_and_defaults() {
        let s: SizingConfig =
            serde_json::from_str(r#"{"width":99999,"height":-3,"borderRadius":40}"#).unwrap();
        assert_eq!(s.width(), 2000);
        assert_eq!(s.height(), 100);
        assert!(!s.lock_aspect_ratio());
        assert_eq!(s.border_radius(), 40);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(SizingConfig::new(640, 480, true, 12)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "width": 640,
                "height": 480,
                "lockAspectRatio": true,
                "borderRadius": 12
            })
        );
    }

    proptest! {
        #[test]
        fn prop_setters_keep_invariants(
            w in -10_000i64..10_000,
            h in -10_000i64..10_000,
            r in -500i64..500,
            ratio in 0.01f64..100.0,
            locked in any::<bool>(),
        ) {
            let mut s = SizingConfig::new(w, h, locked, r);
            s.set_width(w, Some(ratio));
            s.set_height(h, Some(ratio));
            s.set_border_radius(r);
            prop_assert!((MIN_DIMENSION..=MAX_DIMENSION).contains(&s.width()));
            prop_assert!((MIN_DIMENSION..=MAX_DIMENSION).contains(&s.height()));
            prop_assert!(s.border_radius() <= MAX_BORDER_RADIUS);
        }
    }
}
