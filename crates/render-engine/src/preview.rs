//! Declarative description of the live preview.
//!
//! The preview is painted by a style engine rather than by the compositor,
//! so this module emits the same layout as CSS-ish properties. Every value
//! comes from [`crate::layout`], the constants the export renderer reads.

use fgradient_scene_model::scene::Scene;
use serde::Serialize;

use crate::layout::{
    IMAGE_PADDING, WATERMARK_BOTTOM_INSET, WATERMARK_FONT_SIZE, WATERMARK_RIGHT_INSET,
    WATERMARK_TEXT,
};

/// Text shown in the canvas when nothing has been uploaded yet.
pub const EMPTY_CANVAS_HINT: &str = "Upload an image to preview";

/// Preview styling for one scene, in logical pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewStyle {
    pub background: String,
    pub width: u32,
    pub height: u32,
    pub border_radius: u32,
    /// Bounding box for the image; `None` while the canvas is empty.
    pub image_max_width: Option<u32>,
    pub image_max_height: Option<u32>,
    pub watermark_text: &'static str,
    pub watermark_right: u32,
    pub watermark_bottom: u32,
    pub watermark_font_size: u32,
    pub angle_degrees: u32,
}

impl PreviewStyle {
    pub fn for_scene(scene: &Scene) -> Self {
        let g = &scene.gradient;
        let angle_degrees = g.angle_degrees();
        let background = format!(
            "linear-gradient({angle_degrees}deg, {}, {}, {})",
            g.start_color, g.mid_color, g.end_color
        );

        let width = scene.sizing.width();
        let height = scene.sizing.height();
        let inset = (2.0 * IMAGE_PADDING) as u32;
        let (image_max_width, image_max_height) = if scene.has_image() {
            (
                Some(width.saturating_sub(inset)),
                Some(height.saturating_sub(inset)),
            )
        } else {
            (None, None)
        };

        Self {
            background,
            width,
            height,
            border_radius: scene.sizing.border_radius(),
            image_max_width,
            image_max_height,
            watermark_text: WATERMARK_TEXT,
            watermark_right: WATERMARK_RIGHT_INSET as u32,
            watermark_bottom: WATERMARK_BOTTOM_INSET as u32,
            watermark_font_size: WATERMARK_FONT_SIZE as u32,
            angle_degrees,
        }
    }

    /// Canvas declarations, one per line.
    pub fn to_css(&self) -> String {
        let mut css = format!(
            "background: {};\nwidth: {}px;\nheight: {}px;\nborder-radius: {}px;\n",
            self.background, self.width, self.height, self.border_radius
        );
        if let (Some(w), Some(h)) = (self.image_max_width, self.image_max_height) {
            css.push_str(&format!("img {{ max-width: {w}px; max-height: {h}px; }}\n"));
        }
        css.push_str(&format!(
            ".watermark {{ right: {}px; bottom: {}px; font-size: {}px; }}\n",
            self.watermark_right, self.watermark_bottom, self.watermark_font_size
        ));
        css
    }

    /// The info line shown under the preview.
    pub fn summary(&self) -> String {
        format!(
            "Canvas: {} × {}px • Gradient: {}°",
            self.width, self.height, self.angle_degrees
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fgradient_scene_model::gradient::Direction;
    use fgradient_scene_model::sizing::SizingConfig;

    #[test]
    fn test_default_scene() {
        let style = PreviewStyle::for_scene(&Scene::default());
        assert_eq!(
            style.background,
            "linear-gradient(45deg, #14b8a6, #06b6d4, #3b82f6)"
        );
        assert_eq!((style.width, style.height), (800, 600));
        assert_eq!(style.image_max_width, None);
        assert_eq!(style.summary(), "Canvas: 800 × 600px • Gradient: 45°");
    }

    #[test]
    fn test_custom_angle_in_background_and_summary() {
        let mut scene = Scene::default();
        scene.gradient.direction = Direction::Custom;
        scene.gradient.custom_degree = -30;
        let style = PreviewStyle::for_scene(&scene);
        assert!(style.background.starts_with("linear-gradient(330deg,"));
        assert!(style.summary().ends_with("Gradient: 330°"));
    }

    #[test]
    fn test_css_reflects_sizing() {
        let mut scene = Scene::default();
        scene.sizing = SizingConfig::new(300, 200, false, 12);
        let css = PreviewStyle::for_scene(&scene).to_css();
        assert!(css.contains("width: 300px;"));
        assert!(css.contains("height: 200px;"));
        assert!(css.contains("border-radius: 12px;"));
        assert!(css.contains("right: 32px; bottom: 16px;"));
        assert!(!css.contains("max-width"));
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(PreviewStyle::for_scene(&Scene::default())).unwrap();
        assert_eq!(json["borderRadius"], 0);
        assert_eq!(json["watermarkText"], "made with fgradient");
        assert!(json["imageMaxWidth"].is_null());
    }
}
