//! The render scene: one immutable snapshot of everything an export needs.

use crate::asset::ImageAsset;
use crate::gradient::GradientConfig;
use crate::sizing::SizingConfig;

/// Gradient, sizing and the optional uploaded image.
///
/// Renders take a `Scene` by value. The image bytes are shared, so the
/// clone is cheap and later edits never reach a render already in flight.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub gradient: GradientConfig,
    pub sizing: SizingConfig,
    pub image: Option<ImageAsset>,
}

impl Scene {
    pub fn new(gradient: GradientConfig, sizing: SizingConfig, image: Option<ImageAsset>) -> Self {
        Self {
            gradient,
            sizing,
            image,
        }
    }

    /// Whether an image has been uploaded.
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Aspect ratio of the uploaded image, if any.
    pub fn original_aspect_ratio(&self) -> Option<f64> {
        self.image.as_ref().map(ImageAsset::original_aspect_ratio)
    }

    /// Replace the image wholesale, auto-fitting the canvas when the
    /// aspect lock is off.
    pub fn upload(&mut self, asset: ImageAsset) {
        self.sizing
            .fit_to_upload(asset.natural_width(), asset.natural_height());
        self.image = Some(asset);
    }

    /// Set the canvas width, honoring the aspect lock.
    pub fn set_width(&mut self, width: i64) {
        let ratio = self.original_aspect_ratio();
        self.sizing.set_width(width, ratio);
    }

    /// Set the canvas height, honoring the aspect lock.
    pub fn set_height(&mut self, height: i64) {
        let ratio = self.original_aspect_ratio();
        self.sizing.set_height(height, ratio);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::UploadFormat;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn asset(width: u32, height: u32) -> ImageAsset {
        let img = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        ImageAsset::from_bytes(out.into_inner(), UploadFormat::Png).unwrap()
    }

    #[test]
    fn test_upload_fits_canvas_when_unlocked() {
        let mut scene = Scene::default();
        assert!(!scene.has_image());
        scene.upload(asset(400, 300));
        assert!(scene.has_image());
        assert_eq!(scene.sizing.width(), 400);
        assert_eq!(scene.sizing.height(), 300);
    }

    #[test]
    fn test_locked_width_follows_image_ratio() {
        let mut scene = Scene::default();
        scene.upload(asset(200, 100));
        scene.sizing.set_lock_aspect_ratio(true);
        scene.set_width(900);
        assert_eq!(scene.sizing.height(), 450);
        scene.set_height(200);
        assert_eq!(scene.sizing.width(), 400);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut scene = Scene::default();
        let snapshot = scene.clone();
        scene.set_width(1500);
        assert_eq!(snapshot.sizing.width(), 800);
    }
}
