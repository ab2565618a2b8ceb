//! Layout constants shared by the preview and the export renderer.
//!
//! All values are logical pixels and get multiplied by the export scale.

/// Padding kept clear around the image on every side.
pub const IMAGE_PADDING: f32 = 16.0;

/// Watermark label text.
pub const WATERMARK_TEXT: &str = "made with fgradient";
/// Font size of the watermark label.
pub const WATERMARK_FONT_SIZE: f32 = 12.0;
/// Height of the watermark pill.
pub const WATERMARK_HEIGHT: f32 = 24.0;
/// Horizontal padding added to the measured text width (both sides together).
pub const WATERMARK_HORIZONTAL_PADDING: f32 = 16.0;
/// Distance from the canvas right edge to the pill.
pub const WATERMARK_RIGHT_INSET: f32 = 32.0;
/// Distance from the canvas bottom edge to the pill.
pub const WATERMARK_BOTTOM_INSET: f32 = 16.0;
/// Corner radius of the pill.
pub const WATERMARK_CORNER_RADIUS: f32 = 4.0;
/// Pill background alpha (black).
pub const WATERMARK_BACKGROUND_ALPHA: u8 = 128;

/// Where and how large the uploaded image is drawn in the buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Uniform factor applied to the natural size, never above 1.
    pub scale_factor: f32,
}

impl ImagePlacement {
    /// Fit an image inside the padded buffer area, keeping its aspect ratio
    /// and never upscaling, then center it in the full buffer.
    pub fn fit(
        natural_width: u32,
        natural_height: u32,
        buffer_width: u32,
        buffer_height: u32,
        scale: f32,
    ) -> Self {
        let padding = 2.0 * IMAGE_PADDING * scale;
        let available_width = (buffer_width as f32 - padding).max(0.0);
        let available_height = (buffer_height as f32 - padding).max(0.0);

        let scale_x = available_width / natural_width.max(1) as f32;
        let scale_y = available_height / natural_height.max(1) as f32;
        let scale_factor = scale_x.min(scale_y).min(1.0);

        let width = natural_width as f32 * scale_factor;
        let height = natural_height as f32 * scale_factor;

        Self {
            x: (buffer_width as f32 - width) / 2.0,
            y: (buffer_height as f32 - height) / 2.0,
            width,
            height,
            scale_factor,
        }
    }
}

/// Buffer size in physical pixels for a logical canvas at `scale`.
pub fn buffer_size(width: u32, height: u32, scale: f32) -> (u32, u32) {
    (
        (width as f32 * scale).round().max(1.0) as u32,
        (height as f32 * scale).round().max(1.0) as u32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_size() {
        assert_eq!(buffer_size(800, 600, 2.0), (1600, 1200));
        assert_eq!(buffer_size(101, 100, 1.5), (152, 150));
        assert_eq!(buffer_size(2000, 2000, 1.0), (2000, 2000));
    }

    #[test]
    fn test_small_image_keeps_natural_size() {
        let p = ImagePlacement::fit(400, 300, 1600, 1200, 2.0);
        assert_eq!(p.scale_factor, 1.0);
        assert_eq!((p.width, p.height), (400.0, 300.0));
        assert_eq!((p.x, p.y), (600.0, 450.0));
    }

    #[test]
    fn test_large_image_fits_padded_area() {
        // 1000x1000 buffer at scale 1 leaves 968x968.
        let p = ImagePlacement::fit(2000, 1000, 1000, 1000, 1.0);
        assert!((p.scale_factor - 0.484).abs() < 1e-6);
        assert!((p.width - 968.0).abs() < 1e-3);
        assert!((p.height - 484.0).abs() < 1e-3);
        assert!((p.x - 16.0).abs() < 1e-3);
        assert!((p.y - 258.0).abs() < 1e-3);
    }

    #[test]
    fn test_padding_scales_with_buffer() {
        // 200x200 logical at scale 2: 400 - 64 = 336 available.
        let p = ImagePlacement::fit(1000, 1000, 400, 400, 2.0);
        assert!((p.width - 336.0).abs() < 1e-3);
        assert!((p.x - 32.0).abs() < 1e-3);
    }
}
