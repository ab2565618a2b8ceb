//! Watermark label: layout, text measurement and rasterization.
//!
//! The label is set in a bundled DejaVu Sans face, so the export looks the
//! same whatever fonts the host has installed. Measurement and drawing go
//! through the same `fontdue` layout, which keeps the pill width and the
//! drawn glyphs in agreement.

use std::sync::OnceLock;

use fgradient_common::error::{FgradientError, FgradientResult};
use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};
use fontdue::{Font, FontSettings};
use tiny_skia::{Color, FillRule, Mask, Paint, Pixmap, PixmapPaint, Transform};

use crate::compositor::rounded_rect_path;
use crate::layout::{
    WATERMARK_BACKGROUND_ALPHA, WATERMARK_BOTTOM_INSET, WATERMARK_CORNER_RADIUS,
    WATERMARK_FONT_SIZE, WATERMARK_HEIGHT, WATERMARK_HORIZONTAL_PADDING, WATERMARK_RIGHT_INSET,
    WATERMARK_TEXT,
};

const LABEL_FONT_BYTES: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");

static LABEL_FONT: OnceLock<Result<Font, &'static str>> = OnceLock::new();

/// The watermark face, parsed once per process.
pub fn label_font() -> FgradientResult<&'static Font> {
    LABEL_FONT
        .get_or_init(|| Font::from_bytes(LABEL_FONT_BYTES, FontSettings::default()))
        .as_ref()
        .map_err(|e| FgradientError::render(format!("Failed to load watermark font: {e}")))
}

/// Extent of a single line of text, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub width: f32,
    pub height: f32,
}

fn lay_out(font: &Font, text: &str, size: f32) -> Layout<()> {
    let mut layout = Layout::new(CoordinateSystem::PositiveYDown);
    layout.reset(&LayoutSettings::default());
    layout.append(&[font], &TextStyle::new(text, size, 0));
    layout
}

/// Measure `text` at `size` pixels.
///
/// Width is the pen position after the last glyph, so trailing advance is
/// included the way a browser measures inline text.
pub fn measure_text(font: &Font, text: &str, size: f32) -> TextMetrics {
    let layout = lay_out(font, text, size);
    let width = layout
        .glyphs()
        .iter()
        .map(|g| {
            let m = font.metrics_indexed(g.key.glyph_index, size);
            (g.x - m.xmin as f32 + m.advance_width).max(0.0)
        })
        .fold(0.0f32, f32::max);
    TextMetrics {
        width,
        height: layout.height(),
    }
}

/// Render `text` as premultiplied white coverage on a transparent pixmap
/// whose origin is the layout origin. `None` when nothing is visible.
fn rasterize_label(font: &Font, text: &str, size: f32) -> Option<Pixmap> {
    let layout = lay_out(font, text, size);
    let glyphs = layout.glyphs();

    let width = glyphs
        .iter()
        .map(|g| g.x.round() as i32 + g.width as i32)
        .max()?
        .max(1);
    let height = glyphs
        .iter()
        .map(|g| g.y.round() as i32 + g.height as i32)
        .max()?
        .max(layout.height().ceil() as i32)
        .max(1);

    let mut label = Pixmap::new(width as u32, height as u32)?;
    let stride = width as usize;
    let data = label.data_mut();

    for g in glyphs {
        if g.width == 0 || g.height == 0 {
            continue;
        }
        let (_, coverage) = font.rasterize_config(g.key);
        let (ox, oy) = (g.x.round() as i32, g.y.round() as i32);
        for row in 0..g.height {
            for col in 0..g.width {
                let (x, y) = (ox + col as i32, oy + row as i32);
                if x < 0 || y < 0 || x >= width || y >= height {
                    continue;
                }
                let alpha = coverage[row * g.width + col];
                let i = (y as usize * stride + x as usize) * 4;
                // premultiplied white: every channel equals alpha
                let v = data[i + 3].max(alpha);
                data[i..i + 4].fill(v);
            }
        }
    }
    Some(label)
}

/// Resolved watermark geometry for one buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatermarkLayout {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub corner_radius: f32,
    pub font_size: f32,
    pub text: TextMetrics,
}

impl WatermarkLayout {
    /// Anchor the pill near the bottom-right corner of the buffer.
    pub fn compute(font: &Font, buffer_width: u32, buffer_height: u32, scale: f32) -> Self {
        let font_size = WATERMARK_FONT_SIZE * scale;
        let text = measure_text(font, WATERMARK_TEXT, font_size);
        let width = text.width + WATERMARK_HORIZONTAL_PADDING * scale;
        let height = WATERMARK_HEIGHT * scale;

        Self {
            x: buffer_width as f32 - width - WATERMARK_RIGHT_INSET * scale,
            y: buffer_height as f32 - height - WATERMARK_BOTTOM_INSET * scale,
            width,
            height,
            corner_radius: WATERMARK_CORNER_RADIUS * scale,
            font_size,
            text,
        }
    }

    /// Center of the pill.
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Top-left of the text line box, centered in the pill.
    pub fn text_origin(&self) -> (f32, f32) {
        let (cx, cy) = self.center();
        (cx - self.text.width / 2.0, cy - self.text.height / 2.0)
    }
}

/// Draw the watermark pill and its label, confined to `clip` if given.
pub fn draw_watermark(
    pixmap: &mut Pixmap,
    font: &Font,
    layout: &WatermarkLayout,
    clip: Option<&Mask>,
) {
    let mut background = Paint::default();
    background.set_color(Color::from_rgba8(0, 0, 0, WATERMARK_BACKGROUND_ALPHA));
    background.anti_alias = true;

    let Some(pill) = rounded_rect_path(
        layout.x,
        layout.y,
        layout.width,
        layout.height,
        layout.corner_radius,
    ) else {
        tracing::debug!(?layout, "Watermark pill has no area, skipping");
        return;
    };
    pixmap.fill_path(
        &pill,
        &background,
        FillRule::Winding,
        Transform::identity(),
        clip,
    );

    let Some(label) = rasterize_label(font, WATERMARK_TEXT, layout.font_size) else {
        tracing::debug!(font_size = layout.font_size, "Watermark label is empty");
        return;
    };
    let (text_x, text_y) = layout.text_origin();
    pixmap.draw_pixmap(
        text_x.round() as i32,
        text_y.round() as i32,
        label.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        clip,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font() -> &'static Font {
        label_font().unwrap()
    }

    #[test]
    fn test_font_covers_label() {
        for c in WATERMARK_TEXT.chars().filter(|c| !c.is_whitespace()) {
            assert_ne!(font().lookup_glyph_index(c), 0, "missing glyph for {c:?}");
        }
    }

    #[test]
    fn test_measure_text() {
        assert_eq!(measure_text(font(), "", 12.0).width, 0.0);

        let at_12 = measure_text(font(), WATERMARK_TEXT, 12.0);
        assert!(
            (80.0..160.0).contains(&at_12.width),
            "label width {}",
            at_12.width
        );
        assert!(at_12.height >= 12.0);

        // wider text measures wider, and size scales roughly linearly
        assert!(measure_text(font(), "mm", 12.0).width > measure_text(font(), "m", 12.0).width);
        let at_24 = measure_text(font(), WATERMARK_TEXT, 24.0);
        assert!((at_24.width - 2.0 * at_12.width).abs() < 4.0);
    }

    #[test]
    fn test_rasterized_label_matches_measurement() {
        let metrics = measure_text(font(), WATERMARK_TEXT, 24.0);
        let label = rasterize_label(font(), WATERMARK_TEXT, 24.0).unwrap();
        assert!(label.width() as f32 <= metrics.width.ceil() + 1.0);
        assert!(label.width() as f32 >= metrics.width - 4.0);
    }

    #[test]
    fn test_layout_at_scale_two() {
        let layout = WatermarkLayout::compute(font(), 1600, 1200, 2.0);
        let text_width = measure_text(font(), WATERMARK_TEXT, 24.0).width;
        assert_eq!(layout.font_size, 24.0);
        assert_eq!(layout.height, 48.0);
        assert_eq!(layout.width, text_width + 32.0);
        assert_eq!(layout.x, 1600.0 - layout.width - 64.0);
        assert_eq!(layout.y, 1200.0 - 48.0 - 32.0);
        assert_eq!(layout.corner_radius, 8.0);
    }

    #[test]
    fn test_text_is_centered_in_pill() {
        let layout = WatermarkLayout::compute(font(), 800, 600, 1.0);
        let (tx, ty) = layout.text_origin();
        let left_gap = tx - layout.x;
        let right_gap = layout.x + layout.width - (tx + layout.text.width);
        assert!((left_gap - right_gap).abs() < 1e-3);
        assert!((left_gap - 8.0).abs() < 1e-3);
        let top_gap = ty - layout.y;
        let bottom_gap = layout.y + layout.height - (ty + layout.text.height);
        assert!((top_gap - bottom_gap).abs() < 1e-3);
    }

    #[test]
    fn test_draw_marks_pill_region() {
        let mut pixmap = Pixmap::new(400, 200).unwrap();
        pixmap.fill(Color::WHITE);
        let layout = WatermarkLayout::compute(font(), 400, 200, 1.0);
        draw_watermark(&mut pixmap, font(), &layout, None);

        // inside the left padding of the pill: half-black over white
        let px = pixmap
            .pixel((layout.x + 3.0) as u32, (layout.y + layout.height / 2.0) as u32)
            .unwrap();
        assert!((120..=135).contains(&px.red()), "got {}", px.red());
        assert_eq!(px.alpha(), 255);

        // outside the pill stays white
        let outside = pixmap.pixel(5, 5).unwrap();
        assert_eq!(outside.red(), 255);
    }

    #[test]
    fn test_label_glyphs_are_drawn_in_white() {
        let mut pixmap = Pixmap::new(400, 200).unwrap();
        pixmap.fill(Color::BLACK);
        let layout = WatermarkLayout::compute(font(), 400, 200, 2.0);
        draw_watermark(&mut pixmap, font(), &layout, None);

        let mut lit = 0;
        for y in layout.y as u32..(layout.y + layout.height) as u32 {
            for x in layout.x as u32..(layout.x + layout.width) as u32 {
                if pixmap.pixel(x, y).unwrap().red() > 200 {
                    lit += 1;
                }
            }
        }
        assert!(lit > 100, "only {lit} text pixels");

        // nothing lit outside the pill
        assert_eq!(pixmap.pixel(10, 10).unwrap().red(), 0);
    }
}
