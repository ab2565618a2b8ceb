//! Raster compositor: paints one scene onto an offscreen pixmap.
//!
//! Layers are painted in a fixed order, each over the previous one:
//! clip, gradient, image, watermark. The clip is a mask rather than a
//! painted shape, so corners outside it stay fully transparent.

use fgradient_common::error::{FgradientError, FgradientResult};
use fgradient_scene_model::color::HexColor;
use image::RgbaImage;
use tiny_skia::{
    BlendMode, Color, FillRule, FilterQuality, GradientStop, LinearGradient, Mask, Paint, Path,
    PathBuilder, Pixmap, PixmapPaint, Point, Rect, SpreadMode, Transform,
};

use crate::geometry::GradientAxis;
use crate::layout::ImagePlacement;
use crate::watermark::{draw_watermark, label_font, WatermarkLayout};

/// Circle approximation constant for cubic Bézier quarter arcs.
const KAPPA: f32 = 0.552_284_8;

/// Everything one compositing pass reads. Borrowed, never mutated.
#[derive(Debug, Clone, Copy)]
pub struct CompositeInput<'a> {
    pub axis: &'a GradientAxis,
    pub image: Option<&'a RgbaImage>,
    /// Corner radius in logical pixels.
    pub border_radius: u32,
    pub scale: f32,
}

/// Build a rounded rectangle path. The radius is clamped to half the
/// shorter side; a radius of zero yields a plain rectangle.
pub fn rounded_rect_path(x: f32, y: f32, width: f32, height: f32, radius: f32) -> Option<Path> {
    let rect = Rect::from_xywh(x, y, width, height)?;
    let r = radius.max(0.0).min(width / 2.0).min(height / 2.0);
    if r <= 0.0 {
        return Some(PathBuilder::from_rect(rect));
    }

    let (left, top, right, bottom) = (rect.left(), rect.top(), rect.right(), rect.bottom());
    let k = r * KAPPA;

    let mut pb = PathBuilder::new();
    pb.move_to(left + r, top);
    pb.line_to(right - r, top);
    pb.cubic_to(right - r + k, top, right, top + r - k, right, top + r);
    pb.line_to(right, bottom - r);
    pb.cubic_to(right, bottom - r + k, right - r + k, bottom, right - r, bottom);
    pb.line_to(left + r, bottom);
    pb.cubic_to(left + r - k, bottom, left, bottom - r + k, left, bottom - r);
    pb.line_to(left, top + r);
    pb.cubic_to(left, top + r - k, left + r - k, top, left + r, top);
    pb.close();
    pb.finish()
}

/// Anti-aliased rounded-rect mask covering the whole buffer, or `None`
/// when no clipping applies.
fn clip_mask(width: u32, height: u32, radius: f32) -> FgradientResult<Option<Mask>> {
    if radius <= 0.0 {
        return Ok(None);
    }
    let mut mask = Mask::new(width, height)
        .ok_or_else(|| FgradientError::render("Failed to allocate clip mask"))?;
    let path = rounded_rect_path(0.0, 0.0, width as f32, height as f32, radius)
        .ok_or_else(|| FgradientError::render("Invalid clip bounds"))?;
    mask.fill_path(&path, FillRule::Winding, true, Transform::identity());
    Ok(Some(mask))
}

fn skia_color(color: HexColor) -> Color {
    Color::from_rgba8(color.r, color.g, color.b, color.a)
}

fn fill_gradient(
    pixmap: &mut Pixmap,
    axis: &GradientAxis,
    clip: Option<&Mask>,
) -> FgradientResult<()> {
    let stops = axis
        .stops
        .iter()
        .map(|stop| GradientStop::new(stop.offset as f32, skia_color(stop.color)))
        .collect::<Vec<_>>();

    let shader = LinearGradient::new(
        Point::from_xy(axis.start.x as f32, axis.start.y as f32),
        Point::from_xy(axis.end.x as f32, axis.end.y as f32),
        stops,
        SpreadMode::Pad,
        Transform::identity(),
    )
    .ok_or_else(|| FgradientError::render("Failed to create gradient shader"))?;

    let mut paint = Paint::default();
    paint.shader = shader;
    paint.anti_alias = false;

    let rect = Rect::from_xywh(0.0, 0.0, pixmap.width() as f32, pixmap.height() as f32)
        .ok_or_else(|| FgradientError::render("Invalid gradient bounds"))?;
    pixmap.fill_rect(rect, &paint, Transform::identity(), clip);
    Ok(())
}

/// Convert straight-alpha RGBA into a premultiplied pixmap.
fn image_pixmap(image: &RgbaImage) -> FgradientResult<Pixmap> {
    let (width, height) = image.dimensions();
    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| FgradientError::render("Failed to allocate image pixmap"))?;

    for (dst, src) in pixmap
        .data_mut()
        .chunks_exact_mut(4)
        .zip(image.as_raw().chunks_exact(4))
    {
        let alpha = src[3] as u16;
        dst[0] = ((src[0] as u16 * alpha + 127) / 255) as u8;
        dst[1] = ((src[1] as u16 * alpha + 127) / 255) as u8;
        dst[2] = ((src[2] as u16 * alpha + 127) / 255) as u8;
        dst[3] = src[3];
    }
    Ok(pixmap)
}

fn draw_image(
    pixmap: &mut Pixmap,
    image: &RgbaImage,
    scale: f32,
    clip: Option<&Mask>,
) -> FgradientResult<ImagePlacement> {
    let placement = ImagePlacement::fit(
        image.width(),
        image.height(),
        pixmap.width(),
        pixmap.height(),
        scale,
    );
    let source = image_pixmap(image)?;

    let mut paint = PixmapPaint::default();
    paint.blend_mode = BlendMode::SourceOver;
    paint.quality = if placement.scale_factor < 1.0 {
        FilterQuality::Bicubic
    } else {
        FilterQuality::Nearest
    };

    let transform = Transform::from_row(
        placement.scale_factor,
        0.0,
        0.0,
        placement.scale_factor,
        placement.x,
        placement.y,
    );
    pixmap.draw_pixmap(0, 0, source.as_ref(), &paint, transform, clip);
    Ok(placement)
}

/// Paint a full scene onto `pixmap`.
///
/// The pixmap must already have the export size. It is expected to start
/// transparent; nothing outside the clip is touched.
pub fn composite(pixmap: &mut Pixmap, input: CompositeInput<'_>) -> FgradientResult<()> {
    let (width, height) = (pixmap.width(), pixmap.height());
    let radius = input.border_radius as f32 * input.scale;

    let mask = clip_mask(width, height, radius)?;
    let clip = mask.as_ref();

    fill_gradient(pixmap, input.axis, clip)?;

    if let Some(image) = input.image {
        let placement = draw_image(pixmap, image, input.scale, clip)?;
        tracing::debug!(
            x = placement.x,
            y = placement.y,
            width = placement.width,
            height = placement.height,
            scale_factor = placement.scale_factor,
            "Placed image"
        );
    }

    let font = label_font()?;
    let watermark = WatermarkLayout::compute(font, width, height, input.scale);
    draw_watermark(pixmap, font, &watermark, clip);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::resolve_axis;
    use fgradient_scene_model::gradient::{Direction, GradientConfig};
    use image::Rgba;

    fn red_blue_horizontal() -> GradientConfig {
        GradientConfig {
            start_color: HexColor::rgb(255, 0, 0),
            mid_color: HexColor::rgb(0, 255, 0),
            end_color: HexColor::rgb(0, 0, 255),
            direction: Direction::Horizontal,
            custom_degree: 0,
        }
    }

    fn render(width: u32, height: u32, radius: u32, image: Option<&RgbaImage>) -> Pixmap {
        let mut pixmap = Pixmap::new(width, height).unwrap();
        let axis = resolve_axis(&red_blue_horizontal(), width as f64, height as f64);
        composite(
            &mut pixmap,
            CompositeInput {
                axis: &axis,
                image,
                border_radius: radius,
                scale: 1.0,
            },
        )
        .unwrap();
        pixmap
    }

    #[test]
    fn test_rounded_rect_zero_radius_is_rect() {
        let path = rounded_rect_path(0.0, 0.0, 10.0, 20.0, 0.0).unwrap();
        let bounds = path.bounds();
        assert_eq!((bounds.width(), bounds.height()), (10.0, 20.0));
    }

    #[test]
    fn test_rounded_rect_radius_clamped() {
        let path = rounded_rect_path(0.0, 0.0, 10.0, 20.0, 50.0).unwrap();
        let bounds = path.bounds();
        assert!((bounds.width() - 10.0).abs() < 1e-4);
        assert!((bounds.height() - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_zero_radius_is_fully_opaque() {
        let pixmap = render(200, 120, 0, None);
        assert!(pixmap.pixels().iter().all(|p| p.alpha() == 255));
    }

    #[test]
    fn test_radius_clears_corners() {
        let pixmap = render(200, 120, 30, None);
        for (x, y) in [(0, 0), (199, 0), (0, 119), (199, 119), (5, 5)] {
            assert_eq!(pixmap.pixel(x, y).unwrap().alpha(), 0, "corner ({x}, {y})");
        }
        assert_eq!(pixmap.pixel(100, 60).unwrap().alpha(), 255);
        assert_eq!(pixmap.pixel(100, 0).unwrap().alpha(), 255);
    }

    #[test]
    fn test_gradient_stops_on_pixels() {
        let pixmap = render(400, 200, 0, None);
        let left = pixmap.pixel(0, 20).unwrap();
        let mid = pixmap.pixel(200, 20).unwrap();
        let right = pixmap.pixel(399, 20).unwrap();
        assert!(left.red() > 250 && left.green() < 5);
        assert!(mid.green() > 245 && mid.red() < 10 && mid.blue() < 10);
        assert!(right.blue() > 250 && right.green() < 5);
    }

    #[test]
    fn test_small_image_drawn_at_natural_size() {
        let image = RgbaImage::from_pixel(40, 30, Rgba([255, 255, 0, 255]));
        let pixmap = render(200, 150, 0, Some(&image));
        // image occupies [80, 120) x [60, 90)
        let inside = pixmap.pixel(80, 60).unwrap();
        assert_eq!((inside.red(), inside.green(), inside.blue()), (255, 255, 0));
        let inside = pixmap.pixel(119, 89).unwrap();
        assert_eq!((inside.red(), inside.green(), inside.blue()), (255, 255, 0));
        let outside = pixmap.pixel(120, 75).unwrap();
        assert_ne!((outside.red(), outside.green(), outside.blue()), (255, 255, 0));
        let outside = pixmap.pixel(100, 59).unwrap();
        assert_ne!((outside.red(), outside.green(), outside.blue()), (255, 255, 0));
    }

    #[test]
    fn test_translucent_image_blends_over_gradient() {
        let image = RgbaImage::from_pixel(20, 20, Rgba([0, 0, 0, 0]));
        let with_image = render(200, 150, 0, Some(&image));
        let without = render(200, 150, 0, None);
        assert_eq!(with_image.pixel(100, 75), without.pixel(100, 75));
    }
}
