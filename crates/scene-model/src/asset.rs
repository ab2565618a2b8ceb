//! Uploaded image asset and upload acceptance policy.

use std::fmt;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use fgradient_common::error::{FgradientError, FgradientResult};
use image::{ImageFormat, ImageReader, RgbaImage};

/// Image types the uploader accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadFormat {
    Jpeg,
    Png,
    WebP,
}

impl UploadFormat {
    /// Match a MIME type. Anything outside JPEG/PNG/WebP is `None`.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Match a file extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Jpeg => Some(Self::Jpeg),
            ImageFormat::Png => Some(Self::Png),
            ImageFormat::WebP => Some(Self::WebP),
            _ => None,
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
            Self::WebP => ImageFormat::WebP,
        }
    }
}

/// Best-effort MIME type for a file, from its extension.
pub fn mime_for_path(path: &Path) -> String {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg".to_string(),
        "png" => "image/png".to_string(),
        "webp" => "image/webp".to_string(),
        "gif" => "image/gif".to_string(),
        "bmp" => "image/bmp".to_string(),
        "svg" => "image/svg+xml".to_string(),
        "" => "application/octet-stream".to_string(),
        other => format!("application/x-{other}"),
    }
}

/// An uploaded image.
///
/// Holds the encoded bytes and the dimensions read from the header.
/// Pixels are decoded per render, so a corrupt body surfaces as a render
/// failure rather than at upload time. Cloning is cheap; the bytes are
/// shared and never mutated.
#[derive(Clone)]
pub struct ImageAsset {
    bytes: Arc<[u8]>,
    format: UploadFormat,
    natural_width: u32,
    natural_height: u32,
}

impl fmt::Debug for ImageAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageAsset")
            .field("format", &self.format)
            .field("natural_width", &self.natural_width)
            .field("natural_height", &self.natural_height)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl ImageAsset {
    /// Accept an upload declared as `mime`.
    ///
    /// Returns `Ok(None)` for types the uploader ignores: a non-image MIME
    /// type, or content that sniffs as an image type outside JPEG/PNG/WebP.
    /// A supported type whose header cannot be read is a decode error.
    pub fn accept(mime: &str, bytes: impl Into<Arc<[u8]>>) -> FgradientResult<Option<Self>> {
        let Some(declared) = UploadFormat::from_mime(mime) else {
            tracing::debug!(mime, "Ignoring upload with unsupported type");
            return Ok(None);
        };
        let bytes: Arc<[u8]> = bytes.into();

        let format = match image::guess_format(&bytes) {
            Ok(sniffed) => match UploadFormat::from_image_format(sniffed) {
                Some(format) => format,
                None => {
                    tracing::debug!(mime, sniffed = ?sniffed, "Ignoring upload whose content is not JPEG/PNG/WebP");
                    return Ok(None);
                }
            },
            Err(_) => declared,
        };

        Self::from_bytes(bytes, format).map(Some)
    }

    /// Read an upload from disk, inferring its type from the extension.
    pub fn accept_path(path: &Path) -> FgradientResult<Option<Self>> {
        if !path.exists() {
            return Err(FgradientError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let mime = mime_for_path(path);
        if UploadFormat::from_mime(&mime).is_none() {
            tracing::debug!(path = %path.display(), mime, "Ignoring upload with unsupported type");
            return Ok(None);
        }
        let bytes = std::fs::read(path)?;
        Self::accept(&mime, bytes)
    }

    /// Build an asset from bytes of a known format, reading dimensions from
    /// the header.
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>, format: UploadFormat) -> FgradientResult<Self> {
        let bytes: Arc<[u8]> = bytes.into();
        let (natural_width, natural_height) =
            ImageReader::with_format(Cursor::new(&bytes[..]), format.image_format())
                .into_dimensions()
                .map_err(|e| FgradientError::decode(format!("Failed to read image header: {e}")))?;

        if natural_width == 0 || natural_height == 0 {
            return Err(FgradientError::decode("Image has zero width or height"));
        }

        tracing::debug!(
            format = format.mime(),
            natural_width,
            natural_height,
            "Accepted image upload"
        );

        Ok(Self {
            bytes,
            format,
            natural_width,
            natural_height,
        })
    }

    pub fn format(&self) -> UploadFormat {
        self.format
    }

    pub fn natural_width(&self) -> u32 {
        self.natural_width
    }

    pub fn natural_height(&self) -> u32 {
        self.natural_height
    }

    /// `natural_width / natural_height`.
    pub fn original_aspect_ratio(&self) -> f64 {
        self.natural_width as f64 / self.natural_height as f64
    }

    /// Encoded size in bytes.
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// Decode the full image into straight-alpha RGBA8.
    pub fn decode(&self) -> FgradientResult<RgbaImage> {
        let decoded = image::load_from_memory_with_format(&self.bytes, self.format.image_format())
            .map_err(|e| FgradientError::decode(format!("Failed to decode image: {e}")))?;
        let rgba = decoded.to_rgba8();
        if rgba.dimensions() != (self.natural_width, self.natural_height) {
            return Err(FgradientError::decode(format!(
                "Decoded size {}x{} does not match header {}x{}",
                rgba.width(),
                rgba.height(),
                self.natural_width,
                self.natural_height
            )));
        }
        Ok(rgba)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 10, 10, 255]));
        encode_png(&img)
    }

    fn noisy_png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 7) as u8, (y * 13) as u8, ((x * y) % 251) as u8, 255])
        });
        encode_png(&img)
    }

    fn encode_png(img: &RgbaImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_mime_acceptance() {
        assert_eq!(UploadFormat::from_mime("image/png"), Some(UploadFormat::Png));
        assert_eq!(UploadFormat::from_mime("IMAGE/JPEG"), Some(UploadFormat::Jpeg));
        assert_eq!(UploadFormat::from_mime("image/webp"), Some(UploadFormat::WebP));
        assert_eq!(UploadFormat::from_mime("image/gif"), None);
        assert_eq!(UploadFormat::from_mime("text/plain"), None);
    }

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("a/b.JPG")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("x.webp")), "image/webp");
        assert_eq!(mime_for_path(Path::new("x.gif")), "image/gif");
        assert_eq!(mime_for_path(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn test_accept_png_reads_dimensions() {
        let asset = ImageAsset::accept("image/png", png_bytes(40, 20))
            .unwrap()
            .unwrap();
        assert_eq!(asset.natural_width(), 40);
        assert_eq!(asset.natural_height(), 20);
        assert!((asset.original_aspect_ratio() - 2.0).abs() < 1e-9);
        assert_eq!(asset.format(), UploadFormat::Png);
    }

    #[test]
    fn test_unsupported_mime_is_silently_ignored() {
        let result = ImageAsset::accept("image/gif", png_bytes(4, 4)).unwrap();
        assert!(result.is_none());
        let result = ImageAsset::accept("application/pdf", vec![1, 2, 3]).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_sniffed_gif_is_ignored() {
        let gif_header = b"GIF89a\x01\x00\x01\x00\x00\x00\x00".to_vec();
        let result = ImageAsset::accept("image/png", gif_header).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_garbage_with_supported_mime_is_decode_error() {
        let err = ImageAsset::accept("image/png", vec![0u8; 16]).unwrap_err();
        assert!(matches!(err, FgradientError::Decode { .. }));
    }

    #[test]
    fn test_truncated_body_fails_at_decode() {
        let mut bytes = noisy_png_bytes(64, 64);
        // header survives, pixel data is cut short
        bytes.truncate(bytes.len() / 2);
        let asset = ImageAsset::accept("image/png", bytes).unwrap().unwrap();
        assert_eq!(asset.natural_width(), 64);
        assert!(matches!(
            asset.decode().unwrap_err(),
            FgradientError::Decode { .. }
        ));
    }

    #[test]
    fn test_decode_round_trip() {
        let asset = ImageAsset::accept("image/png", png_bytes(3, 2))
            .unwrap()
            .unwrap();
        let rgba = asset.decode().unwrap();
        assert_eq!(rgba.dimensions(), (3, 2));
        assert_eq!(rgba.get_pixel(1, 1), &Rgba([200, 10, 10, 255]));
    }
}
