//! Export pipeline: scene snapshot → pixmap → PNG → file or clipboard.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use fgradient_common::clock::{download_file_name, unix_timestamp_ms};
use fgradient_common::config::{resolve_scale, AppConfig};
use fgradient_common::error::{FgradientError, FgradientResult};
use fgradient_scene_model::asset::ImageAsset;
use fgradient_scene_model::scene::Scene;
use image::RgbaImage;
use tiny_skia::Pixmap;

use crate::compositor::{composite, CompositeInput};
use crate::geometry::resolve_axis;
use crate::layout::buffer_size;

/// Stages of one export request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    Preparing,
    Decoding,
    Rendering,
    Encoding,
    Writing,
    Complete,
    Failed,
}

/// Stage callback for export progress reporting.
pub type StageCallback = Box<dyn Fn(ExportStage) + Send + Sync>;

/// Whether the export controls are usable for a scene.
///
/// Exports are gated on an uploaded image. This is a host policy: the
/// compositor itself renders gradient-only scenes fine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportControls {
    Enabled,
    Disabled,
}

impl ExportControls {
    pub fn for_scene(scene: &Scene) -> Self {
        if scene.has_image() {
            Self::Enabled
        } else {
            Self::Disabled
        }
    }

    pub fn is_enabled(self) -> bool {
        self == Self::Enabled
    }
}

/// Result of a gated export action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome<T> {
    /// The export ran.
    Completed(T),
    /// The controls were disabled; nothing was rendered.
    Disabled,
}

impl<T> ExportOutcome<T> {
    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }

    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::Disabled => None,
        }
    }
}

/// One rendered export. Never cached; dropped once handed off.
pub struct ExportArtifact {
    pixmap: Pixmap,
    scale: f32,
}

impl std::fmt::Debug for ExportArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportArtifact")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("scale", &self.scale)
            .finish()
    }
}

impl ExportArtifact {
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// The premultiplied RGBA buffer.
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Encode as PNG bytes.
    pub fn encode_png(&self) -> FgradientResult<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| FgradientError::render(format!("Failed to encode PNG: {e}")))
    }
}

/// Destination for clipboard image payloads.
pub trait ClipboardWriter: Send {
    /// Place a PNG image on the clipboard, replacing its contents.
    fn write_png(&mut self, png: &[u8]) -> FgradientResult<()>;

    /// Backend name.
    fn name(&self) -> &str;
}

/// The desktop clipboard, via `arboard`.
///
/// On X11 and Wayland the contents are served by this process, so keep
/// the writer alive for a moment after copying to let a clipboard
/// manager take ownership.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    pub fn open() -> FgradientResult<Self> {
        let inner = arboard::Clipboard::new()
            .map_err(|e| FgradientError::clipboard(format!("Clipboard unavailable: {e}")))?;
        Ok(Self { inner })
    }
}

impl ClipboardWriter for SystemClipboard {
    fn write_png(&mut self, png: &[u8]) -> FgradientResult<()> {
        // arboard takes straight RGBA and re-encodes per platform.
        let rgba = image::load_from_memory_with_format(png, image::ImageFormat::Png)
            .map_err(|e| FgradientError::clipboard(format!("Invalid PNG payload: {e}")))?
            .to_rgba8();
        let (width, height) = rgba.dimensions();
        let data = arboard::ImageData {
            width: width as usize,
            height: height as usize,
            bytes: Cow::Owned(rgba.into_raw()),
        };
        self.inner
            .set_image(data)
            .map_err(|e| FgradientError::clipboard(format!("Failed to write image: {e}")))
    }

    fn name(&self) -> &str {
        "system"
    }
}

/// Clipboard kept in memory, for tests and headless hosts.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Option<Vec<u8>>,
    writes: usize,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last PNG written, if any.
    pub fn contents(&self) -> Option<&[u8]> {
        self.contents.as_deref()
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl ClipboardWriter for MemoryClipboard {
    fn write_png(&mut self, png: &[u8]) -> FgradientResult<()> {
        self.contents = Some(png.to_vec());
        self.writes += 1;
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Clipboard that always refuses, like a sandbox without clipboard access.
#[derive(Debug, Default)]
pub struct UnavailableClipboard;

impl ClipboardWriter for UnavailableClipboard {
    fn write_png(&mut self, _png: &[u8]) -> FgradientResult<()> {
        Err(FgradientError::clipboard("Clipboard access is not available"))
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}

/// Orchestrates export requests.
///
/// Holds no render state between calls: each request takes its own scene
/// snapshot and renders from scratch.
pub struct ExportPipeline {
    scale: f32,
    download_dir: PathBuf,
    on_stage: Option<StageCallback>,
    renders: AtomicU64,
}

impl std::fmt::Debug for ExportPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportPipeline")
            .field("scale", &self.scale)
            .field("download_dir", &self.download_dir)
            .field("renders", &self.render_count())
            .finish()
    }
}

impl ExportPipeline {
    /// Create a pipeline. `device_pixel_ratio` of `None` (or a nonsensical
    /// value) renders at 2x.
    pub fn new(device_pixel_ratio: Option<f32>, download_dir: impl Into<PathBuf>) -> Self {
        Self::with_scale(resolve_scale(device_pixel_ratio), download_dir)
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::with_scale(config.export.effective_scale(), &config.download_dir)
    }

    fn with_scale(scale: f32, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            scale,
            download_dir: download_dir.into(),
            on_stage: None,
            renders: AtomicU64::new(0),
        }
    }

    /// Report stage transitions to `callback`.
    pub fn with_stage_callback(mut self, callback: StageCallback) -> Self {
        self.on_stage = Some(callback);
        self
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Number of renders this pipeline has started.
    pub fn render_count(&self) -> u64 {
        self.renders.load(Ordering::Relaxed)
    }

    fn stage(&self, stage: ExportStage) {
        if let Some(cb) = &self.on_stage {
            cb(stage);
        }
    }

    /// Render a scene without any gating.
    pub async fn render_artifact(&self, scene: Scene) -> FgradientResult<ExportArtifact> {
        self.renders.fetch_add(1, Ordering::Relaxed);
        self.stage(ExportStage::Preparing);

        let result = self.render_inner(&scene).await;
        if result.is_err() {
            self.stage(ExportStage::Failed);
        }
        result
    }

    async fn render_inner(&self, scene: &Scene) -> FgradientResult<ExportArtifact> {
        let (width, height) = buffer_size(scene.sizing.width(), scene.sizing.height(), self.scale);
        tracing::info!(
            width,
            height,
            scale = self.scale,
            border_radius = scene.sizing.border_radius(),
            angle = scene.gradient.angle_degrees(),
            has_image = scene.has_image(),
            "Rendering export"
        );

        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            FgradientError::render(format!("Failed to allocate {width}x{height} pixmap"))
        })?;

        let decoded = match &scene.image {
            Some(asset) => {
                self.stage(ExportStage::Decoding);
                Some(decode_image(asset).await?)
            }
            None => None,
        };

        self.stage(ExportStage::Rendering);
        let axis = resolve_axis(&scene.gradient, width as f64, height as f64);
        composite(
            &mut pixmap,
            CompositeInput {
                axis: &axis,
                image: decoded.as_ref(),
                border_radius: scene.sizing.border_radius(),
                scale: self.scale,
            },
        )?;

        Ok(ExportArtifact {
            pixmap,
            scale: self.scale,
        })
    }

    async fn encode(&self, artifact: &ExportArtifact) -> FgradientResult<Vec<u8>> {
        self.stage(ExportStage::Encoding);
        let png = artifact.encode_png();
        if png.is_err() {
            self.stage(ExportStage::Failed);
        }
        png
    }

    /// Render and save as `gradient-image-<ms>.png` in the download
    /// directory. Returns the written path.
    pub async fn download(&self, scene: Scene) -> FgradientResult<ExportOutcome<PathBuf>> {
        if !ExportControls::for_scene(&scene).is_enabled() {
            tracing::debug!("Download requested without an image, ignoring");
            return Ok(ExportOutcome::Disabled);
        }

        let artifact = self.render_artifact(scene).await?;
        let png = self.encode(&artifact).await?;
        drop(artifact);

        self.stage(ExportStage::Writing);
        let path = self
            .download_dir
            .join(download_file_name(unix_timestamp_ms()));
        let written = write_file(&self.download_dir, &path, &png).await;
        if let Err(e) = written {
            self.stage(ExportStage::Failed);
            return Err(e);
        }

        tracing::info!(path = %path.display(), bytes = png.len(), "Export saved");
        self.stage(ExportStage::Complete);
        Ok(ExportOutcome::Completed(path))
    }

    /// Render and place the PNG on `clipboard`.
    pub async fn copy(
        &self,
        scene: Scene,
        clipboard: &mut dyn ClipboardWriter,
    ) -> FgradientResult<ExportOutcome<()>> {
        if !ExportControls::for_scene(&scene).is_enabled() {
            tracing::debug!("Copy requested without an image, ignoring");
            return Ok(ExportOutcome::Disabled);
        }

        let artifact = self.render_artifact(scene).await?;
        let png = self.encode(&artifact).await?;
        drop(artifact);

        self.stage(ExportStage::Writing);
        if let Err(e) = clipboard.write_png(&png) {
            tracing::warn!(backend = clipboard.name(), error = %e, "Clipboard write failed");
            self.stage(ExportStage::Failed);
            return Err(e);
        }

        tracing::info!(backend = clipboard.name(), bytes = png.len(), "Export copied");
        self.stage(ExportStage::Complete);
        Ok(ExportOutcome::Completed(()))
    }
}

/// Decode on the blocking pool.
async fn decode_image(asset: &ImageAsset) -> FgradientResult<RgbaImage> {
    let (format, bytes) = (asset.format().mime(), asset.byte_len());
    let owned = asset.clone();
    let image = tokio::task::spawn_blocking(move || owned.decode())
        .await
        .map_err(|e| FgradientError::render(format!("Image decode task failed: {e}")))??;
    tracing::debug!(
        format,
        bytes,
        width = image.width(),
        height = image.height(),
        "Decoded image"
    );
    Ok(image)
}

async fn write_file(dir: &Path, path: &Path, bytes: &[u8]) -> FgradientResult<()> {
    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(path, bytes).await?;
    Ok(())
}
