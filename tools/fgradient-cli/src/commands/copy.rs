//! Render the scene and copy it to the clipboard.

use std::path::PathBuf;
use std::time::Instant;

use fgradient_common::clock::CopyAcknowledgment;
use fgradient_common::config::AppConfig;
use fgradient_common::error::FgradientResult;
use fgradient_render_engine::export::{
    ClipboardWriter, ExportControls, ExportOutcome, ExportPipeline, SystemClipboard,
};
use fgradient_scene_model::scene::Scene;

use super::scene::{self, SceneArgs};

pub async fn run(
    config: &AppConfig,
    image: PathBuf,
    args: SceneArgs,
    scale: Option<f32>,
) -> anyhow::Result<()> {
    let scene = scene::build(config, Some(&image), &args)?;

    let ratio = scale.or(config.export.device_pixel_ratio);
    let pipeline = ExportPipeline::new(ratio, &config.download_dir);

    match copy_scene(&pipeline, scene, SystemClipboard::open).await? {
        ExportOutcome::Completed(()) => {
            let mut ack = CopyAcknowledgment::default();
            ack.trigger(Instant::now());
            println!("{}", ack.label(Instant::now()));

            // The clipboard contents live in this process on X11/Wayland;
            // stay up for the acknowledgment window so a manager can grab them.
            tokio::time::sleep(ack.remaining(Instant::now())).await;
            tracing::debug!(label = ack.label(Instant::now()), "Copy acknowledgment elapsed");
        }
        ExportOutcome::Disabled => {
            println!("Nothing to copy: upload an image first.");
        }
    }
    Ok(())
}

/// Copy `scene` through a clipboard obtained from `open`. The clipboard is
/// only opened once the copy control is enabled.
async fn copy_scene<C, F>(
    pipeline: &ExportPipeline,
    scene: Scene,
    open: F,
) -> anyhow::Result<ExportOutcome<()>>
where
    C: ClipboardWriter,
    F: FnOnce() -> FgradientResult<C>,
{
    if !ExportControls::for_scene(&scene).is_enabled() {
        tracing::debug!("Copy requested without an image");
        return Ok(ExportOutcome::Disabled);
    }

    let mut clipboard = match open() {
        Ok(clipboard) => clipboard,
        Err(e) => {
            tracing::error!(error = %e, "Clipboard unavailable");
            return Err(anyhow::anyhow!(e.user_message()));
        }
    };

    pipeline.copy(scene, &mut clipboard).await.map_err(|e| {
        tracing::error!(error = %e, "Copy failed");
        anyhow::anyhow!(e.user_message())
    })
}
