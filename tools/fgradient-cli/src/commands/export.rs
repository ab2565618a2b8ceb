//! Render the scene and save it as a PNG file.

use std::path::PathBuf;

use fgradient_common::config::AppConfig;
use fgradient_render_engine::export::{ExportOutcome, ExportPipeline, ExportStage};

use super::scene::{self, SceneArgs};

pub async fn run(
    config: &AppConfig,
    image: PathBuf,
    args: SceneArgs,
    out_dir: Option<PathBuf>,
    scale: Option<f32>,
) -> anyhow::Result<()> {
    let scene = scene::build(config, Some(&image), &args)?;

    let download_dir = out_dir.unwrap_or_else(|| config.download_dir.clone());
    let ratio = scale.or(config.export.device_pixel_ratio);
    let pipeline = ExportPipeline::new(ratio, download_dir).with_stage_callback(Box::new(
        |stage| {
            if stage == ExportStage::Encoding {
                println!("  Encoding PNG...");
            }
        },
    ));

    println!(
        "Exporting {}x{} canvas at {}x",
        scene.sizing.width(),
        scene.sizing.height(),
        pipeline.scale()
    );
    println!("  Output directory: {}", pipeline.download_dir().display());

    match pipeline.download(scene).await {
        Ok(ExportOutcome::Completed(path)) => {
            println!("Saved: {}", path.display());
            Ok(())
        }
        Ok(ExportOutcome::Disabled) => {
            println!("Nothing to export: upload an image first.");
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Download failed");
            Err(anyhow::anyhow!(e.user_message()))
        }
    }
}
