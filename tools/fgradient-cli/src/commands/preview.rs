//! Print the live preview styling for a scene.

use std::path::PathBuf;

use fgradient_common::config::AppConfig;
use fgradient_render_engine::export::ExportControls;
use fgradient_render_engine::geometry::resolve_axis;
use fgradient_render_engine::preview::{PreviewStyle, EMPTY_CANVAS_HINT};

use super::scene::{self, SceneArgs};

pub fn run(
    config: &AppConfig,
    image: Option<PathBuf>,
    args: SceneArgs,
    json: bool,
) -> anyhow::Result<()> {
    let scene = scene::build(config, image.as_deref(), &args)?;
    let style = PreviewStyle::for_scene(&scene);

    if json {
        println!("{}", serde_json::to_string_pretty(&style)?);
        return Ok(());
    }

    print!("{}", style.to_css());
    println!();
    if !scene.has_image() {
        println!("{EMPTY_CANVAS_HINT}");
    }
    println!("{}", style.summary());
    println!("Direction: {}", scene.gradient.direction.label());

    let axis = resolve_axis(
        &scene.gradient,
        scene.sizing.width() as f64,
        scene.sizing.height() as f64,
    );
    println!(
        "Axis: ({:.1}, {:.1}) -> ({:.1}, {:.1})",
        axis.start.x, axis.start.y, axis.end.x, axis.end.y
    );

    let controls = ExportControls::for_scene(&scene);
    println!(
        "Export: {}",
        if controls.is_enabled() {
            "enabled"
        } else {
            "disabled"
        }
    );
    Ok(())
}
