//! Shared scene flags and scene assembly.

use std::path::Path;

use clap::Args;
use fgradient_common::config::AppConfig;
use fgradient_scene_model::asset::ImageAsset;
use fgradient_scene_model::color::HexColor;
use fgradient_scene_model::gradient::{Direction, GradientConfig};
use fgradient_scene_model::preferences::{load_sizing, save_sizing, FileStore};
use fgradient_scene_model::scene::Scene;

/// Gradient and sizing flags accepted by every scene command.
#[derive(Args, Debug, Clone, Default)]
pub struct SceneArgs {
    /// Start color (#rgb, #rrggbb or #rrggbbaa)
    #[arg(long)]
    pub start: Option<HexColor>,

    /// Middle color
    #[arg(long)]
    pub mid: Option<HexColor>,

    /// End color
    #[arg(long)]
    pub end: Option<HexColor>,

    /// Direction: 90deg, 180deg, 45deg, 135deg or custom
    #[arg(long)]
    pub direction: Option<Direction>,

    /// Angle in degrees; implies --direction custom
    #[arg(long, allow_hyphen_values = true)]
    pub degree: Option<i32>,

    /// Canvas width in pixels (100-2000)
    #[arg(long)]
    pub width: Option<i64>,

    /// Canvas height in pixels (100-2000)
    #[arg(long)]
    pub height: Option<i64>,

    /// Corner radius in pixels (0-100)
    #[arg(long)]
    pub radius: Option<i64>,

    /// Keep the image's aspect ratio when resizing
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub lock_aspect: Option<bool>,

    /// Remember the resulting sizing for next time
    #[arg(long)]
    pub save_prefs: bool,
}

impl SceneArgs {
    fn gradient(&self) -> GradientConfig {
        let mut gradient = GradientConfig::default();
        if let Some(c) = self.start {
            gradient.start_color = c;
        }
        if let Some(c) = self.mid {
            gradient.mid_color = c;
        }
        if let Some(c) = self.end {
            gradient.end_color = c;
        }
        if let Some(d) = self.direction {
            gradient.direction = d;
        }
        if let Some(deg) = self.degree {
            gradient.custom_degree = deg;
            if self.direction.is_none() {
                gradient.direction = Direction::Custom;
            }
        }
        gradient
    }
}

/// Read an image the way the uploader does. Unsupported or unreadable
/// files are reported and skipped, leaving the scene without an image.
pub fn load_image(path: &Path) -> anyhow::Result<Option<ImageAsset>> {
    match ImageAsset::accept_path(path) {
        Ok(Some(asset)) => Ok(Some(asset)),
        Ok(None) => {
            println!(
                "Ignoring {}: only JPG, PNG and WebP images are supported.",
                path.display()
            );
            Ok(None)
        }
        Err(fgradient_common::FgradientError::FileNotFound { path }) => {
            Err(anyhow::anyhow!("Image not found: {}", path.display()))
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable image");
            println!("Ignoring {}: the image could not be read.", path.display());
            Ok(None)
        }
    }
}

/// Assemble a scene the way the editor would: restore saved sizing, apply
/// the aspect lock, upload the image, then apply explicit size edits.
pub fn build(config: &AppConfig, image: Option<&Path>, args: &SceneArgs) -> anyhow::Result<Scene> {
    let store = FileStore::new(&config.preferences_path);
    let mut scene = Scene::new(args.gradient(), load_sizing(&store), None);

    if let Some(locked) = args.lock_aspect {
        scene.sizing.set_lock_aspect_ratio(locked);
    }
    if let Some(path) = image {
        if let Some(asset) = load_image(path)? {
            scene.upload(asset);
        }
    }
    if let Some(w) = args.width {
        scene.set_width(w);
    }
    if let Some(h) = args.height {
        scene.set_height(h);
    }
    if let Some(r) = args.radius {
        scene.sizing.set_border_radius(r);
    }

    if args.save_prefs {
        save_sizing(&store, &scene.sizing)
            .map_err(|e| anyhow::anyhow!("Failed to save preferences: {e}"))?;
        println!("Saved sizing preferences to {}", store.path().display());
    }

    tracing::debug!(
        gradient = %scene.gradient.angle_label(),
        width = scene.sizing.width(),
        height = scene.sizing.height(),
        border_radius = scene.sizing.border_radius(),
        has_image = scene.has_image(),
        "Scene assembled"
    );
    Ok(scene)
}
