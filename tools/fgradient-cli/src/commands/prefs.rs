//! Inspect or reset the persisted sizing preferences.

use fgradient_common::config::AppConfig;
use fgradient_scene_model::preferences::{load_sizing, reset_sizing, FileStore};

pub fn show(config: &AppConfig) -> anyhow::Result<()> {
    let store = FileStore::new(&config.preferences_path);
    let sizing = load_sizing(&store);

    println!("Preferences: {}", store.path().display());
    println!("  Size: {}x{}", sizing.width(), sizing.height());
    println!("  Lock aspect ratio: {}", sizing.lock_aspect_ratio());
    println!("  Border radius: {}px", sizing.border_radius());
    Ok(())
}

pub fn reset(config: &AppConfig) -> anyhow::Result<()> {
    let store = FileStore::new(&config.preferences_path);
    reset_sizing(&store).map_err(|e| anyhow::anyhow!("Failed to reset preferences: {e}"))?;
    println!("Sizing preferences reset to defaults.");
    Ok(())
}
