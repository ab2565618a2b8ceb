//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Device pixel ratio used when the display density is unknown.
pub const DEFAULT_DEVICE_PIXEL_RATIO: f32 = 2.0;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory where downloaded exports are written.
    pub download_dir: PathBuf,

    /// Default export settings.
    #[serde(default)]
    pub export: ExportDefaults,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// File backing the persisted sizing preferences.
    #[serde(default = "default_preferences_path")]
    pub preferences_path: PathBuf,
}

/// Default export parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportDefaults {
    /// Physical-to-logical pixel ratio. `None` means unknown.
    pub device_pixel_ratio: Option<f32>,
}

impl ExportDefaults {
    /// The scale to render at, falling back to 2x when unknown or invalid.
    pub fn effective_scale(&self) -> f32 {
        resolve_scale(self.device_pixel_ratio)
    }
}

/// Resolve a device pixel ratio into a usable render scale.
pub fn resolve_scale(ratio: Option<f32>) -> f32 {
    match ratio {
        Some(r) if r.is_finite() && r > 0.0 => r,
        _ => DEFAULT_DEVICE_PIXEL_RATIO,
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "fgradient=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            download_dir: dirs_default_downloads(),
            export: ExportDefaults::default(),
            logging: LoggingConfig::default(),
            preferences_path: default_preferences_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_dir().join("config.json");
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }
}

/// Standard config directory.
fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"));
    base.join("fgradient")
}

fn default_preferences_path() -> PathBuf {
    config_dir().join("preferences.json")
}

/// Default download directory.
fn dirs_default_downloads() -> PathBuf {
    std::env::var("XDG_DOWNLOAD_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join("Downloads"))
}

fn home_dir() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string()))
}
