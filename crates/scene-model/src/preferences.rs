//! Persisted sizing preferences.
//!
//! Only the numeric sizing record survives between sessions; image data
//! and gradient settings are never stored. Anything wrong with the stored
//! record is recovered from silently by falling back to defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use fgradient_common::error::{FgradientError, FgradientResult};

use crate::sizing::SizingConfig;

/// Fixed key under which the sizing record is stored.
pub const SIZING_STORAGE_KEY: &str = "fgradient:sizing";

/// A string key/value store, in the spirit of browser local storage.
pub trait PreferenceStore {
    /// Read a value. Missing keys are `Ok(None)`.
    fn get(&self, key: &str) -> FgradientResult<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> FgradientResult<()>;

    /// Remove a value. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> FgradientResult<()>;
}

/// Load the sizing record, falling back to defaults on any problem.
pub fn load_sizing(store: &dyn PreferenceStore) -> SizingConfig {
    let raw = match store.get(SIZING_STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return SizingConfig::default(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read sizing preferences, using defaults");
            return SizingConfig::default();
        }
    };

    match serde_json::from_str::<SizingConfig>(&raw) {
        Ok(sizing) => sizing,
        Err(e) => {
            tracing::warn!(error = %e, "Discarding malformed sizing preferences");
            SizingConfig::default()
        }
    }
}

/// Persist the sizing record.
pub fn save_sizing(store: &dyn PreferenceStore, sizing: &SizingConfig) -> FgradientResult<()> {
    let json = serde_json::to_string(sizing)?;
    store.set(SIZING_STORAGE_KEY, &json)?;
    tracing::debug!(
        width = sizing.width(),
        height = sizing.height(),
        lock_aspect_ratio = sizing.lock_aspect_ratio(),
        border_radius = sizing.border_radius(),
        "Saved sizing preferences"
    );
    Ok(())
}

/// Forget the stored sizing record.
pub fn reset_sizing(store: &dyn PreferenceStore) -> FgradientResult<()> {
    store.remove(SIZING_STORAGE_KEY)
}

/// Preferences kept in a single JSON object file (`{"key": "value", ...}`).
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> FgradientResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            FgradientError::preferences(format!(
                "Malformed preferences file {}: {e}",
                self.path.display()
            ))
        })
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> FgradientResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// Entries for rewriting; a corrupt file is replaced rather than kept.
    fn entries_for_update(&self) -> BTreeMap<String, String> {
        self.read_all().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Replacing unreadable preferences file");
            BTreeMap::new()
        })
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> FgradientResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> FgradientResult<()> {
        let mut entries = self.entries_for_update();
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> FgradientResult<()> {
        let mut entries = self.entries_for_update();
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

/// In-memory store, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        // A panic while holding the lock cannot leave the map half-written.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> FgradientResult<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> FgradientResult<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> FgradientResult<()> {
        self.lock().remove(key);
        Ok(())
    }
}
