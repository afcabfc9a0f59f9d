//! Persistent loader settings

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::DEFAULT_CACHE_CAPACITY;

/// Loader settings that persist between sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderSettings {
    /// Number of decoded clouds kept in the recency cache
    pub cache_capacity: usize,
    /// Translate clouds so their bounding box center is the origin before caching
    pub center_on_load: bool,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            center_on_load: true,
        }
    }
}

impl LoaderSettings {
    /// Default settings file path
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("pcload");
            p.push("settings.json");
            p
        })
    }

    /// Load settings from the default path, falling back to defaults
    pub fn load() -> Self {
        Self::path().map(|p| Self::load_from(&p)).unwrap_or_default()
    }

    /// Load settings from `path`. A missing or unreadable file gives defaults.
    pub fn load_from(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(_) => return Self::default(),
        };
        let mut settings: Self = serde_json::from_str(&text).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "invalid settings file, using defaults");
            Self::default()
        });

        if settings.cache_capacity == 0 {
            settings.cache_capacity = DEFAULT_CACHE_CAPACITY;
        }
        settings
    }

    /// Save settings to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}
