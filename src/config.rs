use crate::paths::AppPaths;
use crate::{AlbumError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CACHE_SECONDS: i64 = 86_400;
const MIN_CACHE_SECONDS: i64 = 60;

/// Operator-tunable settings. `cache_seconds` doubles as the cache policy
/// fingerprint: entries stored under a different value are treated as
/// stale on the next read, so changing it re-validates every album.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GallerySettings {
    pub cache_seconds: i64,
}

impl Default for GallerySettings {
    fn default() -> Self {
        Self {
            cache_seconds: DEFAULT_CACHE_SECONDS,
        }
    }
}

impl GallerySettings {
    pub fn normalized(mut self) -> Self {
        self.cache_seconds = self.cache_seconds.max(MIN_CACHE_SECONDS);
        self
    }
}

pub fn load_settings(paths: &AppPaths) -> Result<GallerySettings> {
    let path = paths.settings_path();
    if !path.exists() {
        return Ok(GallerySettings::default());
    }
    let bytes = std::fs::read(&path)?;
    let parsed: GallerySettings = serde_json::from_slice(&bytes).map_err(|e| {
        AlbumError::Settings(format!(
            "failed to parse settings at {}: {e}",
            path.to_string_lossy()
        ))
    })?;
    Ok(parsed.normalized())
}

pub fn save_settings(paths: &AppPaths, settings: &GallerySettings) -> Result<()> {
    let path = paths.settings_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(&path, format!("{json}\n"))?;
    Ok(())
}
