//! Cache tier adapters for the directory snapshot.
//!
//! Two tiers implement the same `DirectoryCache` port: an in-process
//! copy for the common path and a JSON file that survives restarts.
//! Per the port contract, cache-miss and cache-error are the same thing:
//! both degrade to `None` (load) or a logged no-op (store/invalidate).

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

use mcpvet_core::domain::DirectoryCacheEntry;
use mcpvet_core::ports::DirectoryCache;

// ============================================================================
// In-process tier
// ============================================================================

/// Process-lifetime snapshot cache.
#[derive(Default)]
pub struct MemoryCache {
    entry: RwLock<Option<DirectoryCacheEntry>>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DirectoryCache for MemoryCache {
    async fn load(&self) -> Option<DirectoryCacheEntry> {
        self.entry.read().await.clone()
    }

    async fn store(&self, entry: &DirectoryCacheEntry) {
        *self.entry.write().await = Some(entry.clone());
    }

    async fn invalidate(&self) {
        *self.entry.write().await = None;
    }
}

// ============================================================================
// Durable tier
// ============================================================================

/// File-backed snapshot cache.
///
/// Wire format is the UI-facing JSON document
/// `{ "servers": [...], "timestamp": "<ISO-8601>" }`. Writes go through
/// a temp file plus rename so a crash mid-write leaves the old snapshot
/// intact.
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut path = self.path.clone();
        path.set_extension("json.tmp");
        path
    }
}

#[async_trait]
impl DirectoryCache for FileCache {
    async fn load(&self) -> Option<DirectoryCacheEntry> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "directory cache unreadable");
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "directory cache corrupt");
                None
            }
        }
    }

    async fn store(&self, entry: &DirectoryCacheEntry) {
        let json = match serde_json::to_string_pretty(entry) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize directory cache");
                return;
            }
        };

        if let Some(parent) = self.path.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                tracing::warn!(path = %parent.display(), error = %e, "failed to create cache dir");
                return;
            }
        }

        let temp = self.temp_path();
        if let Err(e) = tokio::fs::write(&temp, &json).await {
            tracing::warn!(path = %temp.display(), error = %e, "failed to write directory cache");
            return;
        }
        if let Err(e) = tokio::fs::rename(&temp, &self.path).await {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to replace directory cache");
        }
    }

    async fn invalidate(&self) {
        if let Err(e) = tokio::fs::remove_file(&self.path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to remove directory cache");
            }
        }
    }
}
