// ─── File Cache ───
// Byte blobs stored under `cache/<key>`, plus the fetch-if-stale combinator.

pub mod fetch;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

use crate::core::error::{AdminError, AdminResult};

pub use fetch::{get_or_cache, get_or_cache_with, Freshness};

pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    pub fn is_cached(&self, key: &str) -> bool {
        let cached = self.path(key).is_file();
        debug!(
            "File [{}] is {}cached",
            key,
            if cached { "" } else { "not " }
        );
        cached
    }

    /// Last modification time of the entry, if it exists.
    pub fn timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        let modified = std::fs::metadata(self.path(key)).ok()?.modified().ok()?;
        Some(DateTime::<Utc>::from(modified))
    }

    pub async fn load(&self, key: &str) -> AdminResult<Vec<u8>> {
        tokio::fs::read(self.path(key)).await.map_err(|source| {
            error!("Failed to load cache file [{}]: {}", key, source);
            AdminError::CacheReadFailed {
                key: key.to_string(),
                source,
            }
        })
    }

    pub async fn save(&self, key: &str, content: &[u8]) -> AdminResult<()> {
        let path = self.path(key);
        tokio::fs::write(&path, content).await.map_err(|source| {
            error!("Failed to save cache file [{}]: {}", key, source);
            AdminError::WriteFailed { path, source }
        })
    }

    /// Remove every cached file. Returns how many were removed.
    pub async fn clear(&self) -> AdminResult<usize> {
        let mut removed = 0;
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| AdminError::io(&self.dir, e))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AdminError::io(&self.dir, e))?
        {
            let path = entry.path();
            if path.is_file() {
                tokio::fs::remove_file(&path)
                    .await
                    .map_err(|e| AdminError::io(&path, e))?;
                removed += 1;
            }
        }

        info!("Removed {} cached files from {:?}", removed, self.dir);
        Ok(removed)
    }
}

#[cfg(test)]
pub(crate) fn temp_cache() -> FileCache {
    let dir = std::env::temp_dir().join(format!("mcadmin-cache-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    FileCache::new(dir)
}
