use std::path::PathBuf;

use tracing::info;

use super::model::{normalize_world_name, World};
use crate::core::error::{AdminError, AdminResult};

/// Manages world directories on disk.
pub struct WorldManager {
    /// Root directory where all worlds live.
    worlds_dir: PathBuf,
}

impl WorldManager {
    pub fn new(worlds_dir: PathBuf) -> Self {
        Self { worlds_dir }
    }

    /// Create `worlds/<normalized name>/`.
    pub async fn create(&self, name: &str) -> AdminResult<World> {
        let normalized = normalize_world_name(name);
        if normalized.is_empty() || normalized == "." || normalized == ".." {
            return Err(AdminError::InvalidWorldName(name.to_string()));
        }

        let path = self.worlds_dir.join(&normalized);
        if path.exists() {
            return Err(AdminError::WorldAlreadyExists(normalized));
        }

        tokio::fs::create_dir_all(&path)
            .await
            .map_err(|source| AdminError::Io {
                path: path.clone(),
                source,
            })?;

        info!("Created world '{}' at {:?}", normalized, path);
        Ok(World {
            name: normalized,
            path,
        })
    }

    /// List all worlds, sorted by name.
    pub async fn list(&self) -> AdminResult<Vec<World>> {
        let mut worlds = Vec::new();

        if !self.worlds_dir.exists() {
            return Ok(worlds);
        }

        let mut entries = tokio::fs::read_dir(&self.worlds_dir)
            .await
            .map_err(|e| AdminError::io(&self.worlds_dir, e))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AdminError::io(&self.worlds_dir, e))?
        {
            let path = entry.path();
            if path.is_dir() {
                worlds.push(World {
                    name: entry.file_name().to_string_lossy().to_string(),
                    path,
                });
            }
        }

        worlds.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(worlds)
    }
}
