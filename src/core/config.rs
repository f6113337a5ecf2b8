// ─── Configuration ───
// Settings persisted under `conf/` plus the per-process overrides from the CLI.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::error::{AdminError, AdminResult};

pub const DEFAULT_MANIFEST_URL: &str =
    "https://launchermeta.mojang.com/mc/game/version_manifest.json";
pub const SETTINGS_FILE: &str = "mcadmin.json";

/// Persisted settings (`conf/mcadmin.json`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub manifest_url: String,
    /// Maximum age of the cached version manifest. `None` keeps it until
    /// a refresh is forced.
    pub manifest_max_age_secs: Option<u64>,
    pub debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            manifest_url: DEFAULT_MANIFEST_URL.to_string(),
            manifest_max_age_secs: None,
            debug: false,
        }
    }
}

impl Settings {
    /// Read settings from `conf_dir`. An absent file yields defaults; a
    /// corrupt one is an error.
    pub fn read(conf_dir: &Path) -> AdminResult<Self> {
        let path = conf_dir.join(SETTINGS_FILE);
        match std::fs::read_to_string(&path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(_) => Ok(Self::default()),
        }
    }

    /// Like `read`, but a corrupt file falls back to defaults with a warning.
    pub fn load(conf_dir: &Path) -> Self {
        Self::read(conf_dir).unwrap_or_else(|e| {
            warn!("Ignoring corrupt settings in {:?}: {}", conf_dir, e);
            Self::default()
        })
    }

    pub fn save(&self, conf_dir: &Path) -> AdminResult<()> {
        let path = conf_dir.join(SETTINGS_FILE);
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json).map_err(|source| AdminError::WriteFailed { path, source })
    }

    pub fn manifest_max_age(&self) -> Option<Duration> {
        self.manifest_max_age_secs.map(Duration::from_secs)
    }
}

/// Everything a command needs to construct the admin state.
#[derive(Debug, Clone, Default)]
pub struct AdminConfig {
    /// Explicit working directory (`--work-dir`), highest precedence.
    pub work_dir: Option<PathBuf>,
    pub debug: bool,
    /// Force a refetch of the version manifest and version JSONs.
    pub force_refresh: bool,
}
