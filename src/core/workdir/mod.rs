// ─── Working Directory ───
// Root resolution plus the fixed `cache/ versions/ worlds/ conf/` layout.

pub mod paths;

use std::path::{Component, Path, PathBuf};

use tracing::{error, info, warn};

use crate::core::config::{Settings, SETTINGS_FILE};
use crate::core::error::{AdminError, AdminResult};

pub use paths::{resolve_root, WORK_DIR_ENV_VAR};

pub const CORE_DIRS: [&str; 4] = ["cache", "versions", "worlds", "conf"];

/// A resolved working directory. The root is fixed at construction;
/// the filesystem is consulted again on every check.
#[derive(Debug, Clone)]
pub struct WorkingDirectory {
    root: PathBuf,
}

impl WorkingDirectory {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Resolve the root once (explicit > `MC_ADMIN_PATH` > `~/mcadmin`).
    pub fn resolve(explicit: Option<&Path>) -> Self {
        Self::new(resolve_root(explicit))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.root.join("cache")
    }

    pub fn cache_path(&self, key: &str) -> PathBuf {
        self.cache_dir().join(key)
    }

    pub fn versions_dir(&self) -> PathBuf {
        self.root.join("versions")
    }

    /// `versions/<id>`. The id must be a single plain path component so the
    /// result never leaves `versions/`.
    pub fn version_dir(&self, version: &str) -> AdminResult<PathBuf> {
        let mut components = Path::new(version).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.versions_dir().join(version)),
            _ => {
                error!("Rejecting version id [{}]", version);
                Err(AdminError::UnknownVersion(version.to_string()))
            }
        }
    }

    pub fn worlds_dir(&self) -> PathBuf {
        self.root.join("worlds")
    }

    pub fn world_dir(&self, name: &str) -> PathBuf {
        self.worlds_dir().join(name)
    }

    pub fn conf_dir(&self) -> PathBuf {
        self.root.join("conf")
    }

    /// True iff the root is a directory and every core subdirectory exists.
    pub fn is_initialized(&self) -> bool {
        let mut initialized = true;

        if !self.root.exists() {
            warn!("Working directory [{}] does not exist.", self.root.display());
            initialized = false;
        } else if !self.root.is_dir() {
            error!("Working directory [{}] is not a directory.", self.root.display());
            return false;
        } else {
            for sub in CORE_DIRS {
                let subdir = self.root.join(sub);
                if !subdir.is_dir() {
                    warn!("Working directory [{}] was not found.", subdir.display());
                    initialized = false;
                }
            }
        }

        if !initialized {
            info!(
                "MCAdmin is not initialized in working directory [{}].",
                self.root.display()
            );
            info!("Please run 'mcadmin init' to initialize MCAdmin");
        }

        initialized
    }

    /// Create the root and all core subdirectories, stopping at the first
    /// failure. Writes default settings into `conf/` when none exist.
    pub fn initialize(&self) -> AdminResult<()> {
        if self.root.exists() && !self.root.is_dir() {
            error!("Working directory [{}] is not a directory.", self.root.display());
            return Err(AdminError::NotADirectory(self.root.clone()));
        }

        create_dir(&self.root)?;
        for sub in CORE_DIRS {
            create_dir(&self.root.join(sub))?;
        }

        if !self.conf_dir().join(SETTINGS_FILE).exists() {
            Settings::default().save(&self.conf_dir())?;
        }

        info!("Initialized working directory [{}]", self.root.display());
        Ok(())
    }

    pub fn ensure_initialized(&self) -> AdminResult<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(AdminError::NotInitialized(self.root.clone()))
        }
    }
}

fn create_dir(path: &Path) -> AdminResult<()> {
    std::fs::create_dir_all(path).map_err(|source| {
        error!("Failed to create directory [{}]: {}", path.display(), source);
        AdminError::io(path, source)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("mcadmin-workdir-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn fresh_root_is_not_initialized() {
        let workdir = WorkingDirectory::new(temp_root());
        assert!(!workdir.is_initialized());
        assert!(workdir.ensure_initialized().is_err());
    }

    #[test]
    fn initialize_creates_layout() {
        let workdir = WorkingDirectory::new(temp_root());
        workdir.initialize().unwrap();

        assert!(workdir.is_initialized());
        for sub in CORE_DIRS {
            assert!(workdir.root().join(sub).is_dir());
        }
        assert!(workdir.conf_dir().join(SETTINGS_FILE).is_file());

        // Running again is harmless.
        workdir.initialize().unwrap();
    }

    #[test]
    fn missing_subdirectory_breaks_initialization() {
        let workdir = WorkingDirectory::new(temp_root());
        workdir.initialize().unwrap();
        std::fs::remove_dir(workdir.worlds_dir()).unwrap();

        assert!(!workdir.is_initialized());
    }

    #[test]
    fn file_as_root_is_rejected() {
        let root = temp_root();
        std::fs::write(&root, b"not a dir").unwrap();
        let workdir = WorkingDirectory::new(root);

        assert!(!workdir.is_initialized());
        assert!(matches!(
            workdir.initialize(),
            Err(AdminError::NotADirectory(_))
        ));
    }

    #[test]
    fn layout_paths() {
        let workdir = WorkingDirectory::new(PathBuf::from("/srv/mc"));
        assert_eq!(workdir.cache_path("a.json"), PathBuf::from("/srv/mc/cache/a.json"));
        assert_eq!(
            workdir.version_dir("1.20.1").unwrap(),
            PathBuf::from("/srv/mc/versions/1.20.1")
        );
        assert_eq!(workdir.world_dir("survival"), PathBuf::from("/srv/mc/worlds/survival"));
        assert_eq!(workdir.conf_dir(), PathBuf::from("/srv/mc/conf"));
    }

    #[test]
    fn version_dir_stays_inside_versions() {
        let workdir = WorkingDirectory::new(PathBuf::from("/srv/mc"));
        for id in ["..", ".", "", "/tmp/outside", "../1.20.1", "1.20/../..", "a/b"] {
            assert!(
                matches!(workdir.version_dir(id), Err(AdminError::UnknownVersion(ref v)) if v == id),
                "accepted {id:?}"
            );
        }
    }
}
