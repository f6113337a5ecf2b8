use std::sync::Arc;

use crate::core::cache::FileCache;
use crate::core::config::{AdminConfig, Settings};
use crate::core::error::AdminResult;
use crate::core::http::{HttpTransport, Transport};
use crate::core::version::{VersionArtifacts, VersionManifest};
use crate::core::workdir::WorkingDirectory;
use crate::core::world::WorldManager;

/// Everything a command needs, built once per process from `AdminConfig`.
pub struct AdminState {
    pub config: AdminConfig,
    pub settings: Settings,
    pub workdir: WorkingDirectory,
    pub cache: FileCache,
    pub worlds: WorldManager,
    transport: Arc<dyn Transport>,
    manifest: Option<Arc<VersionManifest>>,
}

impl AdminState {
    /// Production state over HTTP, from a working directory and settings
    /// the caller has already loaded.
    pub fn new(
        config: AdminConfig,
        workdir: WorkingDirectory,
        settings: Settings,
    ) -> AdminResult<Self> {
        let transport = Arc::new(HttpTransport::new()?);
        Ok(Self::assemble(config, workdir, settings, transport))
    }

    pub fn with_transport(config: AdminConfig, transport: Arc<dyn Transport>) -> Self {
        let workdir = WorkingDirectory::resolve(config.work_dir.as_deref());
        let settings = Settings::load(&workdir.conf_dir());
        Self::assemble(config, workdir, settings, transport)
    }

    fn assemble(
        config: AdminConfig,
        workdir: WorkingDirectory,
        mut settings: Settings,
        transport: Arc<dyn Transport>,
    ) -> Self {
        settings.debug |= config.debug;

        Self {
            cache: FileCache::new(workdir.cache_dir()),
            worlds: WorldManager::new(workdir.worlds_dir()),
            config,
            settings,
            workdir,
            transport,
            manifest: None,
        }
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// The version manifest, loaded on first use and kept for the process.
    pub async fn versions(&mut self) -> AdminResult<Arc<VersionManifest>> {
        if let Some(manifest) = &self.manifest {
            return Ok(Arc::clone(manifest));
        }

        let manifest = Arc::new(VersionManifest::load(self).await?);
        self.manifest = Some(Arc::clone(&manifest));
        Ok(manifest)
    }

    pub async fn version(&mut self, version: &str) -> AdminResult<VersionArtifacts> {
        let manifest = self.versions().await?;
        VersionArtifacts::load(self, &manifest, version).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::core::config::DEFAULT_MANIFEST_URL;
    use crate::core::error::AdminError;
    use crate::core::http::mock::MockTransport;

    fn initialized_config() -> AdminConfig {
        let root = std::env::temp_dir().join(format!("mcadmin-state-{}", uuid::Uuid::new_v4()));
        WorkingDirectory::new(root.clone()).initialize().unwrap();
        AdminConfig {
            work_dir: Some(root),
            ..AdminConfig::default()
        }
    }

    fn manifest_json() -> String {
        json!({
            "latest": { "release": "1.20.1", "snapshot": "23w31a" },
            "versions": [
                { "id": "1.20.1", "type": "release", "url": "https://example.com/1.20.1.json" },
                { "id": "23w31a", "type": "snapshot", "url": "https://example.com/23w31a.json" }
            ]
        })
        .to_string()
    }

    #[tokio::test]
    async fn manifest_is_fetched_once_per_process() {
        let transport = Arc::new(MockTransport::new().route(DEFAULT_MANIFEST_URL, 200, manifest_json()));
        let mut state = AdminState::with_transport(initialized_config(), transport.clone());

        let manifest = state.versions().await.unwrap();
        assert_eq!(manifest.latest(crate::core::version::Channel::Release), "1.20.1");
        state.versions().await.unwrap();

        assert_eq!(transport.calls(), 1);
        assert!(state.cache.is_cached("version_manifest.json"));
    }

    #[tokio::test]
    async fn version_loads_through_manifest() {
        let transport = Arc::new(
            MockTransport::new()
                .route(DEFAULT_MANIFEST_URL, 200, manifest_json())
                .route(
                    "https://example.com/1.20.1.json",
                    200,
                    json!({ "downloads": { "server": { "url": "https://example.com/server.jar" } } })
                        .to_string(),
                ),
        );
        let mut state = AdminState::with_transport(initialized_config(), transport);

        let version = state.version("1.20.1").await.unwrap();
        assert_eq!(version.dir(), state.workdir.version_dir("1.20.1").unwrap());
        assert!(state.cache.is_cached("version-1.20.1.json"));

        let err = state.version("9.9.9").await.err().unwrap();
        assert!(matches!(err, AdminError::UnknownVersion(_)));
    }

    #[tokio::test]
    async fn settings_override_manifest_url() {
        let config = initialized_config();
        let conf_dir = WorkingDirectory::resolve(config.work_dir.as_deref()).conf_dir();
        Settings {
            manifest_url: "https://mirror.example.com/manifest.json".into(),
            ..Settings::default()
        }
        .save(&conf_dir)
        .unwrap();

        let transport = Arc::new(
            MockTransport::new().route("https://mirror.example.com/manifest.json", 200, manifest_json()),
        );
        let mut state = AdminState::with_transport(config, transport);

        assert!(state.versions().await.is_ok());
    }

    #[test]
    fn cli_debug_flag_overrides_settings() {
        let mut config = initialized_config();
        config.debug = true;
        let workdir = WorkingDirectory::resolve(config.work_dir.as_deref());

        let state = AdminState::new(config, workdir, Settings::default()).unwrap();
        assert!(state.settings.debug);
        assert_eq!(state.cache.path("x"), state.workdir.cache_path("x"));
    }
}
