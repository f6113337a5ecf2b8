// ─── Version Artifacts ───
// Per-version JSON plus the client/server jars cached under `versions/<id>/`.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{error, info};

use crate::core::cache::{get_or_cache, FileCache};
use crate::core::error::{AdminError, AdminResult};
use crate::core::http::Transport;
use crate::core::state::AdminState;

use super::manifest::VersionManifest;
use super::textures;

pub const CLIENT_JAR: &str = "client.jar";
pub const SERVER_JAR: &str = "server.jar";
pub const TEXTURES_DIR: &str = "textures";

/// The subset of a Mojang version JSON this tool reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VersionJson {
    #[serde(default)]
    pub downloads: Option<VersionDownloads>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VersionDownloads {
    pub client: Option<DownloadArtifact>,
    pub server: Option<DownloadArtifact>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadArtifact {
    pub url: Option<String>,
    #[allow(dead_code)]
    #[serde(default)]
    pub sha1: Option<String>,
    #[allow(dead_code)]
    #[serde(default)]
    pub size: Option<u64>,
}

/// Which jar of a version to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Client,
    Server,
}

impl ArtifactKind {
    fn name(self) -> &'static str {
        match self {
            ArtifactKind::Client => "client",
            ArtifactKind::Server => "server",
        }
    }

    fn file_name(self) -> &'static str {
        match self {
            ArtifactKind::Client => CLIENT_JAR,
            ArtifactKind::Server => SERVER_JAR,
        }
    }
}

/// One version's manifest and its on-disk artifacts.
pub struct VersionArtifacts {
    version: String,
    dir: PathBuf,
    manifest: VersionJson,
    raw: serde_json::Value,
}

impl VersionArtifacts {
    pub fn new(version: &str, dir: PathBuf, raw: serde_json::Value) -> AdminResult<Self> {
        let manifest = serde_json::from_value(raw.clone())?;
        Ok(Self {
            version: version.to_string(),
            dir,
            manifest,
            raw,
        })
    }

    /// Resolve `version` in the manifest and load its JSON through the cache
    /// as `version-<id>.json`.
    pub async fn load(
        state: &AdminState,
        manifest: &VersionManifest,
        version: &str,
    ) -> AdminResult<Self> {
        let dir = state.workdir.version_dir(version)?;
        let url = manifest.version_url(version).ok_or_else(|| {
            error!("Unrecognized version [{}]", version);
            AdminError::UnknownVersion(version.to_string())
        })?;

        let raw = fetch_version_json(
            state.transport(),
            &state.cache,
            url,
            version,
            state.config.force_refresh,
        )
        .await?;

        Self::new(version, dir, raw)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn raw(&self) -> &serde_json::Value {
        &self.raw
    }

    pub fn client_jar_path(&self) -> PathBuf {
        self.dir.join(CLIENT_JAR)
    }

    pub fn server_jar_path(&self) -> PathBuf {
        self.dir.join(SERVER_JAR)
    }

    pub fn texture_dir(&self) -> PathBuf {
        self.dir.join(TEXTURES_DIR)
    }

    pub async fn ensure_client_jar(&self, transport: &dyn Transport) -> AdminResult<PathBuf> {
        self.ensure_artifact(transport, ArtifactKind::Client).await
    }

    pub async fn ensure_server_jar(&self, transport: &dyn Transport) -> AdminResult<PathBuf> {
        self.ensure_artifact(transport, ArtifactKind::Server).await
    }

    /// Download the jar unless it is already present. Presence is the only
    /// cache check.
    async fn ensure_artifact(
        &self,
        transport: &dyn Transport,
        kind: ArtifactKind,
    ) -> AdminResult<PathBuf> {
        let dest = self.dir.join(kind.file_name());
        if dest.exists() {
            info!("{} jar for version [{}] is cached", kind.name(), self.version);
            return Ok(dest);
        }

        let url = self.download_url(kind).ok_or_else(|| {
            error!(
                "Version manifest for [{}] is incomplete; missing downloads:{}:url entry",
                self.version,
                kind.name()
            );
            AdminError::MissingDownloadInfo {
                version: self.version.clone(),
                artifact: kind.name().to_string(),
            }
        })?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AdminError::io(&self.dir, e))?;

        info!("Downloading [{}]...", url);
        let response = transport.get(url).await?;
        if !response.is_success() {
            error!(
                "Failed to retrieve {} jar from url [{}]: http status {}",
                kind.name(),
                url,
                response.status
            );
            return Err(AdminError::DownloadFailed {
                url: url.to_string(),
                status: response.status,
            });
        }

        tokio::fs::write(&dest, &response.body)
            .await
            .map_err(|source| {
                error!(
                    "Failed to save version [{}] {} jar: {}",
                    self.version,
                    kind.name(),
                    source
                );
                AdminError::WriteFailed {
                    path: dest.clone(),
                    source,
                }
            })?;

        info!("Saved {:?} ({} bytes)", dest, response.body.len());
        Ok(dest)
    }

    fn download_url(&self, kind: ArtifactKind) -> Option<&str> {
        let downloads = self.manifest.downloads.as_ref()?;
        let artifact = match kind {
            ArtifactKind::Client => downloads.client.as_ref()?,
            ArtifactKind::Server => downloads.server.as_ref()?,
        };
        artifact.url.as_deref()
    }

    /// Extract the texture allow-list from the client jar into `textures/`.
    /// Returns the number of files written, 0 when already extracted.
    pub async fn extract_textures(&self, transport: &dyn Transport) -> AdminResult<usize> {
        let jar = self.ensure_client_jar(transport).await?;

        let texture_dir = self.texture_dir();
        if texture_dir.exists() {
            info!("Textures for version [{}] are cached", self.version);
            return Ok(0);
        }

        let version = self.version.clone();
        tokio::task::spawn_blocking(move || {
            textures::extract_textures(&jar, &texture_dir, &version, textures::TEXTURE_RESOURCES)
        })
        .await
        .map_err(|e| AdminError::io(self.texture_dir(), std::io::Error::other(e)))?
    }

    /// Remove the cached jars and textures, attempting every removal and
    /// reporting all failures together.
    pub async fn purge_cache(&self) -> AdminResult<()> {
        info!("Purging cache for version [{}]...", self.version);
        let mut failures = Vec::new();

        for jar in [self.client_jar_path(), self.server_jar_path()] {
            if jar.exists() {
                if let Err(e) = tokio::fs::remove_file(&jar).await {
                    error!("Failed to remove {:?} for version [{}]: {}", jar, self.version, e);
                    failures.push(format!("{}: {}", jar.display(), e));
                }
            }
        }

        let texture_dir = self.texture_dir();
        if texture_dir.exists() {
            if let Err(e) = tokio::fs::remove_dir_all(&texture_dir).await {
                error!(
                    "Failed to remove texture cache for version [{}]: {}",
                    self.version, e
                );
                failures.push(format!("{}: {}", texture_dir.display(), e));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(AdminError::PurgeFailed {
                version: self.version.clone(),
                failures,
            })
        }
    }
}

async fn fetch_version_json(
    transport: &dyn Transport,
    cache: &FileCache,
    url: &str,
    version: &str,
    force_refresh: bool,
) -> AdminResult<serde_json::Value> {
    let key = format!("version-{}.json", version);
    let raw = get_or_cache(transport, cache, url, &key, force_refresh).await?;
    serde_json::from_slice(&raw).map_err(|e| {
        error!("Failed to parse version [{}] manifest: {}", version, e);
        AdminError::from(e)
    })
}
