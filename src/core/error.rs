use std::path::PathBuf;
use thiserror::Error;

/// Broad failure classes reported to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    Parse,
    Filesystem,
    Validation,
}

/// Central error type for the admin backend.
/// Every module returns `Result<T, AdminError>`.
#[derive(Debug, Error)]
pub enum AdminError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to load cache file [{key}]: {source}")]
    CacheReadFailed {
        key: String,
        source: std::io::Error,
    },

    #[error("Failed to write {path:?}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Working directory {0:?} is not a directory")]
    NotADirectory(PathBuf),

    #[error("Purge of version [{version}] incomplete: {}", .failures.join("; "))]
    PurgeFailed {
        version: String,
        failures: Vec<String>,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to retrieve url [{url}]: HTTP {status}")]
    FetchFailed { url: String, status: u16 },

    #[error("Download failed for {url}: HTTP {status}")]
    DownloadFailed { url: String, status: u16 },

    // ── JSON ────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Manifest ────────────────────────────────────────
    #[error("Incomplete version manifest: {0}")]
    IncompleteManifest(String),

    #[error("Unknown version [{0}]")]
    UnknownVersion(String),

    #[error("Version manifest for [{version}] is incomplete; missing downloads:{artifact}:url entry")]
    MissingDownloadInfo { version: String, artifact: String },

    // ── Property lists ──────────────────────────────────
    #[error("Expected top level array in {which}, found {found} instead")]
    NotAnArray { which: String, found: String },

    // ── Worlds ──────────────────────────────────────────
    #[error("Invalid world name: {0:?}")]
    InvalidWorldName(String),

    #[error("World already exists: {0}")]
    WorldAlreadyExists(String),

    // ── Archive ─────────────────────────────────────────
    #[error("Zip extraction error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("No textures matched in client jar for version [{0}]")]
    NoTexturesFound(String),

    // ── Setup ───────────────────────────────────────────
    #[error("Working directory {0:?} is not initialized; run 'mcadmin init'")]
    NotInitialized(PathBuf),
}

/// Convenience alias used throughout the crate.
pub type AdminResult<T> = Result<T, AdminError>;

impl AdminError {
    pub fn kind(&self) -> FailureKind {
        match self {
            AdminError::Io { .. }
            | AdminError::CacheReadFailed { .. }
            | AdminError::WriteFailed { .. }
            | AdminError::NotADirectory(_)
            | AdminError::PurgeFailed { .. } => FailureKind::Filesystem,
            AdminError::Http(_)
            | AdminError::FetchFailed { .. }
            | AdminError::DownloadFailed { .. } => FailureKind::Network,
            AdminError::Json(_) | AdminError::Zip(_) => FailureKind::Parse,
            AdminError::IncompleteManifest(_)
            | AdminError::UnknownVersion(_)
            | AdminError::MissingDownloadInfo { .. }
            | AdminError::NotAnArray { .. }
            | AdminError::InvalidWorldName(_)
            | AdminError::WorldAlreadyExists(_)
            | AdminError::NoTexturesFound(_)
            | AdminError::NotInitialized(_) => FailureKind::Validation,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AdminError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<std::io::Error> for AdminError {
    fn from(source: std::io::Error) -> Self {
        AdminError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        let fetch = AdminError::FetchFailed {
            url: "https://example.com".into(),
            status: 404,
        };
        assert_eq!(fetch.kind(), FailureKind::Network);

        let missing = AdminError::MissingDownloadInfo {
            version: "1.20.1".into(),
            artifact: "server".into(),
        };
        assert_eq!(missing.kind(), FailureKind::Validation);
        assert!(missing.to_string().contains("downloads:server:url"));

        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(AdminError::from(json).kind(), FailureKind::Parse);
    }

    #[test]
    fn purge_failure_lists_every_failure() {
        let err = AdminError::PurgeFailed {
            version: "1.20.1".into(),
            failures: vec!["client.jar: denied".into(), "textures: busy".into()],
        };
        assert_eq!(err.kind(), FailureKind::Filesystem);
        assert_eq!(
            err.to_string(),
            "Purge of version [1.20.1] incomplete: client.jar: denied; textures: busy"
        );
    }
}
