pub mod artifacts;
pub mod manifest;
pub mod textures;

pub use artifacts::{ArtifactKind, VersionArtifacts, VersionJson};
pub use manifest::{parse_release, parse_snapshot, Channel, VersionEntry, VersionManifest, VersionTuple};
