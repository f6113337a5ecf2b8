// ─── Version Manifest ───
// Parses the Mojang version manifest and answers release/snapshot questions.

use std::cmp::Ordering;
use std::fmt;

use serde::Deserialize;
use tracing::{info, warn};

use crate::core::cache::{get_or_cache_with, Freshness};
use crate::core::error::{AdminError, AdminResult};
use crate::core::state::AdminState;

pub const MANIFEST_CACHE_KEY: &str = "version_manifest.json";

/// The two tracked version channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Release,
    Snapshot,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Release => write!(f, "release"),
            Channel::Snapshot => write!(f, "snapshot"),
        }
    }
}

/// Comparable version components. Only tuples of the same channel order
/// against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionTuple {
    Release { major: u32, minor: u32, revision: u32 },
    Snapshot { year: u32, week: u32, letter: char },
}

impl VersionTuple {
    pub const ZERO_RELEASE: VersionTuple = VersionTuple::Release {
        major: 0,
        minor: 0,
        revision: 0,
    };
    pub const ZERO_SNAPSHOT: VersionTuple = VersionTuple::Snapshot {
        year: 0,
        week: 0,
        letter: 'a',
    };

    fn zero(channel: Channel) -> Self {
        match channel {
            Channel::Release => Self::ZERO_RELEASE,
            Channel::Snapshot => Self::ZERO_SNAPSHOT,
        }
    }
}

impl PartialOrd for VersionTuple {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (
                VersionTuple::Release { major, minor, revision },
                VersionTuple::Release {
                    major: o_major,
                    minor: o_minor,
                    revision: o_revision,
                },
            ) => Some((major, minor, revision).cmp(&(o_major, o_minor, o_revision))),
            (
                VersionTuple::Snapshot { year, week, letter },
                VersionTuple::Snapshot {
                    year: o_year,
                    week: o_week,
                    letter: o_letter,
                },
            ) => Some((year, week, letter).cmp(&(o_year, o_week, o_letter))),
            _ => None,
        }
    }
}

/// Which component of a version tuple an update moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Component {
    Major,
    Minor,
    Revision,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LatestVersions {
    pub release: String,
    pub snapshot: String,
}

/// A single version listed in the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionEntry {
    pub id: String,
    pub url: String,
}

// Wire shape: everything optional so absences surface as
// `IncompleteManifest` instead of a generic JSON error.
#[derive(Deserialize)]
struct RawManifest {
    latest: Option<RawLatest>,
    versions: Option<Vec<RawEntry>>,
}

#[derive(Deserialize)]
struct RawLatest {
    release: Option<String>,
    snapshot: Option<String>,
}

#[derive(Deserialize)]
struct RawEntry {
    id: String,
    #[serde(rename = "type")]
    version_type: String,
    url: String,
}

/// Parsed version manifest with entries bucketed by channel.
#[derive(Debug, Clone)]
pub struct VersionManifest {
    latest: LatestVersions,
    releases: Vec<VersionEntry>,
    snapshots: Vec<VersionEntry>,
}

impl VersionManifest {
    /// Fetch (or serve from cache) and parse the manifest configured in
    /// `state`.
    pub async fn load(state: &AdminState) -> AdminResult<Self> {
        let freshness = if state.config.force_refresh {
            Freshness::Refresh
        } else {
            Freshness::from_max_age(state.settings.manifest_max_age())
        };

        let raw = get_or_cache_with(
            state.transport(),
            &state.cache,
            &state.settings.manifest_url,
            MANIFEST_CACHE_KEY,
            freshness,
        )
        .await?;

        let manifest = Self::parse(&raw)?;
        info!(
            "Loaded {} releases and {} snapshots from manifest",
            manifest.releases.len(),
            manifest.snapshots.len()
        );
        Ok(manifest)
    }

    pub fn parse(raw: &[u8]) -> AdminResult<Self> {
        let manifest: RawManifest = serde_json::from_slice(raw)?;

        let latest = match manifest.latest {
            Some(RawLatest {
                release: Some(release),
                snapshot: Some(snapshot),
            }) => LatestVersions { release, snapshot },
            _ => {
                return Err(AdminError::IncompleteManifest(
                    "missing or incomplete latest version definition".into(),
                ))
            }
        };

        let Some(entries) = manifest.versions else {
            return Err(AdminError::IncompleteManifest("no versions listed".into()));
        };

        let mut releases = Vec::new();
        let mut snapshots = Vec::new();
        for entry in entries {
            let bucket = match entry.version_type.as_str() {
                "release" => &mut releases,
                "snapshot" => &mut snapshots,
                "old_alpha" | "old_beta" => continue,
                other => {
                    warn!("Skipping version [{}] with unknown type [{}]", entry.id, other);
                    continue;
                }
            };
            insert_unique(bucket, entry.id, entry.url);
        }

        Ok(Self {
            latest,
            releases,
            snapshots,
        })
    }

    pub fn latest(&self, channel: Channel) -> &str {
        match channel {
            Channel::Release => &self.latest.release,
            Channel::Snapshot => &self.latest.snapshot,
        }
    }

    pub fn releases(&self) -> &[VersionEntry] {
        &self.releases
    }

    pub fn snapshots(&self) -> &[VersionEntry] {
        &self.snapshots
    }

    fn find(&self, version: &str) -> Option<(Channel, &VersionEntry)> {
        if let Some(entry) = self.releases.iter().find(|e| e.id == version) {
            return Some((Channel::Release, entry));
        }
        self.snapshots
            .iter()
            .find(|e| e.id == version)
            .map(|entry| (Channel::Snapshot, entry))
    }

    /// Channel of a listed version, `None` when it is in neither bucket.
    pub fn resolve_type(&self, version: &str) -> Option<Channel> {
        let channel = self.find(version).map(|(channel, _)| channel);
        if channel.is_none() {
            warn!("Cannot determine release type for unknown version [{}]", version);
        }
        channel
    }

    /// URL of the per-version manifest.
    pub fn version_url(&self, version: &str) -> Option<&str> {
        self.find(version).map(|(_, entry)| entry.url.as_str())
    }

    /// Parse a listed version into comparable components. Unknown ids and
    /// ids not matching their channel's pattern yield the zero tuple.
    pub fn parse_version(&self, version: &str) -> VersionTuple {
        let Some(channel) = self.resolve_type(version) else {
            return VersionTuple::ZERO_RELEASE;
        };

        let parsed = match channel {
            Channel::Release => parse_release(version),
            Channel::Snapshot => parse_snapshot(version),
        };

        parsed.unwrap_or_else(|| {
            warn!("Failed to parse {} version: [{}]", channel, version);
            VersionTuple::zero(channel)
        })
    }

    fn update_component(&self, version: &str) -> Option<Component> {
        let channel = self.resolve_type(version)?;
        let current = self.parse_version(version);
        let latest = self.parse_version(self.latest(channel));

        let (current, latest) = match (current, latest) {
            (
                VersionTuple::Release { major, minor, revision },
                VersionTuple::Release {
                    major: l_major,
                    minor: l_minor,
                    revision: l_revision,
                },
            ) => ((major, minor, revision as u64), (l_major, l_minor, l_revision as u64)),
            (
                VersionTuple::Snapshot { year, week, letter },
                VersionTuple::Snapshot {
                    year: l_year,
                    week: l_week,
                    letter: l_letter,
                },
            ) => ((year, week, letter as u64), (l_year, l_week, l_letter as u64)),
            // Latest id missing from its own bucket.
            _ => return None,
        };

        if current.0 < latest.0 {
            Some(Component::Major)
        } else if current.0 == latest.0 && current.1 < latest.1 {
            Some(Component::Minor)
        } else if current.0 == latest.0 && current.1 == latest.1 && current.2 < latest.2 {
            Some(Component::Revision)
        } else {
            None
        }
    }

    pub fn is_major_update(&self, version: &str) -> bool {
        self.update_component(version) == Some(Component::Major)
    }

    pub fn is_minor_update(&self, version: &str) -> bool {
        self.update_component(version) == Some(Component::Minor)
    }

    pub fn is_revision_update(&self, version: &str) -> bool {
        self.update_component(version) == Some(Component::Revision)
    }

    /// True if the latest version of the same channel is newer.
    pub fn is_update_available(&self, version: &str) -> bool {
        self.update_component(version).is_some()
    }
}

fn insert_unique(bucket: &mut Vec<VersionEntry>, id: String, url: String) {
    match bucket.iter_mut().find(|e| e.id == id) {
        Some(existing) => existing.url = url,
        None => bucket.push(VersionEntry { id, url }),
    }
}

/// Match `major.minor[.revision]`, surrounding whitespace allowed.
pub fn parse_release(version: &str) -> Option<VersionTuple> {
    let mut parts = version.trim().split('.');
    let major = parse_digits(parts.next()?)?;
    let minor = parse_digits(parts.next()?)?;
    let revision = match parts.next() {
        Some(part) => parse_digits(part)?,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }

    Some(VersionTuple::Release {
        major,
        minor,
        revision,
    })
}

/// Match `<year>w<week><letter>`, e.g. `23w45a`.
pub fn parse_snapshot(version: &str) -> Option<VersionTuple> {
    let (year, rest) = version.trim().split_once('w')?;
    let letter = rest.chars().last()?;
    if !letter.is_ascii_lowercase() {
        return None;
    }
    let week = &rest[..rest.len() - letter.len_utf8()];

    Some(VersionTuple::Snapshot {
        year: parse_digits(year)?,
        week: parse_digits(week)?,
        letter,
    })
}

fn parse_digits(part: &str) -> Option<u32> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manifest() -> VersionManifest {
        let raw = json!({
            "latest": { "release": "1.20.1", "snapshot": "23w31a" },
            "versions": [
                { "id": "23w31a", "type": "snapshot", "url": "https://example.com/23w31a.json" },
                { "id": "1.20.1", "type": "release", "url": "https://example.com/1.20.1.json" },
                { "id": "23w07b", "type": "snapshot", "url": "https://example.com/23w07b.json" },
                { "id": "1.20", "type": "release", "url": "https://example.com/1.20.json" },
                { "id": "1.19.0", "type": "release", "url": "https://example.com/1.19.0.json" },
                { "id": "1.20.0", "type": "release", "url": "https://example.com/1.20.0.json" },
                { "id": "1.20.4", "type": "release", "url": "https://example.com/1.20.4.json" },
                { "id": "0.9.5", "type": "release", "url": "https://example.com/0.9.5.json" },
                { "id": "abc", "type": "release", "url": "https://example.com/abc.json" },
                { "id": "b1.7.3", "type": "old_beta", "url": "https://example.com/b1.7.3.json" },
                { "id": "a1.0.4", "type": "old_alpha", "url": "https://example.com/a1.0.4.json" }
            ]
        });
        VersionManifest::parse(raw.to_string().as_bytes()).unwrap()
    }

    #[test]
    fn parses_buckets_and_drops_legacy_types() {
        let m = manifest();
        assert_eq!(m.latest(Channel::Release), "1.20.1");
        assert_eq!(m.latest(Channel::Snapshot), "23w31a");
        assert_eq!(m.releases().len(), 7);
        assert_eq!(m.snapshots().len(), 2);
        assert_eq!(m.resolve_type("b1.7.3"), None);
        assert_eq!(m.resolve_type("a1.0.4"), None);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = VersionManifest::parse(b"{ not json").unwrap_err();
        assert!(matches!(err, AdminError::Json(_)));
    }

    #[test]
    fn missing_sections_are_incomplete() {
        let no_snapshot = json!({ "latest": { "release": "1.20.1" }, "versions": [] });
        let no_versions = json!({ "latest": { "release": "1.20.1", "snapshot": "23w31a" } });
        let no_latest = json!({ "versions": [] });

        for raw in [no_snapshot, no_versions, no_latest] {
            let err = VersionManifest::parse(raw.to_string().as_bytes()).unwrap_err();
            assert!(matches!(err, AdminError::IncompleteManifest(_)), "{err}");
        }
    }

    #[test]
    fn repeated_id_keeps_position_and_latest_url() {
        let raw = json!({
            "latest": { "release": "1.20.1", "snapshot": "23w31a" },
            "versions": [
                { "id": "1.20.1", "type": "release", "url": "https://example.com/old.json" },
                { "id": "1.20", "type": "release", "url": "https://example.com/1.20.json" },
                { "id": "1.20.1", "type": "release", "url": "https://example.com/new.json" }
            ]
        });
        let m = VersionManifest::parse(raw.to_string().as_bytes()).unwrap();
        assert_eq!(m.releases().len(), 2);
        assert_eq!(m.releases()[0].id, "1.20.1");
        assert_eq!(m.version_url("1.20.1"), Some("https://example.com/new.json"));
    }

    #[test]
    fn resolve_type_by_bucket() {
        let m = manifest();
        assert_eq!(m.resolve_type("1.20.1"), Some(Channel::Release));
        assert_eq!(m.resolve_type("23w07b"), Some(Channel::Snapshot));
        assert_eq!(m.resolve_type("9.9.9"), None);
        assert_eq!(m.version_url("9.9.9"), None);
    }

    #[test]
    fn parse_listed_versions() {
        let m = manifest();
        assert_eq!(
            m.parse_version("1.20"),
            VersionTuple::Release { major: 1, minor: 20, revision: 0 }
        );
        assert_eq!(
            m.parse_version("1.20.4"),
            VersionTuple::Release { major: 1, minor: 20, revision: 4 }
        );
        assert_eq!(
            m.parse_version("23w07b"),
            VersionTuple::Snapshot { year: 23, week: 7, letter: 'b' }
        );
        // Listed but malformed: degraded, not an error.
        assert_eq!(m.parse_version("abc"), VersionTuple::ZERO_RELEASE);
        // Not listed at all.
        assert_eq!(m.parse_version("1.99"), VersionTuple::ZERO_RELEASE);
    }

    #[test]
    fn raw_patterns() {
        assert_eq!(
            parse_release(" 1.8.9 "),
            Some(VersionTuple::Release { major: 1, minor: 8, revision: 9 })
        );
        assert_eq!(parse_release("1"), None);
        assert_eq!(parse_release("1.2.3.4"), None);
        assert_eq!(parse_release("1.20-pre1"), None);
        assert_eq!(parse_release("1..2"), None);

        assert_eq!(
            parse_snapshot("24w14a"),
            Some(VersionTuple::Snapshot { year: 24, week: 14, letter: 'a' })
        );
        assert_eq!(parse_snapshot("24w14"), None);
        assert_eq!(parse_snapshot("24w14A"), None);
        assert_eq!(parse_snapshot("w14a"), None);
        assert_eq!(parse_snapshot("1.20.1"), None);
    }

    #[test]
    fn tuples_only_order_within_a_channel() {
        let old = parse_release("1.9.4").unwrap();
        let new = parse_release("1.10").unwrap();
        assert!(old < new);

        let a = parse_snapshot("23w07a").unwrap();
        let b = parse_snapshot("23w07b").unwrap();
        assert!(a < b);

        assert_eq!(old.partial_cmp(&a), None);
    }

    #[test]
    fn update_checks_against_latest_release() {
        let m = manifest();

        assert!(m.is_update_available("1.19.0"));
        assert!(m.is_minor_update("1.19.0"));
        assert!(!m.is_major_update("1.19.0"));

        assert!(m.is_revision_update("1.20"));
        assert!(m.is_update_available("1.20.0"));
        assert!(m.is_major_update("0.9.5"));

        assert!(!m.is_update_available("1.20.1"));
        assert!(!m.is_update_available("1.20.4"));
        assert!(!m.is_update_available("9.9.9"));
    }

    #[test]
    fn update_checks_against_latest_snapshot() {
        let m = manifest();
        assert!(m.is_update_available("23w07b"));
        assert!(m.is_minor_update("23w07b"));
        assert!(!m.is_update_available("23w31a"));
    }
}
