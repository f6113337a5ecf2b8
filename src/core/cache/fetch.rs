use std::time::Duration;

use chrono::Utc;
use tracing::debug;

use crate::core::error::AdminResult;
use crate::core::http::{fetch_bytes, Transport};

use super::FileCache;

/// When a cached entry may be served instead of hitting the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Serve any cached entry.
    Cached,
    /// Always refetch.
    Refresh,
    /// Serve the cached entry only if it is younger than the given age.
    MaxAge(Duration),
}

impl Freshness {
    pub fn from_max_age(max_age: Option<Duration>) -> Self {
        max_age.map_or(Freshness::Cached, Freshness::MaxAge)
    }
}

/// Return the bytes for `key`, fetching `url` when a refresh is forced or
/// nothing is cached yet.
pub async fn get_or_cache(
    transport: &dyn Transport,
    cache: &FileCache,
    url: &str,
    key: &str,
    force_refresh: bool,
) -> AdminResult<Vec<u8>> {
    let freshness = if force_refresh {
        Freshness::Refresh
    } else {
        Freshness::Cached
    };
    get_or_cache_with(transport, cache, url, key, freshness).await
}

pub async fn get_or_cache_with(
    transport: &dyn Transport,
    cache: &FileCache,
    url: &str,
    key: &str,
    freshness: Freshness,
) -> AdminResult<Vec<u8>> {
    debug!("Get url [{}] and cache as [{}]", url, key);

    let refresh = match freshness {
        Freshness::Refresh => {
            debug!("Caller forced cache refresh");
            true
        }
        _ if !cache.is_cached(key) => true,
        Freshness::MaxAge(max_age) => is_expired(cache, key, max_age),
        Freshness::Cached => false,
    };

    if !refresh {
        debug!("From cache [{}]", key);
        return cache.load(key).await;
    }

    let content = fetch_bytes(transport, url).await?;
    cache.save(key, &content).await?;
    Ok(content)
}

fn is_expired(cache: &FileCache, key: &str, max_age: Duration) -> bool {
    let Some(stored_at) = cache.timestamp(key) else {
        return true;
    };
    let age = Utc::now().signed_duration_since(stored_at);
    let expired = age.num_seconds() > i64::try_from(max_age.as_secs()).unwrap_or(i64::MAX);
    if expired {
        debug!("Cache entry [{}] is {}s old, refreshing", key, age.num_seconds());
    }
    expired
}
