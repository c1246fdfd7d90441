//! Moka in-memory cache implementation
//!
//! Thread-safe in-memory store with a TTL per entry. Suitable as the
//! default backing store when a single process owns the active failure.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, Instant},
};

use application::{
    error::ApplicationError,
    ports::{CachePort, CacheStats},
};
use async_trait::async_trait;
use moka::{Expiry, future::Cache};
use tracing::{debug, instrument};

/// Default maximum number of entries
const DEFAULT_MAX_ENTRIES: u64 = 1_000;

/// Configuration for Moka cache
#[derive(Debug, Clone, Copy)]
pub struct MokaCacheConfig {
    /// Maximum number of entries held at once
    pub max_entries: u64,
}

impl Default for MokaCacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

/// Stored bytes together with the TTL they were written with
#[derive(Debug, Clone)]
struct Entry {
    bytes: Vec<u8>,
    ttl: Duration,
}

/// Expires each entry after the TTL it was last written with
struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &Entry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Moka-based in-memory cache
///
/// Unlike a cache-wide `time_to_live`, every `set_bytes` call sets the
/// lifetime of that entry, and overwriting a key restarts its clock.
pub struct MokaCache {
    cache: Cache<String, Entry>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl std::fmt::Debug for MokaCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaCache")
            .field("entries", &self.cache.entry_count())
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish()
    }
}

impl MokaCache {
    /// Create a new Moka cache with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MokaCacheConfig::default())
    }

    /// Create a new Moka cache with custom configuration
    #[must_use]
    pub fn with_config(config: MokaCacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_entries)
            .expire_after(PerEntryTtl)
            .build();

        Self {
            cache,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }
}

impl Default for MokaCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CachePort for MokaCache {
    #[instrument(skip(self), level = "debug")]
    #[allow(clippy::option_if_let_else)]
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, ApplicationError> {
        if let Some(entry) = self.cache.get(key).await {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, "Cache hit");
            Ok(Some(entry.bytes))
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!(key = %key, "Cache miss");
            Ok(None)
        }
    }

    #[instrument(skip(self, value), level = "debug")]
    async fn set_bytes(
        &self,
        key: &str,
        value: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), ApplicationError> {
        self.cache
            .insert(key.to_string(), Entry { bytes: value, ttl })
            .await;
        debug!(key = %key, ttl_secs = ttl.as_secs(), "Cache set");
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    async fn invalidate(&self, key: &str) -> Result<(), ApplicationError> {
        self.cache.invalidate(key).await;
        debug!(key = %key, "Cache invalidated");
        Ok(())
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.cache.entry_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use application::ports::CachePortExt;
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestData {
        value: String,
        count: i32,
    }

    #[tokio::test]
    async fn set_and_get_value() {
        let cache = MokaCache::new();
        let data = TestData {
            value: "hello".to_string(),
            count: 42,
        };

        cache
            .set("test_key", &data, Duration::from_secs(60))
            .await
            .unwrap();

        let retrieved: Option<TestData> = cache.get("test_key").await.unwrap();
        assert_eq!(retrieved, Some(data));
    }

    #[tokio::test]
    async fn get_nonexistent_returns_none() {
        let cache = MokaCache::new();
        let result: Option<TestData> = cache.get("nonexistent").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn invalidate_removes_entry() {
        let cache = MokaCache::new();
        cache
            .set("key", &"value".to_string(), Duration::from_secs(60))
            .await
            .unwrap();

        cache.invalidate("key").await.unwrap();

        let result: Option<String> = cache.get("key").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn invalidate_missing_key_is_ok() {
        let cache = MokaCache::new();
        assert!(cache.invalidate("missing").await.is_ok());
    }

    #[tokio::test]
    async fn entry_expires_after_its_own_ttl() {
        let cache = MokaCache::new();
        cache
            .set_bytes("short", b"a".to_vec(), Duration::from_millis(50))
            .await
            .unwrap();
        cache
            .set_bytes("long", b"b".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(cache.get_bytes("short").await.unwrap(), None);
        assert_eq!(cache.get_bytes("long").await.unwrap(), Some(b"b".to_vec()));
    }

    #[tokio::test]
    async fn overwrite_replaces_ttl() {
        let cache = MokaCache::new();
        cache
            .set_bytes("key", b"old".to_vec(), Duration::from_millis(50))
            .await
            .unwrap();
        cache
            .set_bytes("key", b"new".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(cache.get_bytes("key").await.unwrap(), Some(b"new".to_vec()));
    }

    #[tokio::test]
    async fn stats_tracks_hits_and_misses() {
        let cache = MokaCache::new();
        cache
            .set("key", &"value".to_string(), Duration::from_secs(60))
            .await
            .unwrap();

        // One hit
        let _: Option<String> = cache.get("key").await.unwrap();
        // Two misses
        let _: Option<String> = cache.get("missing1").await.unwrap();
        let _: Option<String> = cache.get("missing2").await.unwrap();

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
    }

    #[tokio::test]
    async fn stats_shows_entry_count() {
        let cache = MokaCache::new();
        cache.set("key1", &1, Duration::from_secs(60)).await.unwrap();
        cache.set("key2", &2, Duration::from_secs(60)).await.unwrap();

        // Run pending tasks to ensure entries are counted
        cache.cache.run_pending_tasks().await;

        assert_eq!(cache.stats().entries, 2);
    }

    #[test]
    fn default_config_values() {
        assert_eq!(MokaCacheConfig::default().max_entries, 1_000);
    }

    #[test]
    fn moka_cache_debug() {
        let cache = MokaCache::new();
        let debug = format!("{cache:?}");
        assert!(debug.contains("MokaCache"));
        assert!(debug.contains("entries"));
        assert!(debug.contains("hits"));
    }

    #[test]
    fn moka_cache_default() {
        let stats = MokaCache::default().stats();
        assert_eq!(stats.entries, 0);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
    }
}
