// ABOUTME: Query keys and the in-memory query cache with LRU eviction and TTL support
// ABOUTME: Includes prefix invalidation and an optional background cleanup task
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::cache::{
    DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CLEANUP_INTERVAL_SECS, QUERY_KEY_ROOT,
};
use crate::errors::AppResult;
use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, RwLock};

/// Hierarchical cache key, rendered as `weather:city:london`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    /// Build a key from segments
    #[must_use]
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Key segments in order
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// True when `prefix`'s segments lead this key's segments
    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(":"))
    }
}

/// Key builders for every weather query
pub struct WeatherQueryKeys;

impl WeatherQueryKeys {
    /// Root of every weather key
    #[must_use]
    pub fn all() -> QueryKey {
        QueryKey::new([QUERY_KEY_ROOT])
    }

    /// Single-city snapshot
    #[must_use]
    pub fn city(city: &str) -> QueryKey {
        QueryKey::new([QUERY_KEY_ROOT, "city", normalize(city).as_str()])
    }

    /// Batch of the first `limit` monitored cities
    #[must_use]
    pub fn multiple_cities(limit: usize) -> QueryKey {
        QueryKey::new([
            QUERY_KEY_ROOT.to_owned(),
            "cities".to_owned(),
            limit.to_string(),
        ])
    }

    /// Global insights aggregate
    #[must_use]
    pub fn global_insights() -> QueryKey {
        QueryKey::new([QUERY_KEY_ROOT, "global-insights"])
    }

    /// Alert assessment for a city
    #[must_use]
    pub fn alert(city: &str) -> QueryKey {
        QueryKey::new([QUERY_KEY_ROOT, "alert", normalize(city).as_str()])
    }

    /// API usage statistics
    #[must_use]
    pub fn api_stats() -> QueryKey {
        QueryKey::new([QUERY_KEY_ROOT, "stats"])
    }
}

fn normalize(city: &str) -> String {
    city.trim().to_lowercase()
}

/// Query cache configuration
#[derive(Debug, Clone)]
pub struct QueryCacheConfig {
    /// Entry ceiling before LRU eviction
    pub max_entries: usize,
    /// Interval of the background sweep
    pub cleanup_interval: Duration,
    /// Spawn the background sweep (requires a tokio runtime)
    pub enable_background_cleanup: bool,
}

impl Default for QueryCacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            cleanup_interval: Duration::from_secs(DEFAULT_CLEANUP_INTERVAL_SECS),
            enable_background_cleanup: true,
        }
    }
}

/// Cache entry with expiration
#[derive(Debug, Clone)]
struct CacheEntry {
    data: Vec<u8>,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(data: Vec<u8>, ttl: Duration) -> Self {
        Self {
            data,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

type Store = Arc<RwLock<LruCache<String, CacheEntry>>>;

/// In-memory query cache with LRU eviction and optional background cleanup
///
/// Values are stored serialized so any `Serialize` type can share one store.
/// Clones share the store; the cleanup task stops once the last clone drops.
#[derive(Clone)]
pub struct QueryCache {
    store: Store,
    _shutdown_tx: Option<Arc<mpsc::Sender<()>>>,
}

impl QueryCache {
    const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(DEFAULT_CACHE_MAX_ENTRIES) {
        Some(n) => n,
        None => NonZeroUsize::MIN,
    };

    /// Create a cache
    #[must_use]
    pub fn new(config: &QueryCacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_entries).unwrap_or(Self::DEFAULT_CAPACITY);
        let store: Store = Arc::new(RwLock::new(LruCache::new(capacity)));

        let shutdown_tx = if config.enable_background_cleanup {
            let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
            let store_clone = store.clone();
            let cleanup_interval = config.cleanup_interval;

            tokio::spawn(async move {
                let mut interval = tokio::time::interval(cleanup_interval);
                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            Self::cleanup_expired(&store_clone).await;
                        }
                        _ = shutdown_rx.recv() => {
                            tracing::debug!("Query cache cleanup task stopped");
                            break;
                        }
                    }
                }
            });

            Some(Arc::new(shutdown_tx))
        } else {
            None
        };

        Self {
            store,
            _shutdown_tx: shutdown_tx,
        }
    }

    async fn cleanup_expired(store: &Store) {
        let mut guard = store.write().await;
        let expired: Vec<String> = guard
            .iter()
            .filter(|(_, v)| v.is_expired())
            .map(|(k, _)| k.clone())
            .collect();
        for key in &expired {
            guard.pop(key);
        }
        drop(guard);
        if !expired.is_empty() {
            tracing::debug!("Cleaned up {} expired query cache entries", expired.len());
        }
    }

    /// Store a value for `ttl`
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be serialized
    pub async fn set<T: Serialize + Sync>(
        &self,
        key: &QueryKey,
        value: &T,
        ttl: Duration,
    ) -> AppResult<()> {
        let serialized = serde_json::to_vec(value)?;
        self.store
            .write()
            .await
            .push(key.to_string(), CacheEntry::new(serialized, ttl));
        Ok(())
    }

    /// Fetch a live value; expired entries are removed and read as absent
    ///
    /// # Errors
    ///
    /// Returns an error if the stored bytes do not decode as `T`
    pub async fn get<T: for<'de> Deserialize<'de>>(&self, key: &QueryKey) -> AppResult<Option<T>> {
        let key = key.to_string();
        let mut store = self.store.write().await;
        let Some(entry) = store.get(&key) else {
            return Ok(None);
        };
        if entry.is_expired() {
            store.pop(&key);
            return Ok(None);
        }
        let value = serde_json::from_slice(&entry.data)?;
        drop(store);
        Ok(Some(value))
    }

    /// Remove one key
    pub async fn invalidate(&self, key: &QueryKey) {
        self.store.write().await.pop(&key.to_string());
    }

    /// Remove every key under `prefix`, returning how many were removed
    pub async fn invalidate_prefix(&self, prefix: &QueryKey) -> usize {
        let exact = prefix.to_string();
        let nested = format!("{exact}:");
        let mut store = self.store.write().await;
        let doomed: Vec<String> = store
            .iter()
            .filter(|(k, _)| **k == exact || k.starts_with(&nested))
            .map(|(k, _)| k.clone())
            .collect();
        for key in &doomed {
            store.pop(key);
        }
        doomed.len()
    }

    /// Entries currently held, expired ones included until swept
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// True when nothing is cached
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    /// Drop everything
    pub async fn clear(&self) {
        self.store.write().await.clear();
    }
}
