//! In-process backend.
//!
//! `SimpleCache` wraps a [`MemoryStore`] behind one async mutex. Each
//! operation runs as a single critical section, so a sliding reset and the
//! value it returns always come from the same read.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::cache::{Cache, CacheStats, Expiry, KeySpace, MemoryStore, TtlLookup};
use crate::config::{BackendSettings, CacheConfig, CacheType, DEFAULT_SIMPLE_THRESHOLD};
use crate::error::Result;

/// In-process cache backend.
///
/// Cloning yields another handle to the same store. Separate instances
/// never share a store unless built with [`SimpleCache::with_shared_store`].
#[derive(Debug, Clone)]
pub struct SimpleCache {
    store: Arc<Mutex<MemoryStore>>,
    keys: KeySpace,
    default_timeout: u64,
    sliding: bool,
}

impl SimpleCache {
    /// Creates a cache with a private store.
    ///
    /// Capacity comes from `simple_cache_threshold`; configs for other
    /// backends get the default threshold, which lets tests stand this
    /// backend in for a remote one.
    pub fn new(config: &CacheConfig) -> Self {
        let threshold = match config.backend() {
            BackendSettings::Simple(simple) => simple.threshold,
            _ => DEFAULT_SIMPLE_THRESHOLD,
        };
        Self::with_store(config, Arc::new(Mutex::new(MemoryStore::new(threshold))))
    }

    /// Creates a cache for `config` that uses `other`'s store.
    ///
    /// The two caches still only see their own `app_space` for reads and
    /// clears. Capacity is not partitioned: the store keeps `other`'s
    /// threshold and one LRU order, so a `set` through either cache can evict
    /// the least recently used entry of the other app space.
    pub fn with_shared_store(config: &CacheConfig, other: &SimpleCache) -> Self {
        Self::with_store(config, Arc::clone(&other.store))
    }

    fn with_store(config: &CacheConfig, store: Arc<Mutex<MemoryStore>>) -> Self {
        Self {
            store,
            keys: KeySpace::new(config.app_space()),
            default_timeout: config.default_timeout(),
            sliding: config.sliding_expiration(),
        }
    }

    pub fn key_space(&self) -> &KeySpace {
        &self.keys
    }

    /// Snapshot of the store's counters (shared by every app space on it).
    pub async fn stats(&self) -> CacheStats {
        self.store.lock().await.stats()
    }

    /// Removes expired entries from the store; returns how many.
    pub async fn purge_expired(&self) -> usize {
        self.store.lock().await.purge_expired(Instant::now())
    }

    /// Entries held by the store, including expired ones not yet purged.
    pub async fn len(&self) -> usize {
        self.store.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.lock().await.is_empty()
    }
}

#[async_trait]
impl Cache for SimpleCache {
    async fn get_with_ttl(&self, key: &str) -> Result<TtlLookup> {
        let stored = self.keys.entry_key(None, key);
        let mut store = self.store.lock().await;
        Ok(store.lookup(&stored, self.sliding, Instant::now()))
    }

    async fn set(&self, key: &str, value: Bytes, expire: Option<i64>) -> Result<()> {
        let stored = self.keys.entry_key(None, key);
        let mut store = self.store.lock().await;

        match Expiry::resolve(expire, self.default_timeout).as_duration() {
            Some(ttl) => {
                debug!(key = %stored, ttl_secs = ttl.as_secs(), "set");
                store.insert(stored, value, ttl, Instant::now());
            }
            None => {
                debug!(key = %stored, "set with non-positive expire, entry removed");
                store.remove(&stored, Instant::now());
            }
        }
        Ok(())
    }

    async fn clear(&self, namespace: Option<&str>, key: Option<&str>) -> Result<u64> {
        let now = Instant::now();
        let mut store = self.store.lock().await;

        let removed = match (namespace, key) {
            (ns, Some(key)) => u64::from(store.remove(&self.keys.entry_key(ns, key), now)),
            (Some(ns), None) => store.remove_prefix(&self.keys.namespace_prefix(ns), now),
            (None, None) => {
                let removed = store.remove_prefix(&self.keys.prefix(), now);
                warn!(
                    app_space = self.keys.app_space(),
                    removed, "cleared entire app space"
                );
                removed
            }
        };

        debug!(?namespace, ?key, removed, "clear");
        Ok(removed)
    }

    fn cache_type(&self) -> CacheType {
        CacheType::Simple
    }
}
