//! Memory Store Module
//!
//! HashMap storage with LRU tracking and lazy TTL expiration. Keys here are
//! already fully scoped (`{app_space}:...`); scoping lives in `SimpleCache`.

use std::collections::HashMap;
use std::time::Duration;

use bytes::Bytes;
use tokio::time::Instant;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, TtlLookup};

use super::lru::LruTracker;

// == Memory Store ==
/// Backing table of the in-process cache.
///
/// Every method takes the current instant so one caller-held lock covers
/// the whole read-modify-write of an operation.
#[derive(Debug)]
pub struct MemoryStore {
    /// Stored entries by scoped key
    entries: HashMap<String, CacheEntry>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries, 0 = unbounded
    max_entries: usize,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store holding at most `max_entries` (0 = unbounded).
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries,
        }
    }

    // == Lookup ==
    /// Reads `key`, dropping it if expired.
    ///
    /// With `sliding`, a live entry's lifetime restarts at `now` before the
    /// remaining TTL is computed.
    pub fn lookup(&mut self, key: &str, sliding: bool, now: Instant) -> TtlLookup {
        let Some(entry) = self.entries.get_mut(key) else {
            self.stats.record_miss();
            return (0, None);
        };

        if entry.is_expired(now) {
            self.drop_entry(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            debug!(key, "expired entry dropped on read");
            return (0, None);
        }

        if sliding {
            entry.refresh(now);
        }
        let found = (entry.ttl_remaining(now), Some(entry.value.clone()));

        self.stats.record_hit();
        self.lru.touch(key);
        found
    }

    // == Insert ==
    /// Stores `value` under `key` for `ttl`, replacing any previous entry.
    ///
    /// A new key arriving at capacity first purges expired entries, then
    /// evicts the least recently used one. The capacity and recency order
    /// belong to the store, so on a shared store an insert from one app
    /// space can evict another app space's entry.
    ///
    /// # Arguments
    /// * `key` - Fully scoped key (`{app_space}:...`)
    /// * `value` - Payload to store
    /// * `ttl` - Lifetime from `now`, clamped to [`MAX_LIFETIME`](crate::cache::MAX_LIFETIME)
    /// * `now` - Current instant, taken once per operation
    pub fn insert(&mut self, key: String, value: Bytes, ttl: Duration, now: Instant) {
        let entry = CacheEntry::new(value, ttl, now);
        let is_overwrite = self.entries.contains_key(&key);

        if !is_overwrite && self.max_entries > 0 && self.entries.len() >= self.max_entries {
            self.purge_expired(now);
            if self.entries.len() >= self.max_entries {
                if let Some(evicted) = self.lru.evict_oldest() {
                    self.entries.remove(&evicted);
                    self.stats.record_eviction();
                    debug!(key = %evicted, "evicted least recently used entry");
                }
            }
        }

        self.entries.insert(key.clone(), entry);
        self.lru.touch(&key);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Remove ==
    /// Removes `key`; returns true only if it was live.
    pub fn remove(&mut self, key: &str, now: Instant) -> bool {
        match self.drop_entry(key) {
            Some(entry) => !entry.is_expired(now),
            None => false,
        }
    }

    // == Remove Prefix ==
    /// Removes every key starting with `prefix`; returns the live count.
    pub fn remove_prefix(&mut self, prefix: &str, now: Instant) -> u64 {
        let mut live = 0;
        self.entries.retain(|key, entry| {
            if !key.starts_with(prefix) {
                return true;
            }
            if !entry.is_expired(now) {
                live += 1;
            }
            false
        });
        self.lru.retain(|key| !key.starts_with(prefix));
        self.stats.set_total_entries(self.entries.len());
        live
    }

    // == Cleanup Expired ==
    /// Removes all expired entries; returns how many were removed.
    pub fn purge_expired(&mut self, now: Instant) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.drop_entry(key);
        }

        self.stats.record_expirations(expired.len());
        expired.len()
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Number of held entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn drop_entry(&mut self, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;
        self.lru.remove(key);
        self.stats.set_total_entries(self.entries.len());
        Some(entry)
    }
}
