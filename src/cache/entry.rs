//! Cache Entry Module
//!
//! A stored payload with its original lifetime and expiration instant.

use std::time::Duration;

use bytes::Bytes;
use tokio::time::Instant;

use crate::cache::expiry::remaining_secs;

/// Longest lifetime an entry can hold; larger TTLs are clamped to it.
///
/// Matches the horizon tokio uses for its far-future instant (about 30 years).
pub const MAX_LIFETIME: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Expiration instant for `ttl` starting at `now`, clamped to [`MAX_LIFETIME`].
fn deadline(now: Instant, ttl: Duration) -> Instant {
    now.checked_add(ttl.min(MAX_LIFETIME)).unwrap_or(now)
}

// == Cache Entry ==
/// Represents a single in-process entry.
///
/// Times use `tokio::time::Instant` so a paused test clock drives expiry.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored payload
    pub value: Bytes,
    /// Lifetime granted at `set`, reapplied on sliding reads
    pub ttl: Duration,
    /// Instant at which the entry stops being live
    pub expires_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry that expires `ttl` after `now`.
    pub fn new(value: Bytes, ttl: Duration, now: Instant) -> Self {
        Self {
            value,
            ttl,
            expires_at: deadline(now, ttl),
        }
    }

    // == Is Expired ==
    /// An entry is expired once `now` reaches its expiration instant.
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    // == Time To Live ==
    /// Remaining whole seconds, rounded up; 0 when expired.
    pub fn ttl_remaining(&self, now: Instant) -> u64 {
        remaining_secs(self.expires_at.saturating_duration_since(now))
    }

    // == Refresh ==
    /// Restarts the entry's full lifetime from `now`.
    pub fn refresh(&mut self, now: Instant) {
        self.expires_at = deadline(now, self.ttl);
    }
}
