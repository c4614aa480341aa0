//! Cache Contract
//!
//! The operation set every backend implements, whatever its storage medium.

use async_trait::async_trait;
use bytes::Bytes;

use crate::config::CacheType;
use crate::error::Result;

/// Result of a TTL-aware lookup: remaining whole seconds and the payload.
///
/// A miss (absent or expired key) is always `(0, None)`.
pub type TtlLookup = (u64, Option<Bytes>);

// == Cache Trait ==
/// Uniform async cache interface.
///
/// Shared rules for every implementation:
/// - TTLs are whole seconds, and a live entry never reports less than 1.
/// - A missing key and an expired key look the same to callers, and
///   neither is an error.
/// - With sliding expiration enabled, every live read resets the entry to
///   its original duration, and the reported TTL is the reset value.
/// - Keys are stored under the configured `app_space` (see
///   [`KeySpace`](crate::cache::KeySpace)), so isolation survives restarts.
/// - Backend failures surface as
///   [`CacheError::BackendUnavailable`](crate::error::CacheError) without
///   retries.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Returns the remaining TTL and payload for `key`.
    ///
    /// When sliding expiration is on, the read and the reset happen as one
    /// atomic step with respect to other operations on the same key.
    async fn get_with_ttl(&self, key: &str) -> Result<TtlLookup>;

    /// Returns the payload for `key`, applying the same expiry decision
    /// (and sliding reset) as [`Cache::get_with_ttl`].
    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        let (_, value) = self.get_with_ttl(key).await?;
        Ok(value)
    }

    /// Stores `value` under `key`, replacing any existing entry.
    ///
    /// `expire` is resolved by [`Expiry::resolve`](crate::cache::Expiry::resolve):
    /// `None` applies the configured `default_timeout`, and zero or negative
    /// values expire immediately, removing any previous entry.
    async fn set(&self, key: &str, value: Bytes, expire: Option<i64>) -> Result<()>;

    /// Removes entries and returns how many live entries were removed.
    ///
    /// - `key` set: removes that key (under `namespace` if given). Returns 0 or 1.
    /// - only `namespace` set: removes every key under the namespace.
    /// - neither: removes everything in this instance's `app_space`.
    ///
    /// Entries of other app spaces are never touched. A backend that cannot
    /// enumerate keys must flush its whole instance for namespace clears,
    /// log the flush at `warn`, and document it. It must not silently skip.
    ///
    /// # Arguments
    /// * `namespace` - Optional namespace, as used with [`namespaced`](crate::cache::namespaced)
    /// * `key` - Optional key within `namespace` (or the app space root)
    ///
    /// # Returns
    /// The number of live entries removed. Expired entries swept along the
    /// way are not counted, so clearing twice returns 0 the second time.
    ///
    /// # Example
    /// ```ignore
    /// cache.set(&namespaced("users", "42"), payload, None).await?;
    /// assert_eq!(cache.clear(Some("users"), None).await?, 1);
    /// assert_eq!(cache.clear(None, None).await?, 0);
    /// ```
    async fn clear(&self, namespace: Option<&str>, key: Option<&str>) -> Result<u64>;

    /// The backend variant behind this cache.
    fn cache_type(&self) -> CacheType;
}
