//! Error types for the cache facade
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

use crate::config::CacheType;

// == Cache Error Enum ==
/// Unified error type for configuration and cache operations.
///
/// A cache miss is never represented here; lookups return `None` instead.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Configuration rejected during construction
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Backend could not be reached or has no registered driver
    #[error("Backend {backend} unavailable: {reason}")]
    BackendUnavailable { backend: CacheType, reason: String },

    /// Payload could not be encoded or decoded
    #[error("Codec error: {0}")]
    Codec(String),
}

impl CacheError {
    /// Shorthand for an `InvalidConfiguration` error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        CacheError::InvalidConfiguration(msg.into())
    }

    /// Shorthand for a `BackendUnavailable` error.
    pub fn unavailable(backend: CacheType, reason: impl Into<String>) -> Self {
        CacheError::BackendUnavailable {
            backend,
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Codec(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache facade.
pub type Result<T> = std::result::Result<T, CacheError>;
