//! Backend Factory Module
//!
//! Turns a validated [`CacheConfig`] into a live [`Cache`]. The in-process
//! backend is built in; drivers for remote backends register their own
//! [`CacheFactory`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::info;

use crate::cache::{Cache, SimpleCache};
use crate::config::{CacheConfig, CacheType};
use crate::error::{CacheError, Result};

// == Factory Trait ==
/// Builds one backend from a validated configuration.
///
/// The returned cache owns its connections until dropped. Implementations
/// should document their I/O timeout and retry policy.
pub trait CacheFactory: Send + Sync {
    fn create(&self, config: &CacheConfig) -> Result<Arc<dyn Cache>>;
}

impl<F> CacheFactory for F
where
    F: Fn(&CacheConfig) -> Result<Arc<dyn Cache>> + Send + Sync,
{
    fn create(&self, config: &CacheConfig) -> Result<Arc<dyn Cache>> {
        self(config)
    }
}

/// Factory for the in-process [`SimpleCache`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleCacheFactory;

impl CacheFactory for SimpleCacheFactory {
    fn create(&self, config: &CacheConfig) -> Result<Arc<dyn Cache>> {
        Ok(Arc::new(SimpleCache::new(config)))
    }
}

// == Registry ==
/// Maps each [`CacheType`] to the factory that builds it.
pub struct BackendRegistry {
    factories: HashMap<CacheType, Box<dyn CacheFactory>>,
}

impl BackendRegistry {
    /// Registry with no factories at all.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Installs `factory` for `cache_type`, replacing any previous one.
    pub fn register(&mut self, cache_type: CacheType, factory: impl CacheFactory + 'static) {
        self.factories.insert(cache_type, Box::new(factory));
    }

    pub fn with(mut self, cache_type: CacheType, factory: impl CacheFactory + 'static) -> Self {
        self.register(cache_type, factory);
        self
    }

    pub fn supports(&self, cache_type: CacheType) -> bool {
        self.factories.contains_key(&cache_type)
    }

    /// Builds the backend selected by `config`.
    ///
    /// Fails with `BackendUnavailable` when no factory is registered for the
    /// configured type, or with whatever the factory reports.
    pub fn build(&self, config: &CacheConfig) -> Result<Arc<dyn Cache>> {
        let cache_type = config.cache_type();
        let factory = self.factories.get(&cache_type).ok_or_else(|| {
            CacheError::unavailable(cache_type, "no driver registered for this backend")
        })?;

        let cache = factory.create(config)?;
        info!(
            backend = %cache_type,
            app_space = config.app_space(),
            sliding = config.sliding_expiration(),
            "Cache backend ready"
        );
        Ok(cache)
    }
}

impl Default for BackendRegistry {
    /// Registry with the in-process backend installed.
    fn default() -> Self {
        Self::empty().with(CacheType::Simple, SimpleCacheFactory)
    }
}

impl fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut registered: Vec<_> = self.factories.keys().map(CacheType::as_str).collect();
        registered.sort_unstable();
        f.debug_struct("BackendRegistry")
            .field("registered", &registered)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheSettings;

    fn memcache_config() -> CacheConfig {
        CacheSettings {
            memcache_host: Some("127.0.0.1".to_string()),
            ..CacheSettings::new(CacheType::Memcache)
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn test_default_registry_builds_simple_cache() {
        let registry = BackendRegistry::default();
        let cache = registry.build(&CacheConfig::default()).unwrap();
        assert_eq!(cache.cache_type(), CacheType::Simple);
        assert!(registry.supports(CacheType::Simple));
        assert!(!registry.supports(CacheType::Redis));
    }

    #[test]
    fn test_missing_driver_is_backend_unavailable() {
        let err = BackendRegistry::default()
            .build(&memcache_config())
            .err()
            .expect("memcache has no default driver");
        assert!(matches!(
            err,
            CacheError::BackendUnavailable {
                backend: CacheType::Memcache,
                ..
            }
        ));
    }

    #[test]
    fn test_registered_closure_factory_is_used() {
        let registry = BackendRegistry::default().with(
            CacheType::Memcache,
            |config: &CacheConfig| -> Result<Arc<dyn Cache>> {
                Ok(Arc::new(SimpleCache::new(config)))
            },
        );
        assert!(registry.build(&memcache_config()).is_ok());
    }

    #[test]
    fn test_factory_errors_propagate_unmodified() {
        let registry = BackendRegistry::empty().with(
            CacheType::Memcache,
            |_: &CacheConfig| -> Result<Arc<dyn Cache>> {
                Err(CacheError::unavailable(CacheType::Memcache, "connection refused"))
            },
        );
        let Err(err) = registry.build(&memcache_config()) else {
            panic!("factory error should reach the caller");
        };
        assert_eq!(
            err.to_string(),
            "Backend MemCache unavailable: connection refused"
        );
    }

    #[test]
    fn test_registry_debug_lists_backends() {
        let rendered = format!("{:?}", BackendRegistry::default());
        assert!(rendered.contains("SimpleCache"));
    }
}
