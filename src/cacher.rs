//! Cacher Facade
//!
//! Typed front door for applications: values go through the configured
//! [`Coder`] on the way in and out of the byte-level [`Cache`] contract.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cache::Cache;
use crate::coder::Coder;
use crate::config::{CacheConfig, CacheType};
use crate::error::Result;
use crate::factory::BackendRegistry;

/// A cache backend paired with the coder from its configuration.
#[derive(Clone)]
pub struct Cacher {
    cache: Arc<dyn Cache>,
    coder: Arc<dyn Coder>,
}

impl Cacher {
    pub fn new(cache: Arc<dyn Cache>, coder: Arc<dyn Coder>) -> Self {
        Self { cache, coder }
    }

    /// Builds the configured backend through the default registry.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        Self::from_registry(&BackendRegistry::default(), config)
    }

    pub fn from_registry(registry: &BackendRegistry, config: &CacheConfig) -> Result<Self> {
        Ok(Self::new(registry.build(config)?, Arc::clone(config.coder())))
    }

    /// The byte-level contract underneath.
    pub fn raw(&self) -> &Arc<dyn Cache> {
        &self.cache
    }

    pub fn cache_type(&self) -> CacheType {
        self.cache.cache_type()
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        Ok(self.get_with_ttl(key).await?.1)
    }

    /// Remaining TTL and decoded value; `(0, None)` on a miss.
    pub async fn get_with_ttl<T: DeserializeOwned>(&self, key: &str) -> Result<(u64, Option<T>)> {
        let (ttl, payload) = self.cache.get_with_ttl(key).await?;
        match payload {
            Some(bytes) => {
                let value = serde_json::from_value(self.coder.decode(&bytes)?)?;
                Ok((ttl, Some(value)))
            }
            None => Ok((0, None)),
        }
    }

    pub async fn set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        expire: Option<i64>,
    ) -> Result<()> {
        let payload = self.coder.encode(&serde_json::to_value(value)?)?;
        self.cache.set(key, payload, expire).await
    }

    pub async fn clear(&self, namespace: Option<&str>, key: Option<&str>) -> Result<u64> {
        self.cache.clear(namespace, key).await
    }
}

impl std::fmt::Debug for Cacher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cacher")
            .field("backend", &self.cache.cache_type())
            .field("coder", &self.coder.name())
            .finish()
    }
}
