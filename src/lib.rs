//! cachefront - a uniform async caching facade
//!
//! One [`Cache`] contract for get/set/clear, backed by an in-process store
//! or by externally supplied drivers, selected through a validated
//! [`CacheConfig`].

pub mod cache;
pub mod cacher;
pub mod coder;
pub mod config;
pub mod error;
pub mod factory;
pub mod tasks;

pub use cache::{namespaced, Cache, SimpleCache, TtlLookup, MAX_LIFETIME};
pub use cacher::Cacher;
pub use coder::{Coder, JsonCoder};
pub use config::{
    CacheConfig, CacheSettings, CacheType, ONE_DAY, ONE_HOUR, ONE_MONTH, ONE_WEEK, ONE_YEAR,
};
pub use error::{CacheError, Result};
pub use factory::{BackendRegistry, CacheFactory};
pub use tasks::spawn_cleanup_task;
