//! Configuration Module
//!
//! Two-phase configuration for selecting and validating a cache backend.
//! [`CacheSettings`] is a plain field set that can be filled from literals,
//! a serde source, or environment variables. [`CacheSettings::validate`]
//! turns it into an immutable [`CacheConfig`] or fails with
//! [`CacheError::InvalidConfiguration`]. No I/O happens here.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cache::SEPARATOR;
use crate::coder::{Coder, JsonCoder};
use crate::error::{CacheError, Result};

// == Duration Presets ==
/// One hour, in seconds.
pub const ONE_HOUR: u64 = 3600;
/// One day, in seconds.
pub const ONE_DAY: u64 = ONE_HOUR * 24;
/// One week, in seconds.
pub const ONE_WEEK: u64 = ONE_DAY * 7;
/// Thirty days, in seconds.
pub const ONE_MONTH: u64 = ONE_DAY * 30;
/// 365 days, in seconds.
pub const ONE_YEAR: u64 = ONE_DAY * 365;

// == Defaults ==
pub const DEFAULT_TIMEOUT: u64 = 300;
pub const DEFAULT_APP_SPACE: &str = "cachefront";
pub const DEFAULT_SIMPLE_THRESHOLD: usize = 100;
pub const DEFAULT_REDIS_PORT: u16 = 6379;
pub const DEFAULT_MONGO_DATABASE: &str = "cachefront";
pub const DEFAULT_MONGO_COLLECTION: &str = "cache";
pub const DEFAULT_MEMCACHE_PORT: u16 = 11211;
pub const DEFAULT_MEMCACHE_THRESHOLD: usize = 100;

// == Cache Type ==
/// The closed set of supported backends.
///
/// The external names (`SimpleCache`, `RedisCache`, `MongoCache`, `MemCache`)
/// are the stable configuration surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CacheType {
    /// In-process table owned by the cache instance
    #[default]
    #[serde(rename = "SimpleCache")]
    Simple,
    /// Redis-like key/value server
    #[serde(rename = "RedisCache")]
    Redis,
    /// Document-store collection
    #[serde(rename = "MongoCache")]
    Mongo,
    /// Memcache-like server
    #[serde(rename = "MemCache")]
    Memcache,
}

impl CacheType {
    /// Every supported backend, in declaration order.
    pub const ALL: [CacheType; 4] = [
        CacheType::Simple,
        CacheType::Redis,
        CacheType::Mongo,
        CacheType::Memcache,
    ];

    /// External name used in configuration sources.
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheType::Simple => "SimpleCache",
            CacheType::Redis => "RedisCache",
            CacheType::Mongo => "MongoCache",
            CacheType::Memcache => "MemCache",
        }
    }

    /// Comma-separated list of the supported external names.
    pub fn supported() -> String {
        Self::ALL
            .iter()
            .map(CacheType::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for CacheType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheType {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| {
                CacheError::invalid_config(format!(
                    "cache_type must be one of {} (got '{}')",
                    Self::supported(),
                    s
                ))
            })
    }
}

// == Raw Settings ==
/// Unvalidated configuration parameters.
///
/// Every field has a default, so sources only need to supply what they
/// change. Call [`CacheSettings::validate`] to obtain a [`CacheConfig`].
/// `Debug` output redacts connection URLs and passwords.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// External backend name, checked during validation
    pub cache_type: String,
    /// Seconds applied when `set` omits an expiration
    pub default_timeout: u64,
    /// Prefix isolating this application's keys
    pub app_space: String,
    /// Serializer used by the typed facade
    #[serde(skip)]
    pub coder: Arc<dyn Coder>,
    /// Reset an entry's TTL on every live read
    pub sliding_expiration: bool,

    pub simple_cache_threshold: usize,

    pub redis_url: Option<String>,
    pub redis_host: Option<String>,
    pub redis_port: u16,
    pub redis_password: Option<String>,
    pub redis_db: u32,

    pub mongo_url: Option<String>,
    pub mongo_database: String,
    pub mongo_collection: String,
    pub mongo_direct_connection: bool,

    pub memcache_host: Option<String>,
    pub memcache_port: u16,
    pub memcache_threshold: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            cache_type: CacheType::Simple.as_str().to_string(),
            default_timeout: DEFAULT_TIMEOUT,
            app_space: DEFAULT_APP_SPACE.to_string(),
            coder: Arc::new(JsonCoder),
            sliding_expiration: false,
            simple_cache_threshold: DEFAULT_SIMPLE_THRESHOLD,
            redis_url: None,
            redis_host: None,
            redis_port: DEFAULT_REDIS_PORT,
            redis_password: None,
            redis_db: 0,
            mongo_url: None,
            mongo_database: DEFAULT_MONGO_DATABASE.to_string(),
            mongo_collection: DEFAULT_MONGO_COLLECTION.to_string(),
            mongo_direct_connection: false,
            memcache_host: None,
            memcache_port: DEFAULT_MEMCACHE_PORT,
            memcache_threshold: DEFAULT_MEMCACHE_THRESHOLD,
        }
    }
}

impl fmt::Debug for CacheSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheSettings")
            .field("cache_type", &self.cache_type)
            .field("default_timeout", &self.default_timeout)
            .field("app_space", &self.app_space)
            .field("coder", &self.coder)
            .field("sliding_expiration", &self.sliding_expiration)
            .field("simple_cache_threshold", &self.simple_cache_threshold)
            .field("redis_url", &redacted(self.redis_url.as_deref()))
            .field("redis_host", &self.redis_host)
            .field("redis_port", &self.redis_port)
            .field("redis_password", &redacted(self.redis_password.as_deref()))
            .field("redis_db", &self.redis_db)
            .field("mongo_url", &redacted(self.mongo_url.as_deref()))
            .field("mongo_database", &self.mongo_database)
            .field("mongo_collection", &self.mongo_collection)
            .field("mongo_direct_connection", &self.mongo_direct_connection)
            .field("memcache_host", &self.memcache_host)
            .field("memcache_port", &self.memcache_port)
            .field("memcache_threshold", &self.memcache_threshold)
            .finish()
    }
}

impl CacheSettings {
    /// Creates default settings for the given backend.
    pub fn new(cache_type: CacheType) -> Self {
        Self {
            cache_type: cache_type.as_str().to_string(),
            ..Self::default()
        }
    }

    pub fn with_app_space(mut self, app_space: impl Into<String>) -> Self {
        self.app_space = app_space.into();
        self
    }

    pub fn with_default_timeout(mut self, seconds: u64) -> Self {
        self.default_timeout = seconds;
        self
    }

    pub fn with_sliding_expiration(mut self, enabled: bool) -> Self {
        self.sliding_expiration = enabled;
        self
    }

    pub fn with_coder(mut self, coder: Arc<dyn Coder>) -> Self {
        self.coder = coder;
        self
    }

    /// Loads settings from `CACHE_*` environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TYPE` - Backend name (default: SimpleCache)
    /// - `CACHE_DEFAULT_TIMEOUT` - Default expiration in seconds (default: 300)
    /// - `CACHE_APP_SPACE` - Key prefix (default: cachefront)
    /// - `CACHE_SLIDING_EXPIRATION` - `true`/`1`/`yes` to enable
    /// - `CACHE_SIMPLE_THRESHOLD` - In-process capacity (default: 100)
    /// - `CACHE_REDIS_URL`, `CACHE_REDIS_HOST`, `CACHE_REDIS_PORT`,
    ///   `CACHE_REDIS_PASSWORD`, `CACHE_REDIS_DB`
    /// - `CACHE_MONGO_URL`, `CACHE_MONGO_DATABASE`, `CACHE_MONGO_COLLECTION`,
    ///   `CACHE_MONGO_DIRECT_CONNECTION`
    /// - `CACHE_MEMCACHE_HOST`, `CACHE_MEMCACHE_PORT`, `CACHE_MEMCACHE_THRESHOLD`
    ///
    /// Unparseable numbers fall back to their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let flag = |name: &str, default: bool| {
            lookup(name)
                .map(|v| {
                    matches!(
                        v.trim().to_ascii_lowercase().as_str(),
                        "1" | "true" | "yes" | "on"
                    )
                })
                .unwrap_or(default)
        };

        Self {
            cache_type: lookup("CACHE_TYPE").unwrap_or(defaults.cache_type),
            default_timeout: parse_var(&lookup, "CACHE_DEFAULT_TIMEOUT")
                .unwrap_or(defaults.default_timeout),
            app_space: lookup("CACHE_APP_SPACE").unwrap_or(defaults.app_space),
            coder: defaults.coder,
            sliding_expiration: flag("CACHE_SLIDING_EXPIRATION", defaults.sliding_expiration),
            simple_cache_threshold: parse_var(&lookup, "CACHE_SIMPLE_THRESHOLD")
                .unwrap_or(defaults.simple_cache_threshold),
            redis_url: lookup("CACHE_REDIS_URL"),
            redis_host: lookup("CACHE_REDIS_HOST"),
            redis_port: parse_var(&lookup, "CACHE_REDIS_PORT").unwrap_or(defaults.redis_port),
            redis_password: lookup("CACHE_REDIS_PASSWORD"),
            redis_db: parse_var(&lookup, "CACHE_REDIS_DB").unwrap_or(defaults.redis_db),
            mongo_url: lookup("CACHE_MONGO_URL"),
            mongo_database: lookup("CACHE_MONGO_DATABASE").unwrap_or(defaults.mongo_database),
            mongo_collection: lookup("CACHE_MONGO_COLLECTION")
                .unwrap_or(defaults.mongo_collection),
            mongo_direct_connection: flag(
                "CACHE_MONGO_DIRECT_CONNECTION",
                defaults.mongo_direct_connection,
            ),
            memcache_host: lookup("CACHE_MEMCACHE_HOST"),
            memcache_port: parse_var(&lookup, "CACHE_MEMCACHE_PORT")
                .unwrap_or(defaults.memcache_port),
            memcache_threshold: parse_var(&lookup, "CACHE_MEMCACHE_THRESHOLD")
                .unwrap_or(defaults.memcache_threshold),
        }
    }

    // == Validate ==
    /// Checks every field and cross-field rule, producing a [`CacheConfig`].
    ///
    /// Individual fields are checked first (`cache_type`, `default_timeout`,
    /// `app_space`), then the connection parameters required by the
    /// selected backend.
    ///
    /// Beyond an unknown backend name and missing connection parameters,
    /// this also rejects a zero `default_timeout`, a blank `app_space`, and
    /// an `app_space` containing `:`. The last one is a deliberate
    /// tightening: stored keys are `{app_space}:...`, so allowing `a:b`
    /// would put its keys inside app space `a` and let a clear of `a`
    /// remove them. Names such as `my-app` or `my_app` remain valid.
    ///
    /// # Errors
    /// [`CacheError::InvalidConfiguration`] naming the offending field(s).
    pub fn validate(self) -> Result<CacheConfig> {
        let cache_type: CacheType = self.cache_type.parse()?;

        if self.default_timeout == 0 {
            return Err(CacheError::invalid_config(
                "default_timeout must be a positive number of seconds",
            ));
        }
        if is_blank(Some(self.app_space.as_str())) {
            return Err(CacheError::invalid_config("app_space must not be empty"));
        }
        if self.app_space.contains(SEPARATOR) {
            return Err(CacheError::invalid_config(format!(
                "app_space must not contain '{}'",
                SEPARATOR
            )));
        }

        let backend = match cache_type {
            CacheType::Simple => BackendSettings::Simple(SimpleSettings {
                threshold: self.simple_cache_threshold,
            }),
            CacheType::Redis => {
                let has_url = !is_blank(self.redis_url.as_deref());
                let has_credentials = !is_blank(self.redis_host.as_deref())
                    && !is_blank(self.redis_password.as_deref());
                if !has_url && !has_credentials {
                    return Err(CacheError::invalid_config(
                        "with RedisCache, either redis_url or both redis_host and \
                         redis_password must be provided",
                    ));
                }
                BackendSettings::Redis(RedisSettings {
                    url: non_blank(self.redis_url),
                    host: non_blank(self.redis_host),
                    port: self.redis_port,
                    password: non_blank(self.redis_password),
                    db: self.redis_db,
                })
            }
            CacheType::Mongo => {
                let url = non_blank(self.mongo_url).ok_or_else(|| {
                    CacheError::invalid_config("with MongoCache, mongo_url must be provided")
                })?;
                BackendSettings::Mongo(MongoSettings {
                    url,
                    database: self.mongo_database,
                    collection: self.mongo_collection,
                    direct_connection: self.mongo_direct_connection,
                })
            }
            CacheType::Memcache => {
                let host = non_blank(self.memcache_host).ok_or_else(|| {
                    CacheError::invalid_config("with MemCache, memcache_host must be provided")
                })?;
                BackendSettings::Memcache(MemcacheSettings {
                    host,
                    port: self.memcache_port,
                    threshold: self.memcache_threshold,
                })
            }
        };

        Ok(CacheConfig {
            backend,
            default_timeout: self.default_timeout,
            app_space: self.app_space,
            coder: self.coder,
            sliding_expiration: self.sliding_expiration,
        })
    }
}

fn parse_var<T, F>(lookup: &F, name: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(name).and_then(|v| v.trim().parse().ok())
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// == Backend Settings ==
/// Connection parameters for the selected backend only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendSettings {
    Simple(SimpleSettings),
    Redis(RedisSettings),
    Mongo(MongoSettings),
    Memcache(MemcacheSettings),
}

impl BackendSettings {
    pub fn cache_type(&self) -> CacheType {
        match self {
            BackendSettings::Simple(_) => CacheType::Simple,
            BackendSettings::Redis(_) => CacheType::Redis,
            BackendSettings::Mongo(_) => CacheType::Mongo,
            BackendSettings::Memcache(_) => CacheType::Memcache,
        }
    }
}

/// In-process store parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleSettings {
    /// Maximum number of live entries before LRU eviction
    pub threshold: usize,
}

/// Redis-like server parameters. Either `url` or `host` + `password` is set.
#[derive(Clone, PartialEq, Eq)]
pub struct RedisSettings {
    pub url: Option<String>,
    pub host: Option<String>,
    pub port: u16,
    pub password: Option<String>,
    pub db: u32,
}

impl fmt::Debug for RedisSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisSettings")
            .field("url", &redacted(self.url.as_deref()))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &redacted(self.password.as_deref()))
            .field("db", &self.db)
            .finish()
    }
}

/// Document-store parameters.
#[derive(Clone, PartialEq, Eq)]
pub struct MongoSettings {
    pub url: String,
    pub database: String,
    pub collection: String,
    pub direct_connection: bool,
}

impl fmt::Debug for MongoSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MongoSettings")
            .field("url", &"<redacted>")
            .field("database", &self.database)
            .field("collection", &self.collection)
            .field("direct_connection", &self.direct_connection)
            .finish()
    }
}

fn redacted(value: Option<&str>) -> Option<&'static str> {
    value.map(|_| "<redacted>")
}

/// Memcache-like server parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemcacheSettings {
    pub host: String,
    pub port: u16,
    pub threshold: usize,
}

// == Validated Config ==
/// Validated, read-only cache configuration.
///
/// Only obtainable through [`CacheSettings::validate`] (or the equivalent
/// `TryFrom`), so the backend parameters are always complete.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    backend: BackendSettings,
    default_timeout: u64,
    app_space: String,
    coder: Arc<dyn Coder>,
    sliding_expiration: bool,
}

impl CacheConfig {
    /// Validates `settings`; same as [`CacheSettings::validate`].
    pub fn new(settings: CacheSettings) -> Result<Self> {
        settings.validate()
    }

    /// Loads and validates settings from the environment.
    pub fn from_env() -> Result<Self> {
        CacheSettings::from_env().validate()
    }

    pub fn cache_type(&self) -> CacheType {
        self.backend.cache_type()
    }

    pub fn backend(&self) -> &BackendSettings {
        &self.backend
    }

    pub fn default_timeout(&self) -> u64 {
        self.default_timeout
    }

    pub fn app_space(&self) -> &str {
        &self.app_space
    }

    pub fn coder(&self) -> &Arc<dyn Coder> {
        &self.coder
    }

    pub fn sliding_expiration(&self) -> bool {
        self.sliding_expiration
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: BackendSettings::Simple(SimpleSettings {
                threshold: DEFAULT_SIMPLE_THRESHOLD,
            }),
            default_timeout: DEFAULT_TIMEOUT,
            app_space: DEFAULT_APP_SPACE.to_string(),
            coder: Arc::new(JsonCoder),
            sliding_expiration: false,
        }
    }
}

impl TryFrom<CacheSettings> for CacheConfig {
    type Error = CacheError;

    fn try_from(settings: CacheSettings) -> Result<Self> {
        settings.validate()
    }
}
