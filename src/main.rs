//! cachefront preflight
//!
//! Loads the cache configuration from `CACHE_*` environment variables,
//! builds the selected backend and runs a set/get/clear probe against it.
//! Exits non-zero when the configuration is invalid or the backend cannot
//! be built, so it can gate application startup.

use anyhow::{bail, Context};
use bytes::Bytes;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cachefront::{BackendRegistry, CacheConfig};

const PROBE_KEY: &str = "__cachefront_probe__";
const PROBE_TTL_SECS: i64 = 30;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cachefront=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CacheConfig::from_env().context("cache configuration rejected")?;
    info!(
        "Configuration loaded: cache_type={}, app_space={}, default_timeout={}s, sliding_expiration={}",
        config.cache_type(),
        config.app_space(),
        config.default_timeout(),
        config.sliding_expiration()
    );

    let cache = BackendRegistry::default()
        .build(&config)
        .context("cache backend could not be built")?;

    let payload = Bytes::from_static(b"ok");
    cache
        .set(PROBE_KEY, payload.clone(), Some(PROBE_TTL_SECS))
        .await
        .context("probe set failed")?;

    let (ttl, found) = cache
        .get_with_ttl(PROBE_KEY)
        .await
        .context("probe get failed")?;
    if found.as_ref() != Some(&payload) {
        bail!("probe value did not round-trip through {}", config.cache_type());
    }

    let removed = cache
        .clear(None, Some(PROBE_KEY))
        .await
        .context("probe clear failed")?;

    info!(ttl, removed, "Probe complete, cache is ready");
    Ok(())
}
