//! Integration Tests for the Cache Contract
//!
//! Exercises configuration validation and the contract through the public
//! API. Timing tests run on a paused tokio clock.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use cachefront::{
    namespaced, BackendRegistry, Cache, CacheConfig, CacheError, CacheSettings, CacheType,
    SimpleCache, MAX_LIFETIME,
};

// == Helper Functions ==

fn config(settings: CacheSettings) -> CacheConfig {
    settings.validate().expect("settings should validate")
}

fn build(settings: CacheSettings) -> Arc<dyn Cache> {
    BackendRegistry::default()
        .build(&config(settings))
        .expect("in-process backend should build")
}

fn complete_settings(cache_type: CacheType) -> CacheSettings {
    let base = CacheSettings::new(cache_type);
    match cache_type {
        CacheType::Simple => base,
        CacheType::Redis => CacheSettings {
            redis_host: Some("redis.internal".to_string()),
            redis_password: Some("hunter2".to_string()),
            ..base
        },
        CacheType::Mongo => CacheSettings {
            mongo_url: Some("mongodb://mongo.internal:27017".to_string()),
            ..base
        },
        CacheType::Memcache => CacheSettings {
            memcache_host: Some("memcache.internal".to_string()),
            ..base
        },
    }
}

fn is_invalid(result: cachefront::Result<CacheConfig>) -> bool {
    matches!(result, Err(CacheError::InvalidConfiguration(_)))
}

// == Configuration ==

#[test]
fn test_every_backend_validates_with_required_fields() {
    for cache_type in CacheType::ALL {
        let config = complete_settings(cache_type).validate().unwrap();
        assert_eq!(config.cache_type(), cache_type);
    }
}

#[test]
fn test_omitting_any_required_field_fails() {
    let redis = complete_settings(CacheType::Redis);
    assert!(is_invalid(
        CacheSettings {
            redis_host: None,
            ..redis.clone()
        }
        .validate()
    ));
    assert!(is_invalid(
        CacheSettings {
            redis_password: Some(String::new()),
            ..redis
        }
        .validate()
    ));
    assert!(is_invalid(
        CacheSettings {
            mongo_url: None,
            ..complete_settings(CacheType::Mongo)
        }
        .validate()
    ));
    assert!(is_invalid(
        CacheSettings {
            memcache_host: Some(String::new()),
            ..complete_settings(CacheType::Memcache)
        }
        .validate()
    ));
}

#[test]
fn test_bogus_cache_type_lists_supported_values() {
    let err = CacheSettings {
        cache_type: "bogus".to_string(),
        ..CacheSettings::default()
    }
    .validate()
    .unwrap_err();

    assert!(matches!(err, CacheError::InvalidConfiguration(_)));
    let msg = err.to_string();
    for name in ["SimpleCache", "RedisCache", "MongoCache", "MemCache"] {
        assert!(msg.contains(name), "{} missing from: {}", name, msg);
    }
}

#[test]
fn test_redis_without_url_host_or_password_fails() {
    assert!(is_invalid(CacheSettings::new(CacheType::Redis).validate()));
}

#[test]
fn test_redis_with_only_url_succeeds() {
    let settings = CacheSettings {
        redis_url: Some("redis://localhost:6379/0".to_string()),
        ..CacheSettings::new(CacheType::Redis)
    };
    assert_eq!(settings.validate().unwrap().cache_type(), CacheType::Redis);
}

#[test]
fn test_in_process_needs_no_connection_parameters() {
    assert!(CacheSettings::new(CacheType::Simple).validate().is_ok());
}

// == Round Trip ==

#[tokio::test]
async fn test_round_trip_preserves_bytes() {
    let cache = build(CacheSettings::default());
    let payloads: [&[u8]; 3] = [b"", b"hello", &[0, 159, 255, 10]];

    for (i, payload) in payloads.iter().enumerate() {
        let key = format!("k{}", i);
        cache
            .set(&key, Bytes::copy_from_slice(payload), None)
            .await
            .unwrap();
        assert_eq!(
            cache.get(&key).await.unwrap(),
            Some(Bytes::copy_from_slice(payload))
        );
    }
}

#[tokio::test]
async fn test_set_overwrites_last_writer_wins() {
    let cache = build(CacheSettings::default());
    cache.set("k", Bytes::from_static(b"one"), Some(100)).await.unwrap();
    cache.set("k", Bytes::from_static(b"two"), Some(50)).await.unwrap();

    assert_eq!(
        cache.get_with_ttl("k").await.unwrap(),
        (50, Some(Bytes::from_static(b"two")))
    );
}

#[tokio::test]
async fn test_miss_is_not_an_error() {
    let cache = build(CacheSettings::default());
    assert_eq!(cache.get_with_ttl("missing").await.unwrap(), (0, None));
    assert_eq!(cache.get("missing").await.unwrap(), None);
}

// == Expiration ==

#[tokio::test(start_paused = true)]
async fn test_entry_expires_after_ttl() {
    let cache = build(CacheSettings::default());
    cache.set("k", Bytes::from_static(b"v"), Some(1)).await.unwrap();
    assert_eq!(cache.get_with_ttl("k").await.unwrap().0, 1);

    tokio::time::sleep(Duration::from_millis(1_100)).await;

    assert_eq!(cache.get("k").await.unwrap(), None);
    assert_eq!(cache.get_with_ttl("k").await.unwrap(), (0, None));
}

#[tokio::test(start_paused = true)]
async fn test_omitted_expire_uses_default_timeout() {
    let cache = build(CacheSettings::default().with_default_timeout(10));
    cache.set("k", Bytes::from_static(b"v"), None).await.unwrap();

    tokio::time::sleep(Duration::from_secs(9)).await;
    assert!(cache.get("k").await.unwrap().is_some());

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(cache.get("k").await.unwrap().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_sliding_expiration_keeps_entry_alive() {
    let cache = build(CacheSettings::default().with_sliding_expiration(true));
    cache.set("k", Bytes::from_static(b"v"), Some(5)).await.unwrap();

    let mut elapsed = 0;
    while elapsed < 20 {
        tokio::time::sleep(Duration::from_secs(3)).await;
        elapsed += 3;
        assert!(
            cache.get("k").await.unwrap().is_some(),
            "entry vanished at {}s despite reads",
            elapsed
        );
    }
    assert_eq!(cache.get_with_ttl("k").await.unwrap().0, 5);
}

#[tokio::test(start_paused = true)]
async fn test_without_sliding_reads_do_not_extend() {
    let cache = build(CacheSettings::default());
    cache.set("k", Bytes::from_static(b"v"), Some(5)).await.unwrap();

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(cache.get("k").await.unwrap().is_some());

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(cache.get("k").await.unwrap().is_none());
}

#[tokio::test]
async fn test_largest_expirations_are_accepted() {
    let cache = build(CacheSettings::default());
    cache
        .set("forever", Bytes::from_static(b"v"), Some(i64::MAX))
        .await
        .unwrap();
    let (ttl, value) = cache.get_with_ttl("forever").await.unwrap();
    assert_eq!(ttl, MAX_LIFETIME.as_secs());
    assert!(value.is_some());

    let cache = build(CacheSettings::default().with_default_timeout(u64::MAX));
    cache.set("k", Bytes::from_static(b"v"), None).await.unwrap();
    assert_eq!(cache.get_with_ttl("k").await.unwrap().0, MAX_LIFETIME.as_secs());
}

// == Clear ==

#[tokio::test]
async fn test_clear_key_counts() {
    let cache = build(CacheSettings::default());
    assert_eq!(cache.clear(None, Some("k")).await.unwrap(), 0);

    cache.set("k", Bytes::from_static(b"v"), None).await.unwrap();
    assert_eq!(cache.clear(None, Some("k")).await.unwrap(), 1);
    assert_eq!(cache.get("k").await.unwrap(), None);
}

#[tokio::test]
async fn test_full_clear_is_idempotent() {
    let cache = build(CacheSettings::default());
    cache.set("a", Bytes::new(), None).await.unwrap();
    cache.set(&namespaced("ns", "b"), Bytes::new(), None).await.unwrap();

    assert_eq!(cache.clear(None, None).await.unwrap(), 2);
    assert_eq!(cache.clear(None, None).await.unwrap(), 0);
}

#[tokio::test]
async fn test_namespace_clear_only_touches_namespace() {
    let cache = build(CacheSettings::default());
    cache.set(&namespaced("users", "1"), Bytes::new(), None).await.unwrap();
    cache.set(&namespaced("users", "2"), Bytes::new(), None).await.unwrap();
    cache.set(&namespaced("usersettings", "1"), Bytes::new(), None).await.unwrap();

    assert_eq!(cache.clear(Some("users"), None).await.unwrap(), 2);
    assert!(cache
        .get(&namespaced("usersettings", "1"))
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_app_spaces_sharing_a_store_are_isolated() {
    let a = SimpleCache::new(&config(CacheSettings::default().with_app_space("A")));
    let b = SimpleCache::with_shared_store(
        &config(CacheSettings::default().with_app_space("B")),
        &a,
    );

    a.set("k", Bytes::from_static(b"from-a"), None).await.unwrap();
    assert_eq!(b.get("k").await.unwrap(), None);

    assert_eq!(b.clear(None, None).await.unwrap(), 0);
    assert_eq!(b.clear(None, Some("k")).await.unwrap(), 0);
    assert_eq!(
        a.get("k").await.unwrap(),
        Some(Bytes::from_static(b"from-a"))
    );
}

// == Concurrency ==

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_sliding_reads_stay_consistent() {
    let cache = build(CacheSettings::default().with_sliding_expiration(true));
    cache.set("hot", Bytes::from_static(b"v"), Some(60)).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let cache = Arc::clone(&cache);
        handles.push(tokio::spawn(async move {
            for _ in 0..100 {
                let (ttl, value) = cache.get_with_ttl("hot").await.unwrap();
                assert_eq!(ttl, 60);
                assert_eq!(value, Some(Bytes::from_static(b"v")));
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }
}
