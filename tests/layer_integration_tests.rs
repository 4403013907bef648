//! Integration Tests for the Cache-Aside Layer
//!
//! Exercises the remember/invalidate contract end to end against the
//! in-memory store, plus degraded-mode behavior against a failing backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tagcache::{CacheError, CacheStore, MemoryStore, TagCache};
use tokio::time::sleep;

// == Helper: Failing Store ==

/// A backend that is always unavailable.
struct FailingStore;

#[async_trait]
impl CacheStore for FailingStore {
    async fn get(&self, _key: &str) -> tagcache::Result<Option<Vec<u8>>> {
        Err(CacheError::StoreUnavailable("connection refused".to_string()))
    }

    async fn set(&self, _key: &str, _value: Vec<u8>, _ttl_seconds: u64) -> tagcache::Result<()> {
        Err(CacheError::StoreUnavailable("connection refused".to_string()))
    }

    async fn delete(&self, _key: &str) -> tagcache::Result<()> {
        Err(CacheError::StoreUnavailable("connection refused".to_string()))
    }

    async fn entry_count(&self) -> tagcache::Result<usize> {
        Err(CacheError::StoreUnavailable("connection refused".to_string()))
    }
}

// == Cache-Aside Correctness ==

#[tokio::test]
async fn test_compute_runs_exactly_once_across_repeated_calls() {
    let cache = TagCache::new(MemoryStore::new());
    let calls = Arc::new(AtomicUsize::new(0));

    for _ in 0..10 {
        let calls = Arc::clone(&calls);
        let value = cache
            .remember("users:list", b"active=true", &["users"], 3600, move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, anyhow::Error>(vec!["alice".to_string(), "bob".to_string()])
            })
            .await
            .unwrap();

        assert_eq!(value, vec!["alice".to_string(), "bob".to_string()]);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_remember_then_invalidate_then_recompute() {
    let cache = TagCache::new(MemoryStore::new());
    let calls = Arc::new(AtomicUsize::new(0));

    let compute = |calls: Arc<AtomicUsize>| {
        move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, anyhow::Error>(vec!["alice".to_string(), "bob".to_string()])
        }
    };

    // First call computes and stores
    let first = cache
        .remember("users:list", b"active=true", &["users"], 3600, compute(Arc::clone(&calls)))
        .await
        .unwrap();
    assert_eq!(first, vec!["alice".to_string(), "bob".to_string()]);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Second call within the TTL window is served from the store
    let second = cache
        .remember("users:list", b"active=true", &["users"], 3600, compute(Arc::clone(&calls)))
        .await
        .unwrap();
    assert_eq!(second, first);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Invalidating the tag forces the third call to recompute
    let removed = cache.invalidate(&["users"]).await;
    assert_eq!(removed, 1);

    cache
        .remember("users:list", b"active=true", &["users"], 3600, compute(Arc::clone(&calls)))
        .await
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

// == TTL Expiry ==

#[tokio::test]
async fn test_remember_recomputes_after_ttl_expiry() {
    let cache = TagCache::new(MemoryStore::new());
    let calls = Arc::new(AtomicUsize::new(0));

    for _ in 0..2 {
        let calls = Arc::clone(&calls);
        cache
            .remember("reports", b"daily", &["reports"], 1, move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, anyhow::Error>(7u64)
            })
            .await
            .unwrap();
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    sleep(Duration::from_millis(1100)).await;

    let calls_after = Arc::clone(&calls);
    cache
        .remember("reports", b"daily", &["reports"], 1, move || async move {
            calls_after.fetch_add(1, Ordering::SeqCst);
            Ok::<_, anyhow::Error>(7u64)
        })
        .await
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

// == Tag Invalidation Completeness ==

async fn remember_entity(
    cache: &TagCache<MemoryStore>,
    disc: &[u8],
    tags: &[&str],
    calls: &Arc<AtomicUsize>,
) -> usize {
    let calls = Arc::clone(calls);
    let len = disc.len();
    cache
        .remember("entities", disc, tags, 3600, move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, anyhow::Error>(len)
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn test_invalidating_one_tag_removes_all_its_keys_and_nothing_else() {
    let cache = TagCache::new(MemoryStore::new());
    let k1_calls = Arc::new(AtomicUsize::new(0));
    let k2_calls = Arc::new(AtomicUsize::new(0));
    let k3_calls = Arc::new(AtomicUsize::new(0));

    remember_entity(&cache, b"k1", &["a", "b"], &k1_calls).await;
    remember_entity(&cache, b"k2", &["b", "c"], &k2_calls).await;
    remember_entity(&cache, b"k3", &["d"], &k3_calls).await;

    // Clearing tag b removes both keys that carry it
    let removed = cache.invalidate(&["b"]).await;
    assert_eq!(removed, 2);

    // Their membership under other tags is gone as well
    assert!(cache.keys_for_tag("a").is_empty());
    assert!(cache.keys_for_tag("c").is_empty());
    assert_eq!(cache.keys_for_tag("d").len(), 1);

    // K1 and K2 recompute, K3 is still served from the store
    remember_entity(&cache, b"k1", &["a", "b"], &k1_calls).await;
    remember_entity(&cache, b"k2", &["b", "c"], &k2_calls).await;
    remember_entity(&cache, b"k3", &["d"], &k3_calls).await;

    assert_eq!(k1_calls.load(Ordering::SeqCst), 2);
    assert_eq!(k2_calls.load(Ordering::SeqCst), 2);
    assert_eq!(k3_calls.load(Ordering::SeqCst), 1);
}

// == Failure Isolation ==

#[tokio::test]
async fn test_compute_failure_does_not_affect_other_keys() {
    let cache = TagCache::new(MemoryStore::new());

    let failed: tagcache::Result<String> = cache
        .remember("queries", b"d1", &["queries"], 3600, || async {
            Err(anyhow::anyhow!("upstream timeout"))
        })
        .await;
    assert!(matches!(failed, Err(CacheError::Compute(_))));

    // A different discriminator is unaffected
    let ok = cache
        .remember("queries", b"d2", &["queries"], 3600, || async {
            Ok::<_, anyhow::Error>("fresh".to_string())
        })
        .await
        .unwrap();
    assert_eq!(ok, "fresh");

    // The failed key was never stored: the next call retries the compute
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_clone = Arc::clone(&calls);
    let retried = cache
        .remember("queries", b"d1", &["queries"], 3600, move || async move {
            calls_clone.fetch_add(1, Ordering::SeqCst);
            Ok::<_, anyhow::Error>("recovered".to_string())
        })
        .await
        .unwrap();
    assert_eq!(retried, "recovered");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

// == Stampede Collapse ==

#[tokio::test]
async fn test_concurrent_misses_collapse_into_one_compute() {
    let cache = Arc::new(TagCache::new(MemoryStore::new()).with_stampede_protection());
    let calls = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::new();
    for _ in 0..50 {
        let cache = Arc::clone(&cache);
        let calls = Arc::clone(&calls);

        handles.push(tokio::spawn(async move {
            cache
                .remember("users:list", b"active=true", &["users"], 3600, move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    sleep(Duration::from_millis(100)).await;
                    Ok::<_, anyhow::Error>(vec!["alice".to_string(), "bob".to_string()])
                })
                .await
                .unwrap()
        }));
    }

    let mut values = Vec::new();
    for handle in handles {
        values.push(handle.await.unwrap());
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    for value in &values {
        assert_eq!(value, &values[0]);
    }

    let metrics = cache.metrics();
    assert_eq!(metrics.stores, 1);
    // Every non-winning caller either collapsed on the keyed lock or
    // arrived after the fill and hit outright.
    assert_eq!(metrics.collapses + metrics.hits, 49);
}

#[tokio::test]
async fn test_without_protection_concurrent_misses_may_recompute() {
    let cache = Arc::new(TagCache::new(MemoryStore::new()));
    let calls = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::new();
    for _ in 0..10 {
        let cache = Arc::clone(&cache);
        let calls = Arc::clone(&calls);

        handles.push(tokio::spawn(async move {
            cache
                .remember("users:list", b"active=true", &["users"], 3600, move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    sleep(Duration::from_millis(50)).await;
                    Ok::<_, anyhow::Error>("value".to_string())
                })
                .await
                .unwrap()
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), "value");
    }

    // Baseline behavior: every caller that missed recomputed independently,
    // and each result is correct.
    assert!(calls.load(Ordering::SeqCst) >= 1);
}

// == Degraded Mode ==

#[tokio::test]
async fn test_unavailable_store_degrades_to_recompute() {
    let cache = TagCache::new(FailingStore);
    let calls = Arc::new(AtomicUsize::new(0));

    for _ in 0..2 {
        let calls = Arc::clone(&calls);
        let value = cache
            .remember("users:list", b"active=true", &["users"], 3600, move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, anyhow::Error>("fresh".to_string())
            })
            .await
            .unwrap();
        assert_eq!(value, "fresh");
    }

    // Nothing could be cached, so both calls computed
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    let metrics = cache.metrics();
    // Backend failure is an error-class event, not a miss
    assert_eq!(metrics.misses, 0);
    assert_eq!(metrics.hits, 0);
    assert_eq!(metrics.stores, 0);
    assert!(metrics.store_errors >= 2);

    // No phantom tag memberships were left behind
    assert!(cache.keys_for_tag("users").is_empty());
}

// == Concrete Scenario ==

#[tokio::test]
async fn test_query_result_cache_lifecycle() {
    let cache = TagCache::new(MemoryStore::new());
    let calls = Arc::new(AtomicUsize::new(0));

    let users_query = |calls: Arc<AtomicUsize>| {
        move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, anyhow::Error>(vec!["alice".to_string(), "bob".to_string()])
        }
    };

    let first = cache
        .remember("users:list", b"active=true", &["users"], 3600, users_query(Arc::clone(&calls)))
        .await
        .unwrap();
    assert_eq!(first, vec!["alice".to_string(), "bob".to_string()]);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let second = cache
        .remember("users:list", b"active=true", &["users"], 3600, users_query(Arc::clone(&calls)))
        .await
        .unwrap();
    assert_eq!(second, first);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    cache.invalidate(&["users"]).await;

    let third = cache
        .remember("users:list", b"active=true", &["users"], 3600, users_query(Arc::clone(&calls)))
        .await
        .unwrap();
    assert_eq!(third, first);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}
