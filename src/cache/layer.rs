//! Cache-Aside Layer
//!
//! Combines key derivation, the tag index, a backing store, and metrics
//! into the remember/invalidate contract. All collaborators are held by
//! explicit construction; nothing is resolved from ambient global state.

use std::collections::HashSet;
use std::future::Future;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, warn};

use crate::cache::key::derive_key;
use crate::cache::lock::KeyedLocks;
use crate::cache::metrics::{CacheMetrics, MetricsSnapshot};
use crate::cache::store::CacheStore;
use crate::cache::tags::TagIndex;
use crate::cache::TTL_FOREVER;
use crate::error::{CacheError, Result};

// == Lookup Outcome ==
enum Lookup<T> {
    /// A live entry decoded successfully
    Hit(T),
    /// Known absent (missing, expired, or undecodable and dropped)
    Miss,
    /// The backend could not answer; not a miss
    Unavailable,
}

// == Tag Cache ==
/// Tagged cache-aside layer over a TTL-capable key-value store.
///
/// `remember` checks the store first and computes on miss; tags declared at
/// store time allow whole groups of keys to be invalidated in one call.
/// Safe to share across concurrent callers behind an `Arc`.
pub struct TagCache<S: CacheStore> {
    /// Key-value backend
    store: S,
    /// Exact tag membership for group invalidation
    tags: TagIndex,
    /// Hit/miss/store counters
    metrics: CacheMetrics,
    /// Per-key advisory locks; None leaves concurrent misses uncollapsed
    locks: Option<KeyedLocks>,
}

impl<S: CacheStore> TagCache<S> {
    // == Constructor ==
    /// Creates a cache layer over `store` without stampede protection:
    /// concurrent misses on the same key each run their own compute.
    pub fn new(store: S) -> Self {
        Self {
            store,
            tags: TagIndex::new(),
            metrics: CacheMetrics::new(),
            locks: None,
        }
    }

    /// Enables the keyed-lock upgrade: concurrent misses on the same key
    /// collapse into a single compute, with the other callers waiting and
    /// then reading the populated entry.
    pub fn with_stampede_protection(mut self) -> Self {
        self.locks = Some(KeyedLocks::new());
        self
    }

    // == Remember ==
    /// Returns the cached value for (namespace, discriminator), computing
    /// and storing it on miss.
    ///
    /// On a hit the stored value is decoded and returned. On a miss
    /// `compute` runs, its value is serialized and stored with `ttl_seconds`
    /// (0 = no expiry), and the key is recorded under each tag in `tags`.
    /// A compute failure propagates unchanged and is never cached.
    ///
    /// If the backend is unavailable the value is recomputed and returned
    /// uncached; the condition is logged and counted as a store error, not
    /// a miss.
    ///
    /// Dropping the returned future cancels an in-flight compute and leaves
    /// the cache unpopulated.
    pub async fn remember<T, F, Fut>(
        &self,
        namespace: &str,
        discriminator: &[u8],
        tags: &[&str],
        ttl_seconds: u64,
        compute: F,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        let key = derive_key(namespace, discriminator);

        match self.lookup::<T>(&key).await {
            Lookup::Hit(value) => {
                self.metrics.record_hit();
                return Ok(value);
            }
            Lookup::Miss => self.metrics.record_miss(),
            Lookup::Unavailable => {}
        }

        if let Some(locks) = &self.locks {
            let _guard = locks.acquire(&key).await;

            // Another caller may have filled the entry while we waited.
            if let Lookup::Hit(value) = self.lookup::<T>(&key).await {
                self.metrics.record_collapse();
                return Ok(value);
            }

            return self.fill(&key, tags, ttl_seconds, compute).await;
        }

        self.fill(&key, tags, ttl_seconds, compute).await
    }

    // == Remember Forever ==
    /// `remember` with no expiry: the entry is kept until one of its tags
    /// is invalidated or it is forgotten.
    pub async fn remember_forever<T, F, Fut>(
        &self,
        namespace: &str,
        discriminator: &[u8],
        tags: &[&str],
        compute: F,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        self.remember(namespace, discriminator, tags, TTL_FOREVER, compute)
            .await
    }

    // == Invalidate ==
    /// Removes every key recorded under any of `tags` from both the tag
    /// index and the store.
    ///
    /// Returns the number of keys deleted. Store failures are logged and
    /// counted; remaining keys are still processed, and a failed delete is
    /// bounded by the entry's TTL.
    pub async fn invalidate(&self, tags: &[&str]) -> u64 {
        let mut removed = 0u64;

        for tag in tags {
            let keys = self.tags.clear_tag(tag);
            debug!("Invalidating tag '{}': {} keys", tag, keys.len());

            for key in keys {
                // The entry is gone entirely, not just unlinked from this
                // tag, so memberships under other tags go with it.
                self.tags.dissociate(&key);

                match self.store.delete(&key).await {
                    Ok(()) => removed += 1,
                    Err(err) => {
                        error!("Failed to delete key {} during invalidation: {}", key, err);
                        self.metrics.record_store_error();
                    }
                }
            }
        }

        self.metrics.record_invalidated(removed);
        removed
    }

    // == Forget ==
    /// Removes the single entry for (namespace, discriminator) and its tag
    /// memberships.
    pub async fn forget(&self, namespace: &str, discriminator: &[u8]) -> Result<()> {
        let key = derive_key(namespace, discriminator);
        self.store.delete(&key).await?;
        self.tags.dissociate(&key);
        Ok(())
    }

    // == Sweep Expired ==
    /// Removes expired entries from the store and prunes their tag
    /// memberships. Returns the number of entries removed.
    pub async fn sweep_expired(&self) -> usize {
        match self.store.sweep_expired().await {
            Ok(keys) => {
                for key in &keys {
                    self.tags.dissociate(key);
                }
                keys.len()
            }
            Err(err) => {
                error!("TTL sweep failed: {}", err);
                self.metrics.record_store_error();
                0
            }
        }
    }

    // == Observability ==
    /// Returns a point-in-time snapshot of the cache counters.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Returns the number of live entries in the backing store.
    pub async fn entry_count(&self) -> Result<usize> {
        self.store.entry_count().await
    }

    /// Returns the number of tags with at least one member.
    pub fn tag_count(&self) -> usize {
        self.tags.tag_count()
    }

    /// Returns the keys currently recorded under `tag`.
    pub fn keys_for_tag(&self, tag: &str) -> HashSet<String> {
        self.tags.keys_for_tag(tag)
    }

    // == Lookup ==
    /// Reads and decodes the entry under `key`, distinguishing miss from
    /// backend failure.
    async fn lookup<T: DeserializeOwned>(&self, key: &str) -> Lookup<T> {
        match self.store.get(key).await {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(value) => Lookup::Hit(value),
                Err(err) => {
                    // Corrupted or schema-mismatched entry: drop it and
                    // let the caller recompute.
                    warn!("Dropping undecodable entry for key {}: {}", key, err);
                    if let Err(err) = self.store.delete(key).await {
                        error!("Failed to delete undecodable key {}: {}", key, err);
                        self.metrics.record_store_error();
                    }
                    self.tags.dissociate(key);
                    Lookup::Miss
                }
            },
            Ok(None) => Lookup::Miss,
            Err(err) => {
                error!("Cache store get failed for key {}: {}", key, err);
                self.metrics.record_store_error();
                Lookup::Unavailable
            }
        }
    }

    // == Fill ==
    /// Runs the compute and populates the store and tag index.
    async fn fill<T, F, Fut>(
        &self,
        key: &str,
        tags: &[&str],
        ttl_seconds: u64,
        compute: F,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        let value = compute().await.map_err(CacheError::Compute)?;

        let bytes = match serde_json::to_vec(&value) {
            Ok(bytes) => bytes,
            Err(err) => {
                error!("Failed to encode value for key {}: {}", key, err);
                return Ok(value);
            }
        };

        // Membership is recorded before the write so an invalidation that
        // lands mid-fill can see the key; the recheck below honors a clear
        // that raced the write.
        self.tags.associate(tags, key);

        if let Err(err) = self.store.set(key, bytes, ttl_seconds).await {
            // Degraded mode: the caller still gets the fresh value,
            // uncached.
            error!("Cache store set failed for key {}: {}", key, err);
            self.metrics.record_store_error();
            self.tags.dissociate(key);
            return Ok(value);
        }
        self.metrics.record_store();

        if tags.iter().any(|tag| !self.tags.contains(tag, key)) {
            // A clear_tag raced the fill; the entry must not outlive the
            // invalidation that already reported it gone.
            if let Err(err) = self.store.delete(key).await {
                error!("Failed to delete key {} after raced invalidation: {}", key, err);
                self.metrics.record_store_error();
            }
            self.tags.dissociate(key);
        }

        Ok(value)
    }
}
