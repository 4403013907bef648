//! Cache Store Contract
//!
//! Defines the key-value backend interface the cache-aside layer runs
//! against.

use async_trait::async_trait;

use crate::error::Result;

// == Cache Store Trait ==
/// Key-value backend with absolute TTL expiry.
///
/// Implementations must distinguish "known absent" (`Ok(None)` from `get`)
/// from "unknown due to backend failure" (`Err(StoreUnavailable)`); the
/// cache layer treats the two differently. The backend's own concurrency
/// control is its responsibility; all methods take `&self`.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Retrieves the bytes stored under `key`.
    ///
    /// Returns `Ok(None)` if the key is absent or its TTL has elapsed.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `value` under `key`.
    ///
    /// A `ttl_seconds` of 0 keeps the entry until it is explicitly deleted;
    /// any other value expires the entry that many seconds after the write,
    /// regardless of read traffic.
    async fn set(&self, key: &str, value: Vec<u8>, ttl_seconds: u64) -> Result<()>;

    /// Removes the entry under `key`. Deleting an absent key is not an
    /// error; invalidation may race expiry.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Returns the number of live entries currently held by the backend.
    async fn entry_count(&self) -> Result<usize>;

    /// Removes expired entries and returns their keys so callers can drop
    /// bookkeeping that references them.
    ///
    /// Backends with native expiry can keep this default no-op.
    async fn sweep_expired(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}
