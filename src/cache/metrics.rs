//! Cache Metrics Module
//!
//! Tracks cache performance counters: hits, misses, stores, stampede
//! collapses, store errors, and invalidated keys. Counters are process-wide
//! and monotonic until restart; there is no persistence.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Metrics ==
/// Shared cache performance counters.
#[derive(Debug, Default)]
pub struct CacheMetrics {
    /// Reads answered from the store
    hits: AtomicU64,
    /// Reads where the store had no entry
    misses: AtomicU64,
    /// Values written to the store after a compute
    stores: AtomicU64,
    /// Concurrent misses that waited and read the populated entry instead
    /// of recomputing
    collapses: AtomicU64,
    /// Store operations that failed with a backend error
    store_errors: AtomicU64,
    /// Keys removed through tag invalidation
    invalidated_keys: AtomicU64,
}

impl CacheMetrics {
    // == Constructor ==
    /// Creates a new CacheMetrics with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the hit counter.
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments the miss counter.
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments the store counter.
    pub fn record_store(&self) {
        self.stores.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments the stampede-collapse counter.
    pub fn record_collapse(&self) {
        self.collapses.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments the store-error counter.
    pub fn record_store_error(&self) {
        self.store_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Adds to the invalidated-keys counter.
    pub fn record_invalidated(&self, count: u64) {
        self.invalidated_keys.fetch_add(count, Ordering::Relaxed);
    }

    // == Snapshot ==
    /// Returns a point-in-time copy of all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            stores: self.stores.load(Ordering::Relaxed),
            collapses: self.collapses.load(Ordering::Relaxed),
            store_errors: self.store_errors.load(Ordering::Relaxed),
            invalidated_keys: self.invalidated_keys.load(Ordering::Relaxed),
        }
    }
}

// == Metrics Snapshot ==
/// Point-in-time counter values.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsSnapshot {
    /// Number of reads answered from the store
    pub hits: u64,
    /// Number of reads where the store had no entry
    pub misses: u64,
    /// Number of values written after a compute
    pub stores: u64,
    /// Number of collapsed concurrent misses
    pub collapses: u64,
    /// Number of failed store operations
    pub store_errors: u64,
    /// Number of keys removed through tag invalidation
    pub invalidated_keys: u64,
}

impl MetricsSnapshot {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have resolved.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
