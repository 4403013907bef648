//! Response DTOs for the cache service API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::MetricsSnapshot;

/// Response body for the invalidate operation (POST /invalidate)
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    /// Success message
    pub message: String,
    /// The tags that were cleared
    pub tags: Vec<String>,
    /// Number of keys removed from the store
    pub removed: u64,
}

impl InvalidateResponse {
    /// Creates a new InvalidateResponse
    pub fn new(tags: Vec<String>, removed: u64) -> Self {
        Self {
            message: format!("Invalidated {} keys", removed),
            tags,
            removed,
        }
    }
}

/// Response body for the forget operation (POST /forget)
#[derive(Debug, Clone, Serialize)]
pub struct ForgetResponse {
    /// Success message
    pub message: String,
    /// The namespace the entry was forgotten from
    pub namespace: String,
}

impl ForgetResponse {
    /// Creates a new ForgetResponse
    pub fn new(namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        Self {
            message: format!("Entry forgotten from '{}'", namespace),
            namespace,
        }
    }
}

/// Response body for tag inspection (GET /tags/:tag)
#[derive(Debug, Clone, Serialize)]
pub struct TagResponse {
    /// The inspected tag
    pub tag: String,
    /// Number of keys currently recorded under the tag
    pub key_count: usize,
}

impl TagResponse {
    /// Creates a new TagResponse
    pub fn new(tag: impl Into<String>, key_count: usize) -> Self {
        Self {
            tag: tag.into(),
            key_count,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of values stored after a compute
    pub stores: u64,
    /// Number of collapsed concurrent misses
    pub collapses: u64,
    /// Number of failed store operations
    pub store_errors: u64,
    /// Number of keys removed through tag invalidation
    pub invalidated_keys: u64,
    /// Current number of entries in the store
    pub entries: usize,
    /// Current number of tags with members
    pub tags: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from a metrics snapshot and store counts
    pub fn new(snapshot: MetricsSnapshot, entries: usize, tags: usize) -> Self {
        let hit_rate = snapshot.hit_rate();
        Self {
            hits: snapshot.hits,
            misses: snapshot.misses,
            stores: snapshot.stores,
            collapses: snapshot.collapses,
            store_errors: snapshot.store_errors,
            invalidated_keys: snapshot.invalidated_keys,
            entries,
            tags,
            hit_rate,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
