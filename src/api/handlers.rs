//! API Handlers
//!
//! HTTP request handlers for the cache service endpoints: group
//! invalidation, single-entry removal, tag inspection, stats, and health.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::{MemoryStore, TagCache};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    ForgetRequest, ForgetResponse, HealthResponse, InvalidateRequest, InvalidateResponse,
    StatsResponse, TagResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache layer
    pub cache: Arc<TagCache<MemoryStore>>,
}

impl AppState {
    /// Creates a new AppState over the given cache layer.
    pub fn new(cache: TagCache<MemoryStore>) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        let mut cache = TagCache::new(MemoryStore::new());
        if config.stampede_protection {
            cache = cache.with_stampede_protection();
        }
        Self::new(cache)
    }
}

/// Handler for POST /invalidate
///
/// Removes every key recorded under any of the requested tags.
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Json(req): Json<InvalidateRequest>,
) -> Result<Json<InvalidateResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let tags: Vec<&str> = req.tags.iter().map(String::as_str).collect();
    let removed = state.cache.invalidate(&tags).await;

    Ok(Json(InvalidateResponse::new(req.tags, removed)))
}

/// Handler for POST /forget
///
/// Removes the single entry for (namespace, discriminator).
pub async fn forget_handler(
    State(state): State<AppState>,
    Json(req): Json<ForgetRequest>,
) -> Result<Json<ForgetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    state
        .cache
        .forget(&req.namespace, req.discriminator.as_bytes())
        .await?;

    Ok(Json(ForgetResponse::new(req.namespace)))
}

/// Handler for GET /tags/:tag
///
/// Reports how many keys are currently recorded under a tag.
pub async fn tag_handler(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> Json<TagResponse> {
    let key_count = state.cache.keys_for_tag(&tag).len();
    Json(TagResponse::new(tag, key_count))
}

/// Handler for GET /stats
///
/// Returns current cache counters plus store and tag totals.
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let snapshot = state.cache.metrics();
    let entries = state.cache.entry_count().await?;
    let tags = state.cache.tag_count();

    Ok(Json(StatsResponse::new(snapshot, entries, tags)))
}

/// Handler for GET /health
///
/// Returns health status of the service.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
