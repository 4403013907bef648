//! TagCache - a tag-based cache-aside layer
//!
//! Derives stable cache keys, tracks exact tag membership for group
//! invalidation, and fronts any TTL-capable key-value backend.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{derive_key, CacheStore, MemoryStore, MetricsSnapshot, TagCache};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::spawn_cleanup_task;
