//! API Module
//!
//! HTTP handlers and routing for the cache service REST API.
//!
//! # Endpoints
//! - `POST /invalidate` - Remove all keys under the given tags
//! - `POST /forget` - Remove a single entry by namespace and discriminator
//! - `GET /tags/:tag` - Inspect a tag's membership size
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
