//! Error types for the cache layer
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache layer.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Backing store unreachable or erroring
    ///
    /// Distinct from a miss: a miss means "known absent", this means
    /// "unknown because the backend could not answer".
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// The caller-supplied compute function failed
    ///
    /// The original error is carried unchanged as the source so callers
    /// can downcast it. Failures are never cached and never retried.
    #[error("Compute failed: {0}")]
    Compute(#[source] anyhow::Error),

    /// A stored value could not be deserialized
    #[error("Decode failed for key: {0}")]
    Decode(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let status = match &self {
            CacheError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Compute(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache layer.
pub type Result<T> = std::result::Result<T, CacheError>;
