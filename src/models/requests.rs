//! Request DTOs for the cache service API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::cache::MAX_TAG_LENGTH;

/// Request body for the invalidate operation (POST /invalidate)
///
/// # Fields
/// - `tags`: The tags whose keys should be removed
#[derive(Debug, Clone, Deserialize)]
pub struct InvalidateRequest {
    /// Tags to clear
    pub tags: Vec<String>,
}

impl InvalidateRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.tags.is_empty() {
            return Some("At least one tag is required".to_string());
        }
        for tag in &self.tags {
            if tag.is_empty() {
                return Some("Tags cannot be empty".to_string());
            }
            if tag.len() > MAX_TAG_LENGTH {
                return Some(format!(
                    "Tag exceeds maximum length of {} bytes",
                    MAX_TAG_LENGTH
                ));
            }
        }
        None
    }
}

/// Request body for the forget operation (POST /forget)
///
/// # Fields
/// - `namespace`: The logical cache name the entry was stored under
/// - `discriminator`: The operation descriptor identifying the entry
#[derive(Debug, Clone, Deserialize)]
pub struct ForgetRequest {
    /// Logical cache name
    pub namespace: String,
    /// Operation descriptor
    #[serde(default)]
    pub discriminator: String,
}

impl ForgetRequest {
    /// Validates the request data
    pub fn validate(&self) -> Option<String> {
        if self.namespace.is_empty() {
            return Some("Namespace cannot be empty".to_string());
        }
        None
    }
}
