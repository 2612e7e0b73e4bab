//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror.
//!
//! Compute failures inside `get_or_set` are never wrapped here: they belong to
//! the caller and are propagated with their own type.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the cache engine.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Store configuration rejected (zero capacity or zero TTL)
    #[error("Invalid cache configuration: {0}")]
    InvalidConfig(String),

    /// Invalidation pattern could not be compiled
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Domain event payload failed validation
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    /// No store registered under the given name
    #[error("Cache store not found: {0}")]
    StoreNotFound(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::InvalidPattern { .. } => StatusCode::BAD_REQUEST,
            CacheError::InvalidEvent(_) => StatusCode::BAD_REQUEST,
            CacheError::StoreNotFound(_) => StatusCode::NOT_FOUND,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache engine.
pub type Result<T> = std::result::Result<T, CacheError>;
