//! Error types for the metrics service API
//!
//! Provides unified error handling using thiserror. Note the asymmetry
//! with the cache itself: the cache never raises, so every error here
//! originates in request validation or the document-store collaborator.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::documents::DocumentError;

// == Api Error Enum ==
/// Unified error type for the HTTP surface.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The document-store collaborator failed to deliver raw records
    #[error(transparent)]
    Source(#[from] DocumentError),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let status = match &self {
            ApiError::Source(_) => StatusCode::BAD_GATEWAY,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for API handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
