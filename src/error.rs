//! API error types.
//!
//! Every failure is caught at the handler boundary and turned into a status
//! code plus a JSON body; nothing crashes the serving process. Response field
//! names are fixed for compatibility with existing clients.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed input (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Unknown identifier (404); carries the id for the response body
    #[error("Unknown id: {id}")]
    NotFound { id: String },

    /// Scorer or store failure unrelated to caller input (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Generic error (500)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::NotFound { id } => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "id not found", "id": id })),
            )
                .into_response(),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": msg })),
                )
                    .into_response()
            }
            ApiError::Other(err) => {
                tracing::error!("Unhandled error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal error" })),
                )
                    .into_response()
            }
        }
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
