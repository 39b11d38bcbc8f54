//! Error types for linernotes
//!
//! Every handler failure is converted to a JSON body of the form
//! `{"error": "<message>"}` with the matching HTTP status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::spotify_client::SpotifyError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Token exchange with the catalog provider failed (500)
    #[error("Upstream auth error: {0}")]
    UpstreamAuth(String),

    /// Catalog search or lookup failed (500)
    #[error("Upstream search error: {0}")]
    UpstreamSearch(String),

    /// Database error (500)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::UpstreamAuth(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::UpstreamSearch(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::Database(ref err) => {
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };

        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

impl From<SpotifyError> for ApiError {
    fn from(err: SpotifyError) -> Self {
        match err {
            SpotifyError::Auth(_) => ApiError::UpstreamAuth(err.to_string()),
            _ => ApiError::UpstreamSearch(err.to_string()),
        }
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
