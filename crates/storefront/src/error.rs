//! Application error type for route handlers.
//!
//! Every handler that can fail returns `Result<T, AppError>`. The response
//! mapping keeps backend and internal detail out of client bodies; those
//! variants are captured to Sentry and logged before the generic response
//! goes out.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::records::RecordStoreError;

#[derive(Debug, Error)]
pub enum AppError {
    /// The hosted backend failed or answered with an error.
    #[error("Record store error: {0}")]
    Records(#[from] RecordStoreError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Records(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(error = %self, sentry_event_id = %event_id, "request failed");
        }

        let (status, message) = match &self {
            Self::Records(_) => (
                StatusCode::BAD_GATEWAY,
                "External service error".to_string(),
            ),
            Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, self.to_string()),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
