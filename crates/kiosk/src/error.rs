//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry
//! before responding to the client. Cart mutations surface notices inline
//! instead; `AppError` covers fetch failures with a cold cache and the
//! paths that cannot redirect.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::PersistError;
use crate::docstore::FetchError;

/// Application-level error type for the kiosk.
#[derive(Debug, Error)]
pub enum AppError {
    /// Remote fetch failed with no cached fallback.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Local cache store failed.
    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Persist(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Fetch(_) => StatusCode::BAD_GATEWAY,
            Self::Persist(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Persist(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Fetch(_) => "Store data unavailable".to_string(),
            Self::BadRequest(_) => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
