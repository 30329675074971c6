//! Error taxonomy for the relay gateway.
//!
//! Four recovery classes, each with a fixed HTTP status and JSON body. No
//! error is retried; the caller's remedy is always to try again.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use inquiry_core::{CoreError, FieldError};
use serde_json::json;

/// Errors that can occur while handling a relay request.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RelayError {
    /// One or more submission fields failed validation. Reported with
    /// field-level detail; never logged as a server fault.
    #[error("validation failed on {0:?}")]
    Validation(Vec<FieldError>),

    /// The outbound call never completed (DNS, connection refused, transport
    /// timeout).
    #[error("network error reaching intake service: {0}")]
    Network(#[source] reqwest::Error),

    /// The intake service answered with a non-success status.
    #[error("intake service returned status {status} {status_text}")]
    Upstream { status: u16, status_text: String },

    /// Anything else, including a request body that is not valid JSON.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<CoreError> for RelayError {
    fn from(e: CoreError) -> Self {
        RelayError::Internal(e.to_string())
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match self {
            RelayError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": "Validation error", "errors": errors })),
            )
                .into_response(),
            RelayError::Network(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "message": "Network error - unable to reach external service",
                    "error": "Network error",
                })),
            )
                .into_response(),
            RelayError::Upstream { .. } => (
                StatusCode::BAD_GATEWAY,
                Json(json!({
                    "message": "Failed to submit inquiry to external service",
                    "error": "External service unavailable",
                })),
            )
                .into_response(),
            RelayError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "message": "Internal server error",
                    "error": "Unknown error occurred",
                })),
            )
                .into_response(),
        }
    }
}
