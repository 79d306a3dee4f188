//! HTTP request handlers for the hookfeed API.
//!
//! - `webhook` - receives deliveries and records normalized events
//! - `events` - lists the most recent events
//! - `health` - health and liveness probes
//!
//! # Error Handling
//!
//! Failures are returned as `{"error": {"code": "E1001", "message": "..."}}`
//! with a status derived from the error: 400 for malformed payloads, 503
//! when the event store is unavailable.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hookfeed_core::HookfeedError;
use serde::Serialize;

pub mod events;
pub mod health;
pub mod webhook;

pub use events::list_events;
pub use health::{health_check, liveness_check};
pub use webhook::receive_webhook;

/// Error response with code and message.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error details including code and message
    pub error: ErrorDetail,
}

/// Detailed error information.
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    /// Error code from the taxonomy (E1001, E3001)
    pub code: String,
    /// Human-readable error description
    pub message: String,
}

/// Maps an error to the status returned to the caller.
pub fn status_for(error: &HookfeedError) -> StatusCode {
    match error {
        HookfeedError::MalformedPayload { .. } => StatusCode::BAD_REQUEST,
        HookfeedError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Creates a standardized error response.
pub(crate) fn error_response(error: &HookfeedError) -> Response {
    let body = ErrorResponse {
        error: ErrorDetail { code: error.code().to_string(), message: error.to_string() },
    };

    (status_for(error), Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_payload_is_bad_request() {
        let error = HookfeedError::MalformedPayload {
            kind: "push".into(),
            reason: "missing field `pusher`".into(),
        };

        assert_eq!(error_response(&error).status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn store_failure_is_service_unavailable() {
        let error = HookfeedError::StoreUnavailable("connection refused".into());

        assert_eq!(error_response(&error).status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
