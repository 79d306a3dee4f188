//! Error types and result handling for webhook ingestion.
//!
//! Defines a small error taxonomy with stable codes so callers can tell a
//! client-side problem (a payload that does not match its schema) from an
//! infrastructure failure (the event store could not be reached).

use thiserror::Error;

/// Result type alias using `HookfeedError`.
pub type Result<T> = std::result::Result<T, HookfeedError>;

/// Hookfeed error types with stable error codes.
#[derive(Debug, Error)]
pub enum HookfeedError {
    // Client Errors (E1001)
    /// Payload of a recognized event kind does not match its schema (E1001).
    #[error("[E1001] Malformed payload: {kind} event rejected: {reason}")]
    MalformedPayload {
        /// Event kind announced by the delivery header
        kind: String,
        /// Decoder message naming the offending field
        reason: String,
    },

    // System Errors (E3001)
    /// The event store rejected or could not serve the operation (E3001).
    #[error("[E3001] Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl HookfeedError {
    /// Returns the error code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MalformedPayload { .. } => "E1001",
            Self::StoreUnavailable(_) => "E3001",
        }
    }

    /// Returns whether the sender of the request is at fault.
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::MalformedPayload { .. })
    }

    pub(crate) fn malformed(kind: impl Into<String>, err: &serde_json::Error) -> Self {
        Self::MalformedPayload { kind: kind.into(), reason: err.to_string() }
    }
}

impl From<sqlx::Error> for HookfeedError {
    fn from(err: sqlx::Error) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}
