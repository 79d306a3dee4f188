//! Webhook receiver.
//!
//! Reads the event kind from `X-GitHub-Event`, normalizes the body and
//! appends the resulting records. Unrecognized kinds are acknowledged with
//! 200 so the sender does not retry them.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use hookfeed_core::{ingest, EventKind, IngestOutcome};
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use super::error_response;
use crate::AppState;

/// Header carrying the event kind.
pub const EVENT_HEADER: &str = "x-github-event";

/// Header carrying the sender's delivery identifier.
pub const DELIVERY_HEADER: &str = "x-github-delivery";

/// Acknowledgment body.
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    /// Human-readable outcome.
    pub msg: &'static str,
}

/// Message sent when records were stored.
pub const RECEIVED: &str = "Event received";

/// Message sent for kinds that are not recorded.
pub const NOT_HANDLED: &str = "Event not handled";

/// Receives a webhook delivery.
///
/// # Errors
///
/// Returns appropriate HTTP status codes:
/// - 400: Payload of a recognized kind does not match its schema
/// - 503: Event store unavailable (records appended before the failure stay)
#[instrument(
    name = "receive_webhook",
    skip(state, headers, body),
    fields(
        event_kind = headers.get(EVENT_HEADER).and_then(|v| v.to_str().ok()).unwrap_or("none"),
        delivery_id = headers.get(DELIVERY_HEADER).and_then(|v| v.to_str().ok()).unwrap_or("unknown"),
        content_length = body.len(),
    )
)]
pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let kind = EventKind::from_header(headers.get(EVENT_HEADER).and_then(|v| v.to_str().ok()));

    match ingest(state.store.as_ref(), &kind, &body).await {
        Ok(IngestOutcome::Recorded(ids)) => {
            info!(records = ids.len(), "Webhook recorded");
            (StatusCode::OK, Json(WebhookAck { msg: RECEIVED })).into_response()
        },
        Ok(IngestOutcome::Unhandled(_)) => {
            info!("Webhook acknowledged without recording");
            (StatusCode::OK, Json(WebhookAck { msg: NOT_HANDLED })).into_response()
        },
        Err(e) if e.is_client_error() => {
            warn!(error = %e, "Rejected malformed webhook payload");
            error_response(&e)
        },
        Err(e) => {
            error!(error = %e, "Failed to record webhook");
            error_response(&e)
        },
    }
}
