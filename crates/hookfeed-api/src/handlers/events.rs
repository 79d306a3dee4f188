//! Recent activity listing.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hookfeed_core::RECENT_EVENTS_LIMIT;
use tracing::{debug, error, instrument};

use super::error_response;
use crate::AppState;

/// Returns up to 20 records, newest `timestamp` first.
///
/// Query parameters are ignored; there is no pagination.
#[instrument(name = "list_events", skip(state))]
pub async fn list_events(State(state): State<AppState>) -> Response {
    match state.store.recent(RECENT_EVENTS_LIMIT).await {
        Ok(events) => {
            debug!(count = events.len(), "Listing recent events");
            (StatusCode::OK, Json(events)).into_response()
        },
        Err(e) => {
            error!(error = %e, "Failed to read recent events");
            error_response(&e)
        },
    }
}
