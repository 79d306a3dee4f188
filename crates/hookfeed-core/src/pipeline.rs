//! Normalize-then-append ingestion pipeline.

use tracing::{debug, info};

use crate::{
    error::Result,
    models::EventId,
    normalize::{normalize, Normalized},
    payload::EventKind,
    storage::EventStore,
};

/// What happened to a delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Records were appended; identifiers in append order.
    Recorded(Vec<EventId>),
    /// The kind is not one we map; nothing was stored.
    Unhandled(String),
}

/// Normalizes a delivery and appends each resulting record.
///
/// Appends run one after another in the order the normalizer produced them
/// (`PULL_REQUEST` before `MERGE`). The first failing append aborts the
/// ingestion; records appended before it are not rolled back.
///
/// # Errors
///
/// Returns `HookfeedError::MalformedPayload` before anything is stored, or
/// `HookfeedError::StoreUnavailable` from the first failing append.
pub async fn ingest(store: &dyn EventStore, kind: &EventKind, body: &[u8]) -> Result<IngestOutcome> {
    let events = match normalize(kind, body)? {
        Normalized::Records(events) => events,
        Normalized::Unrecognized(kind) => {
            debug!(event_kind = %kind, "Ignoring unrecognized event kind");
            return Ok(IngestOutcome::Unhandled(kind));
        },
    };

    let mut ids = Vec::with_capacity(events.len());
    for event in events {
        let summary = event.describe();
        let id = store.append(event).await?;
        info!(event_id = %id, summary = %summary, "Event recorded");
        ids.push(id);
    }

    Ok(IngestOutcome::Recorded(ids))
}
