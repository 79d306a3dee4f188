//! Core domain for recording repository activity from webhooks.
//!
//! Provides the canonical event record, the inbound payload schemas, the
//! normalizer that maps one to the other, and the store gateway that
//! persists and lists records. The HTTP layer and the binary depend on these
//! types and nothing else.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod models;
pub mod normalize;
pub mod payload;
pub mod pipeline;
pub mod storage;

pub use error::{HookfeedError, Result};
pub use models::{Action, CanonicalEvent, EventId, StoredEvent};
pub use normalize::{normalize, Normalized};
pub use payload::{EventKind, WebhookPayload};
pub use pipeline::{ingest, IngestOutcome};
pub use storage::{EventStore, PostgresEventStore, RECENT_EVENTS_LIMIT};
