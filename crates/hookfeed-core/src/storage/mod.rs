//! Event store gateway.
//!
//! The rest of the system sees the durable store only through
//! [`EventStore`]: append one record, read the most recent ones. Production
//! uses [`PostgresEventStore`], which keeps each record as a JSONB document;
//! tests use [`mock::InMemoryEventStore`].
//!
//! There is no batching and no transaction spanning several appends. A
//! merged pull request costs two independent `append` calls, and if the
//! second one fails the first record stays.

use std::{future::Future, pin::Pin};

use crate::{
    error::Result,
    models::{CanonicalEvent, EventId, StoredEvent},
};

mod postgres;

pub use postgres::PostgresEventStore;

/// Number of records served by the read endpoint.
pub const RECENT_EVENTS_LIMIT: usize = 20;

/// Storage operations required by the ingestion pipeline and read endpoint.
pub trait EventStore: Send + Sync + 'static {
    /// Persists exactly one record and returns the identifier the store
    /// assigned to it.
    fn append(
        &self,
        event: CanonicalEvent,
    ) -> Pin<Box<dyn Future<Output = Result<EventId>> + Send + '_>>;

    /// Returns at most `limit` records, newest `timestamp` first.
    ///
    /// Timestamps compare as plain strings, byte by byte.
    fn recent(
        &self,
        limit: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<StoredEvent>>> + Send + '_>>;

    /// Verifies the store is reachable.
    fn ping(&self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

pub mod mock {
    //! In-memory event store for tests.
    //!
    //! Keeps records in insertion order and supports failure injection so
    //! tests can observe what a half-completed ingestion leaves behind.

    use std::{future::Future, pin::Pin, sync::Arc};

    use tokio::sync::RwLock;

    use super::{CanonicalEvent, EventId, EventStore, StoredEvent};
    use crate::error::{HookfeedError, Result};

    /// In-memory store with configurable failures.
    #[derive(Clone, Default)]
    pub struct InMemoryEventStore {
        events: Arc<RwLock<Vec<StoredEvent>>>,
        appends_left: Arc<RwLock<Option<usize>>>,
        unavailable: Arc<RwLock<bool>>,
    }

    impl InMemoryEventStore {
        /// Creates an empty, healthy store.
        pub fn new() -> Self {
            Self::default()
        }

        /// Lets `successes` more appends through, then fails every append.
        pub async fn fail_after(&self, successes: usize) {
            *self.appends_left.write().await = Some(successes);
        }

        /// Makes every operation fail (or succeed again).
        pub async fn set_unavailable(&self, unavailable: bool) {
            *self.unavailable.write().await = unavailable;
        }

        /// Returns every stored record in insertion order.
        pub async fn all(&self) -> Vec<StoredEvent> {
            self.events.read().await.clone()
        }

        /// Number of stored records.
        pub async fn len(&self) -> usize {
            self.events.read().await.len()
        }

        /// Whether nothing has been stored.
        pub async fn is_empty(&self) -> bool {
            self.events.read().await.is_empty()
        }

        async fn check_available(&self) -> Result<()> {
            if *self.unavailable.read().await {
                return Err(HookfeedError::StoreUnavailable("in-memory store offline".into()));
            }
            Ok(())
        }
    }

    impl EventStore for InMemoryEventStore {
        fn append(
            &self,
            event: CanonicalEvent,
        ) -> Pin<Box<dyn Future<Output = Result<EventId>> + Send + '_>> {
            Box::pin(async move {
                self.check_available().await?;

                if let Some(left) = self.appends_left.write().await.as_mut() {
                    if *left == 0 {
                        return Err(HookfeedError::StoreUnavailable(
                            "injected append failure".into(),
                        ));
                    }
                    *left -= 1;
                }

                let id = EventId::new();
                self.events.write().await.push(StoredEvent { id, event });
                Ok(id)
            })
        }

        fn recent(
            &self,
            limit: usize,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<StoredEvent>>> + Send + '_>> {
            Box::pin(async move {
                self.check_available().await?;

                let mut events = self.events.read().await.clone();
                events.sort_by(|a, b| b.event.timestamp.cmp(&a.event.timestamp));
                events.truncate(limit);
                Ok(events)
            })
        }

        fn ping(&self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
            Box::pin(self.check_available())
        }
    }
}
