//! PostgreSQL-backed event store.
//!
//! Records are stored as schemaless JSONB documents. The store assigns each
//! document its own UUID; validation of the six-field shape is entirely the
//! normalizer's job.

use std::{future::Future, pin::Pin};

use sqlx::{types::Json, PgPool};
use tracing::debug;
use uuid::Uuid;

use super::EventStore;
use crate::{
    error::Result,
    models::{CanonicalEvent, EventId, StoredEvent},
};

/// Event store backed by a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PostgresEventStore {
    pool: PgPool,
}

impl PostgresEventStore {
    /// Creates a store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the database pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the `events` table and its sort index if they are missing.
    ///
    /// # Errors
    ///
    /// Returns `HookfeedError::StoreUnavailable` if either statement fails.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS events (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                document JSONB NOT NULL,
                inserted_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_events_timestamp
            ON events ((document->>'timestamp') COLLATE "C" DESC)
            "#,
        )
        .execute(&self.pool)
        .await?;

        debug!("Event store schema ensured");
        Ok(())
    }
}

impl EventStore for PostgresEventStore {
    fn append(
        &self,
        event: CanonicalEvent,
    ) -> Pin<Box<dyn Future<Output = Result<EventId>> + Send + '_>> {
        Box::pin(async move {
            let id: Uuid =
                sqlx::query_scalar("INSERT INTO events (document) VALUES ($1) RETURNING id")
                    .bind(Json(&event))
                    .fetch_one(&self.pool)
                    .await?;

            Ok(EventId(id))
        })
    }

    fn recent(
        &self,
        limit: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<StoredEvent>>> + Send + '_>> {
        Box::pin(async move {
            let rows: Vec<(EventId, Json<CanonicalEvent>)> = sqlx::query_as(
                r#"
                SELECT id, document
                FROM events
                ORDER BY document->>'timestamp' COLLATE "C" DESC
                LIMIT $1
                "#,
            )
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;

            Ok(rows.into_iter().map(|(id, Json(event))| StoredEvent { id, event }).collect())
        })
    }

    fn ping(&self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            let _: (i32,) = sqlx::query_as("SELECT 1").fetch_one(&self.pool).await?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn store_can_be_created_without_connecting() {
        let pool = PgPool::connect_lazy("postgresql://localhost/github_events").unwrap();
        let store = PostgresEventStore::new(pool);
        assert!(!store.pool().is_closed());
    }
}
