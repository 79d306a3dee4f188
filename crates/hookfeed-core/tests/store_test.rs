//! Event store gateway tests.
//!
//! The in-memory tests run everywhere. The PostgreSQL round trip needs a
//! reachable database in `DATABASE_URL` and is ignored by default.

use hookfeed_core::{
    storage::mock::InMemoryEventStore, Action, CanonicalEvent, EventStore, HookfeedError,
    PostgresEventStore, RECENT_EVENTS_LIMIT,
};

fn event(request_id: &str, timestamp: &str) -> CanonicalEvent {
    CanonicalEvent {
        request_id: request_id.to_string(),
        author: "alice".to_string(),
        action: Action::Push,
        from_branch: "main".to_string(),
        to_branch: "main".to_string(),
        timestamp: timestamp.to_string(),
    }
}

#[tokio::test]
async fn recent_orders_by_timestamp_descending() {
    let store = InMemoryEventStore::new();
    store.append(event("b", "2024-01-02T00:00:00Z")).await.unwrap();
    store.append(event("c", "2024-01-03T00:00:00Z")).await.unwrap();
    store.append(event("a", "2024-01-01T00:00:00Z")).await.unwrap();

    let recent = store.recent(RECENT_EVENTS_LIMIT).await.unwrap();

    let ids: Vec<_> = recent.iter().map(|s| s.event.request_id.as_str()).collect();
    assert_eq!(ids, ["c", "b", "a"]);
}

#[tokio::test]
async fn recent_never_exceeds_limit() {
    let store = InMemoryEventStore::new();
    for day in 1..=25 {
        store.append(event(&format!("r{day}"), &format!("2024-01-{day:02}T00:00:00Z"))).await.unwrap();
    }

    let recent = store.recent(RECENT_EVENTS_LIMIT).await.unwrap();

    assert_eq!(recent.len(), RECENT_EVENTS_LIMIT);
    assert_eq!(recent[0].event.request_id, "r25");
    assert_eq!(recent[19].event.request_id, "r6");
}

#[tokio::test]
async fn recent_compares_timestamps_as_text() {
    let store = InMemoryEventStore::new();
    store.append(event("zulu", "2024-01-01T00:00:00Z")).await.unwrap();
    store.append(event("naive", "2024-01-01T00:00:00")).await.unwrap();

    let recent = store.recent(2).await.unwrap();

    assert_eq!(recent[0].event.request_id, "zulu");
}

#[tokio::test]
async fn unavailable_store_fails_every_operation() {
    let store = InMemoryEventStore::new();
    store.set_unavailable(true).await;

    assert!(matches!(
        store.append(event("a", "2024-01-01T00:00:00Z")).await,
        Err(HookfeedError::StoreUnavailable(_))
    ));
    assert!(store.recent(5).await.is_err());
    assert!(store.ping().await.is_err());

    store.set_unavailable(false).await;
    assert!(store.ping().await.is_ok());
}

#[tokio::test]
#[ignore = "requires PostgreSQL at DATABASE_URL"]
async fn postgres_store_round_trip() {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = sqlx::PgPool::connect(&url).await.expect("connect to database");
    let store = PostgresEventStore::new(pool);
    store.ensure_schema().await.expect("ensure schema");
    store.ensure_schema().await.expect("schema creation is idempotent");

    let first = store.append(event("pg-1", "2999-01-01T00:00:00Z")).await.unwrap();
    let second = store.append(event("pg-1", "2999-01-02T00:00:00Z")).await.unwrap();
    assert_ne!(first, second);

    let recent = store.recent(2).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].id, second);
    assert_eq!(recent[1].id, first);
    assert!(recent[0].event.timestamp >= recent[1].event.timestamp);

    store.ping().await.expect("ping");
}
