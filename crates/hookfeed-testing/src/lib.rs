//! Test infrastructure for hookfeed.
//!
//! [`TestApp`] wires the real router to an in-memory store and sends
//! requests in-process; [`fixtures`] builds realistic delivery bodies.

#![warn(missing_docs)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use hookfeed_api::{create_router, Config};
use hookfeed_core::storage::mock::InMemoryEventStore;
use serde_json::Value;
use tower::ServiceExt;

pub mod fixtures;

pub use fixtures::{PullRequestBuilder, PushBuilder};

/// Router plus the in-memory store behind it.
pub struct TestApp {
    /// Store the router writes to; inspect it or inject failures.
    pub store: InMemoryEventStore,
    router: Router,
}

impl TestApp {
    /// Creates an app with default configuration and an empty store.
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    /// Creates an app with the given configuration and an empty store.
    pub fn with_config(config: &Config) -> Self {
        let store = InMemoryEventStore::new();
        let router = create_router(Arc::new(store.clone()), config);
        Self { store, router }
    }

    /// Posts a JSON body to `/webhook`, with `X-GitHub-Event` when `kind` is set.
    pub async fn post_webhook(&self, kind: Option<&str>, body: &Value) -> Result<TestResponse> {
        let bytes = serde_json::to_vec(body).context("serialize webhook body")?;
        self.post_raw(kind, bytes).await
    }

    /// Posts raw bytes to `/webhook`.
    pub async fn post_raw(&self, kind: Option<&str>, body: impl Into<Body>) -> Result<TestResponse> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/webhook")
            .header("content-type", "application/json");
        if let Some(kind) = kind {
            builder = builder.header("X-GitHub-Event", kind);
        }

        self.send(builder.body(body.into()).context("build webhook request")?).await
    }

    /// Sends a `GET` request.
    pub async fn get(&self, uri: &str) -> Result<TestResponse> {
        let request =
            Request::builder().method("GET").uri(uri).body(Body::empty()).context("build request")?;
        self.send(request).await
    }

    /// Sends an arbitrary request through the router.
    pub async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await.context("execute request")?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .context("read response body")?;

        Ok(TestResponse { status, headers, body })
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Buffered response.
#[derive(Debug)]
pub struct TestResponse {
    /// Response status.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Raw response body.
    pub body: Bytes,
}

impl TestResponse {
    /// Parses the body as JSON.
    pub fn json(&self) -> Result<Value> {
        serde_json::from_slice(&self.body).context("parse response json")
    }
}
