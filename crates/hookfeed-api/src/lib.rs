//! Hookfeed HTTP API.
//!
//! Receives webhook deliveries on `POST /webhook`, serves the latest
//! recorded activity on `GET /events`, and exposes health probes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::sync::Arc;

use hookfeed_core::EventStore;

pub mod config;
pub mod handlers;
pub mod server;

pub use config::Config;
pub use server::{create_router, start_server};

/// State shared by every handler.
///
/// The store is injected once at startup; handlers never reach for a global
/// connection.
#[derive(Clone)]
pub struct AppState {
    /// Event store gateway.
    pub store: Arc<dyn EventStore>,
}

impl AppState {
    /// Creates handler state over the given store.
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }
}
