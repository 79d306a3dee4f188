//! HTTP server configuration and request routing.
//!
//! Requests flow through middleware in order:
//! 1. Request ID generation
//! 2. Request/response logging
//! 3. CORS handling
//! 4. Timeout enforcement (`request_timeout`, 30s default)
//! 5. Body size limit (25MB) on API routes
//! 6. Handler execution
//!
//! # Graceful Shutdown
//!
//! The server stops accepting connections on SIGTERM or Ctrl+C and lets
//! in-flight requests finish before returning.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{DefaultBodyLimit, Request},
    http::Method,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use hookfeed_core::EventStore;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{handlers, AppState, Config};

/// Largest webhook body accepted; the hosting platform caps deliveries at 25MB.
pub const MAX_PAYLOAD_SIZE: usize = 25 * 1024 * 1024;

/// Creates the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
///
/// use hookfeed_api::{create_router, Config};
/// use hookfeed_core::PostgresEventStore;
///
/// async fn start(store: PostgresEventStore) {
///     let app = create_router(Arc::new(store), &Config::default());
///     // Serve the app...
/// }
/// ```
pub fn create_router(store: Arc<dyn EventStore>, config: &Config) -> Router {
    let health_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/live", get(handlers::liveness_check));

    let api_routes = Router::new()
        .route("/webhook", post(handlers::receive_webhook))
        .route("/events", get(handlers::list_events))
        .layer(DefaultBodyLimit::max(MAX_PAYLOAD_SIZE));

    Router::new()
        .merge(health_routes)
        .merge(api_routes)
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(inject_request_id))
        .with_state(AppState::new(store))
}

/// Builds the CORS policy. A config that fails origin parsing allows no
/// cross-origin requests.
fn cors_layer(config: &Config) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods([Method::GET, Method::POST]).allow_headers(Any);

    if config.allows_any_origin() {
        return cors.allow_origin(Any);
    }

    let origins = config.cors_origins().unwrap_or_else(|e| {
        warn!(error = %e, "Rejecting all cross-origin requests");
        Vec::new()
    });
    cors.allow_origin(AllowOrigin::list(origins))
}

/// Middleware to inject request ID into all responses.
///
/// Adds X-Request-Id header for tracing requests across services.
async fn inject_request_id(req: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();

    let mut req = req;
    req.extensions_mut().insert(request_id.clone());

    let mut response = next.run(req).await;

    if let Ok(header_value) = request_id.parse() {
        response.headers_mut().insert("X-Request-Id", header_value);
    }

    response
}

/// Starts the HTTP server with graceful shutdown support.
///
/// # Errors
///
/// Returns `std::io::Error` if the address cannot be bound or the
/// listener fails.
pub async fn start_server(
    store: Arc<dyn EventStore>,
    config: &Config,
    addr: SocketAddr,
) -> Result<(), std::io::Error> {
    let app = create_router(store, config);

    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    info!("HTTP server listening on {}", actual_addr);

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    info!("HTTP server stopped gracefully");
    Ok(())
}

/// Waits for shutdown signal (CTRL+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received CTRL+C, starting graceful shutdown");
        },
        () = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }

    warn!("Waiting for in-flight requests to complete");
}
