//! HTTP server configuration and request routing.
//!
//! Provides Axum server setup with middleware stack, graceful shutdown,
//! and shared state for the webhook callback endpoint. Requests flow
//! through middleware in order:
//! 1. Request ID generation
//! 2. Request/response logging
//! 3. Timeout enforcement
//! 4. Handler execution
//!
//! # Graceful Shutdown
//!
//! The server handles SIGTERM gracefully:
//! - Stops accepting new connections
//! - Waits for in-flight requests
//! - Returns appropriate exit code

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use parlay_core::Dispatcher;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use uuid::Uuid;

use crate::handlers;

/// Shared state for the callback endpoint.
///
/// Holds the channel secret for signature validation and the dispatcher
/// the handler routes decoded events through. Cheap to clone; axum clones
/// it per request.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Secret used to verify webhook signatures.
    pub channel_secret: Arc<String>,
    /// Routing table for decoded events.
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    /// Creates state from a channel secret and a configured dispatcher.
    pub fn new(channel_secret: impl Into<String>, dispatcher: Dispatcher) -> Self {
        Self {
            channel_secret: Arc::new(channel_secret.into()),
            dispatcher: Arc::new(dispatcher),
        }
    }
}

/// Creates the Axum router with all routes and middleware.
///
/// Sets up:
/// - The webhook callback and health endpoints
/// - Request tracing and logging
/// - Timeout handling
/// - Shared application state
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
///
/// use parlay_core::Dispatcher;
/// use parlay_gateway::server::{create_router, AppState};
///
/// let state = AppState::new("channel-secret", Dispatcher::new());
/// let app = create_router(state, Duration::from_secs(30));
/// // Serve the app...
/// ```
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let health_routes = Router::new().route("/health", get(handlers::health_check));

    let api_routes = Router::new().route("/callback", post(handlers::handle_callback));

    Router::new()
        .merge(health_routes)
        .merge(api_routes)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(inject_request_id))
        .with_state(state)
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
/// Binds to the specified address and serves requests until shutdown
/// signal received. Handles graceful shutdown with timeout.
///
/// # Errors
///
/// Returns `std::io::Error` if:
/// - Port is already in use
/// - Network interface unavailable
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
///
/// use parlay_core::Dispatcher;
/// use parlay_gateway::server::{start_server, AppState};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let state = AppState::new("channel-secret", Dispatcher::new());
///     let addr = "127.0.0.1:8000".parse()?;
///
///     start_server(state, addr, Duration::from_secs(30)).await?;
///     Ok(())
/// }
/// ```
pub async fn start_server(
    state: AppState,
    addr: SocketAddr,
    request_timeout: Duration,
) -> Result<(), std::io::Error> {
    let app = create_router(state, request_timeout);

    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    info!("HTTP server listening on {}", actual_addr);

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    info!("HTTP server stopped gracefully");
    Ok(())
}

/// Waits for shutdown signal (CTRL+C or SIGTERM).
///
/// Enables graceful shutdown on:
/// - CTRL+C (SIGINT) - Development
/// - SIGTERM - Kubernetes/Docker
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
