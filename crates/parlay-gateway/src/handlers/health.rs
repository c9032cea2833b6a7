//! Health check handler for service monitoring.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, instrument};

/// Liveness check endpoint for orchestration probes.
///
/// Returns a simple response indicating the service process is alive.
/// This is a minimal check that doesn't test the platform or translator,
/// focusing only on whether the HTTP server is responding.
#[instrument(name = "health_check")]
pub async fn health_check() -> Response {
    debug!("Performing liveness check");

    let response = serde_json::json!({
        "status": "alive",
        "timestamp": chrono::Utc::now(),
        "service": "parlay-gateway",
        "version": env!("CARGO_PKG_VERSION")
    });

    (StatusCode::OK, Json(response)).into_response()
}
