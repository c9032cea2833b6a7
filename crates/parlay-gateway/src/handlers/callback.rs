//! Webhook callback handler with signature validation and dispatch.
//!
//! Accepts platform webhook calls, verifies the HMAC signature over the
//! raw body, decodes the event batch, and hands it to the dispatcher.
//! Once the signature and decode gates pass, the endpoint always answers
//! 200 `OK`; per-event handler failures are logged and counted but never
//! change the response, so the platform does not redeliver the batch.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use parlay_core::{CallbackError, WebhookBatch};
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::{
    crypto::{validate_signature, SIGNATURE_HEADER},
    server::AppState,
};

/// Maximum accepted webhook body size.
const MAX_PAYLOAD_SIZE: usize = 1024 * 1024;

/// Error response with code and message.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error details including code and message
    pub error: ErrorDetail,
}

/// Detailed error information.
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    /// Error code from the taxonomy (E1001-E1004)
    pub code: String,
    /// Human-readable error description
    pub message: String,
}

/// Handles a platform webhook callback.
///
/// Validates the signature header against the HMAC-SHA256 of the raw
/// body, decodes the batch, and dispatches events in order.
///
/// # Errors
///
/// Returns appropriate HTTP status codes:
/// - 400: Signature header missing or signature invalid
/// - 413: Payload too large (>1MB)
/// - 500: Body passed the signature gate but is not a decodable batch
#[instrument(
    name = "handle_callback",
    skip(state, headers, body),
    fields(content_length = body.len())
)]
pub async fn handle_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    info!("Processing webhook callback");

    if body.len() > MAX_PAYLOAD_SIZE {
        warn!(payload_size = body.len(), limit = MAX_PAYLOAD_SIZE, "Payload exceeds size limit");
        return create_error_response(
            StatusCode::PAYLOAD_TOO_LARGE,
            &CallbackError::PayloadTooLarge { size_bytes: body.len() },
        );
    }

    let Some(signature) = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok()) else {
        warn!("Signature header missing from request");
        return create_error_response(StatusCode::BAD_REQUEST, &CallbackError::MissingSignature);
    };

    let validation = validate_signature(&body, signature, &state.channel_secret);
    if !validation.is_valid {
        warn!(
            reason = validation.error_message.as_deref().unwrap_or("unknown"),
            "Webhook signature validation failed"
        );
        return create_error_response(StatusCode::BAD_REQUEST, &CallbackError::InvalidSignature);
    }

    let batch = match serde_json::from_slice::<WebhookBatch>(&body) {
        Ok(batch) => batch,
        Err(e) => {
            error!(error = %e, "Failed to decode webhook batch");
            return create_error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &CallbackError::DecodeError(e),
            );
        },
    };

    let summary = state.dispatcher.dispatch(&batch.events).await;
    info!(
        events = batch.events.len(),
        handled = summary.handled,
        failed = summary.failed,
        ignored = summary.ignored,
        "Batch dispatched"
    );

    (StatusCode::OK, "OK").into_response()
}

/// Creates a standardized error response.
fn create_error_response(status: StatusCode, error: &CallbackError) -> Response {
    let response = ErrorResponse {
        error: ErrorDetail { code: error.code().to_string(), message: error.to_string() },
    };
    (status, Json(response)).into_response()
}
