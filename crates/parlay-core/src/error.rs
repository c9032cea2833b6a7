//! Request-level error taxonomy for the callback endpoint.
//!
//! Every rejection before dispatch maps to one of these variants, each
//! carrying a stable bracketed code that appears in both logs and JSON
//! error bodies.

use thiserror::Error;

/// Result alias for callback processing.
pub type Result<T> = std::result::Result<T, CallbackError>;

/// Why a webhook request was rejected before dispatch.
#[derive(Debug, Error)]
pub enum CallbackError {
    /// Signature header absent from the request.
    #[error("[E1001] Missing signature: header absent from request")]
    MissingSignature,

    /// Signature header present but HMAC validation failed.
    #[error("[E1002] Invalid signature: HMAC validation failed")]
    InvalidSignature,

    /// Body passed signature validation but is not a decodable batch.
    #[error("[E1003] Decode error: {0}")]
    DecodeError(#[from] serde_json::Error),

    /// Body exceeds the accepted payload size.
    #[error("[E1004] Payload too large: size {size_bytes} bytes exceeds 1MB limit")]
    PayloadTooLarge {
        /// Observed body size in bytes.
        size_bytes: usize,
    },

    /// Any other pre-dispatch failure.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CallbackError {
    /// Stable error code for logs and API responses.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingSignature => "E1001",
            Self::InvalidSignature => "E1002",
            Self::DecodeError(_) => "E1003",
            Self::PayloadTooLarge { .. } => "E1004",
            Self::Other(_) => "E9999",
        }
    }
}
