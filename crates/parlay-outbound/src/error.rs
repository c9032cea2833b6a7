//! Error types for outbound API calls.
//!
//! Defines all error conditions that can occur while talking to the
//! platform messaging API or the translation API, including network
//! failures, HTTP errors, and malformed response bodies. Errors include
//! context for debugging and categorization in logs.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for outbound operations.
pub type Result<T> = std::result::Result<T, OutboundError>;

/// Comprehensive error types for outbound API calls.
#[derive(Debug, Clone, Error)]
pub enum OutboundError {
    /// Network-level connectivity failure.
    #[error("network connection failed: {message}")]
    Network {
        /// Error message describing the network failure
        message: String,
    },

    /// HTTP request timeout exceeded.
    #[error("request timeout after {timeout_seconds}s")]
    Timeout {
        /// Number of seconds before the request timed out
        timeout_seconds: u64,
    },

    /// HTTP response indicated client error (4xx).
    #[error("client error: HTTP {status_code}")]
    ClientError {
        /// HTTP status code (4xx)
        status_code: u16,
        /// Response body content
        body: String,
    },

    /// HTTP response indicated server error (5xx).
    #[error("server error: HTTP {status_code}")]
    ServerError {
        /// HTTP status code (5xx)
        status_code: u16,
        /// Response body content
        body: String,
    },

    /// Response arrived but its body was not in the expected shape.
    #[error("invalid response: {message}")]
    InvalidResponse {
        /// What was wrong with the response body
        message: String,
    },

    /// Text exceeds the translation API length cap.
    #[error("text too long: {length} characters exceeds limit of {limit}")]
    TextTooLong {
        /// Character count of the rejected text
        length: usize,
        /// Maximum accepted character count
        limit: usize,
    },

    /// Invalid client configuration.
    #[error("invalid client configuration: {message}")]
    Configuration {
        /// Configuration error message
        message: String,
    },
}

impl OutboundError {
    /// Creates a network error from a message.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network { message: message.into() }
    }

    /// Creates a timeout error.
    pub fn timeout(timeout_seconds: u64) -> Self {
        Self::Timeout { timeout_seconds }
    }

    /// Creates a client error from an HTTP response.
    pub fn client_error(status_code: u16, body: impl Into<String>) -> Self {
        Self::ClientError { status_code, body: body.into() }
    }

    /// Creates a server error from an HTTP response.
    pub fn server_error(status_code: u16, body: impl Into<String>) -> Self {
        Self::ServerError { status_code, body: body.into() }
    }

    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse { message: message.into() }
    }

    /// Creates a text too long error.
    pub fn text_too_long(length: usize, limit: usize) -> Self {
        Self::TextTooLong { length, limit }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    /// Categorizes a reqwest transport error.
    ///
    /// Timeouts map to [`OutboundError::Timeout`] with the configured
    /// timeout; everything else is a network error.
    pub fn from_request_error(error: &reqwest::Error, timeout: Duration) -> Self {
        if error.is_timeout() {
            return Self::timeout(timeout.as_secs());
        }
        if error.is_connect() {
            return Self::network(format!("connection failed: {error}"));
        }
        Self::network(error.to_string())
    }
}
