//! Shared HTTP client construction for outbound calls.
//!
//! Both upstream clients are built from the same configuration so
//! timeouts and identification stay consistent, and both run responses
//! through the same status categorization.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{OutboundError, Result};

/// Configuration for outbound HTTP clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Timeout applied to every outbound request.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(10), user_agent: "Parlay/1.0".to_string() }
    }
}

/// Builds a reqwest client from the shared configuration.
pub(crate) fn build_http_client(config: &ClientConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.timeout)
        .user_agent(&config.user_agent)
        .build()
        .map_err(|e| OutboundError::configuration(format!("failed to build HTTP client: {e}")))
}

/// Categorizes non-success responses into the error taxonomy.
///
/// Passes 2xx responses through untouched; otherwise reads the body for
/// error context and maps 4xx to `ClientError`, everything else to
/// `ServerError`.
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let status_code = status.as_u16();
    let body = response.text().await.unwrap_or_default();

    if status.is_client_error() {
        Err(OutboundError::client_error(status_code, body))
    } else {
        Err(OutboundError::server_error(status_code, body))
    }
}
