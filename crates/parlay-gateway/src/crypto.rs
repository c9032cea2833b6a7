//! HMAC-SHA256 webhook signature validation.
//!
//! The platform signs every webhook body with the channel secret and sends
//! the base64-encoded digest in a request header. This module recomputes
//! the digest over the raw body bytes and compares in constant time.

use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the base64 HMAC-SHA256 signature of the request body.
pub const SIGNATURE_HEADER: &str = "x-line-signature";

/// Result of signature validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// Whether the signature is valid.
    pub is_valid: bool,
    /// Error message if validation failed.
    pub error_message: Option<String>,
}

impl ValidationResult {
    /// Creates a successful validation result.
    pub fn valid() -> Self {
        Self { is_valid: true, error_message: None }
    }

    /// Creates a failed validation result with error message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self { is_valid: false, error_message: Some(message.into()) }
    }
}

/// Signature computation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    /// Invalid secret key.
    InvalidSecret,
}

impl fmt::Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSecret => write!(f, "invalid secret key"),
        }
    }
}

impl std::error::Error for SignatureError {}

/// Computes the base64 HMAC-SHA256 signature for a payload.
///
/// This is the exact value the platform puts in [`SIGNATURE_HEADER`], so
/// tests and tooling can mint valid signatures from a known secret.
///
/// # Errors
///
/// Returns `SignatureError::InvalidSecret` if the secret cannot key the MAC.
pub fn sign(secret: &str, payload: &[u8]) -> Result<String, SignatureError> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::InvalidSecret)?;

    mac.update(payload);
    let digest = mac.finalize();
    Ok(BASE64.encode(digest.into_bytes()))
}

/// Validates a webhook signature using HMAC-SHA256.
///
/// Recomputes the signature over the raw body bytes with the channel
/// secret and compares it against the header value in constant time.
/// Returns a validation result with error details if verification fails.
pub fn validate_signature(payload: &[u8], signature: &str, secret: &str) -> ValidationResult {
    if signature.is_empty() {
        return ValidationResult::invalid("signature header is empty");
    }

    if secret.is_empty() {
        return ValidationResult::invalid("channel secret is empty");
    }

    let expected_signature = match sign(secret, payload) {
        Ok(sig) => sig,
        Err(err) => return ValidationResult::invalid(err.to_string()),
    };

    if timing_safe_eq(signature, &expected_signature) {
        ValidationResult::valid()
    } else {
        ValidationResult::invalid("signature mismatch")
    }
}

/// Timing-safe string comparison to prevent timing attacks.
///
/// Uses constant-time comparison to avoid leaking information
/// about the expected signature through timing analysis.
fn timing_safe_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut result = 0u8;
    for (a_byte, b_byte) in a_bytes.iter().zip(b_bytes.iter()) {
        result |= a_byte ^ b_byte;
    }

    result == 0
}
