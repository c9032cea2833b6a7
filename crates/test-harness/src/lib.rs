//! Test harness for Parlay integration tests.
//!
//! Provides wiremock-backed stand-ins for the chat platform and the
//! translation API, plus payload and signature builders for driving the
//! callback endpoint end to end.

pub mod http;
pub mod payloads;

// Re-export commonly used items
pub use http::{MockPlatform, MockTranslator};
pub use payloads::{batch, group_text_message_event, text_message_event};

/// Computes the signature header value the platform would send for a body.
pub fn sign_payload(secret: &str, body: &[u8]) -> String {
    parlay_gateway::crypto::sign(secret, body).expect("failed to sign test payload")
}
