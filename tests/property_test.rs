//! Property-based tests for signature validation and batch decoding.
//!
//! These tests use randomly generated inputs to verify that the signature
//! gate and the event decoder behave correctly for arbitrary payloads, not
//! just the handful of fixtures the integration tests cover.

use parlay_core::{Event, MessageContent, WebhookBatch};
use parlay_gateway::crypto::{sign, validate_signature};
use proptest::prelude::*;

/// Creates property test configuration based on environment.
///
/// Uses environment variables:
/// - `PROPTEST_CASES`: Number of test cases (default: 20 for dev, 100 for CI)
/// - `CI`: If set to "true", uses CI configuration
fn proptest_config() -> ProptestConfig {
    let is_ci = std::env::var("CI").unwrap_or_default() == "true";
    let default_cases = if is_ci { 100 } else { 20 };

    let cases =
        std::env::var("PROPTEST_CASES").ok().and_then(|s| s.parse().ok()).unwrap_or(default_cases);

    ProptestConfig::with_cases(cases)
}

proptest! {
    #![proptest_config(proptest_config())]

    /// A signature computed over a payload always validates against it.
    #[test]
    fn signing_then_validating_accepts(
        payload in prop::collection::vec(any::<u8>(), 0..2048),
        secret in "[a-zA-Z0-9]{8,64}"
    ) {
        let signature = sign(&secret, &payload).unwrap();
        let result = validate_signature(&payload, &signature, &secret);

        prop_assert!(result.is_valid, "valid signature rejected: {:?}", result.error_message);
    }

    /// Flipping any single byte of the payload invalidates the signature.
    #[test]
    fn tampered_payload_rejected(
        payload in prop::collection::vec(any::<u8>(), 1..2048),
        secret in "[a-zA-Z0-9]{8,64}",
        flip in any::<usize>()
    ) {
        let signature = sign(&secret, &payload).unwrap();

        let mut tampered = payload.clone();
        let index = flip % tampered.len();
        tampered[index] ^= 0x01;

        let result = validate_signature(&tampered, &signature, &secret);
        prop_assert!(!result.is_valid, "tampered payload accepted at byte {}", index);
    }

    /// A signature produced under one secret never validates under another.
    #[test]
    fn wrong_secret_rejected(
        payload in prop::collection::vec(any::<u8>(), 0..2048),
        secret in "[a-zA-Z0-9]{8,64}",
        other_secret in "[a-zA-Z0-9]{8,64}"
    ) {
        prop_assume!(secret != other_secret);

        let signature = sign(&secret, &payload).unwrap();
        let result = validate_signature(&payload, &signature, &other_secret);

        prop_assert!(!result.is_valid, "signature accepted under the wrong secret");
    }

    /// HMAC-SHA256 signatures are always 44 base64 characters.
    #[test]
    fn signature_length_is_constant(
        payload in prop::collection::vec(any::<u8>(), 0..4096),
        secret in "[a-zA-Z0-9]{1,64}"
    ) {
        let signature = sign(&secret, &payload).unwrap();
        prop_assert_eq!(signature.len(), 44);
    }

    /// Decoding a batch preserves event count, order, and text content.
    #[test]
    fn batch_decoding_preserves_text_order(
        texts in prop::collection::vec("[a-zA-Z0-9 ]{1,40}", 1..8)
    ) {
        let events: Vec<_> = texts
            .iter()
            .enumerate()
            .map(|(i, text)| {
                serde_json::json!({
                    "type": "message",
                    "replyToken": format!("tok{i}"),
                    "message": {"type": "text", "text": text}
                })
            })
            .collect();
        let payload = serde_json::json!({"events": events}).to_string();

        let batch: WebhookBatch = serde_json::from_str(&payload).unwrap();
        prop_assert_eq!(batch.events.len(), texts.len());

        for (i, (event, expected)) in batch.events.iter().zip(texts.iter()).enumerate() {
            match event {
                Event::Message(message) => {
                    prop_assert_eq!(message.reply_token.as_str(), format!("tok{i}"));
                    match &message.message {
                        MessageContent::Text(text) => {
                            prop_assert_eq!(&text.text, expected);
                        }
                        other => prop_assert!(false, "expected text content, got {:?}", other),
                    }
                }
                other => prop_assert!(false, "expected message event, got {:?}", other),
            }
        }
    }
}
