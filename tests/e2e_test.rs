//! End-to-end tests for the relay pipeline.
//!
//! Drives the full path with mocked upstreams: a signed webhook goes in,
//! passes the signature gate, is decoded and dispatched, and the reply
//! comes out against the platform mock. Upstream outages must never turn
//! into a non-200 callback response.

use std::{sync::Arc, time::Duration};

use anyhow::Result;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use parlay_core::{Dispatcher, EventKey, MessageKind};
use parlay_gateway::{
    crypto::SIGNATURE_HEADER,
    server::{create_router, AppState},
};
use parlay_outbound::{
    ClientConfig, MessagingClient, TextMessageHandler, TextTransform, Translator,
    TRANSLATION_FAILED_REPLY,
};
use test_harness::{
    batch, group_text_message_event, sign_payload, text_message_event, MockPlatform,
    MockTranslator,
};
use tower::ServiceExt;

const CHANNEL_SECRET: &str = "e2e-channel-secret";

fn client_config() -> ClientConfig {
    ClientConfig { timeout: Duration::from_secs(2), ..ClientConfig::default() }
}

fn router_for(dispatcher: Dispatcher) -> Router {
    create_router(AppState::new(CHANNEL_SECRET, dispatcher), Duration::from_secs(5))
}

fn translate_app(
    platform: &MockPlatform,
    translator: &MockTranslator,
    target_language: &str,
) -> Result<Router> {
    let messaging =
        Arc::new(MessagingClient::new(client_config(), platform.uri(), "e2e-access-token")?);
    let translate =
        Arc::new(Translator::new(client_config(), translator.uri(), "e2e-key", "e2e-region")?);

    let handler = TextMessageHandler::new(messaging, TextTransform::Translate {
        translator: translate,
        target_language: target_language.to_string(),
    });

    let mut dispatcher = Dispatcher::new();
    dispatcher.register(EventKey::Message(MessageKind::Text), Arc::new(handler));
    Ok(router_for(dispatcher))
}

fn echo_app(platform: &MockPlatform, sender_names: bool) -> Result<Router> {
    let messaging =
        Arc::new(MessagingClient::new(client_config(), platform.uri(), "e2e-access-token")?);

    let handler = TextMessageHandler::new(messaging, TextTransform::Identity)
        .with_sender_name_prefix(sender_names);

    let mut dispatcher = Dispatcher::new();
    dispatcher.register(EventKey::Message(MessageKind::Text), Arc::new(handler));
    Ok(router_for(dispatcher))
}

fn signed_callback(payload: &serde_json::Value) -> Request<Body> {
    let body = payload.to_string();
    let signature = sign_payload(CHANNEL_SECRET, body.as_bytes());
    Request::builder()
        .method("POST")
        .uri("/callback")
        .header("content-type", "application/json")
        .header(SIGNATURE_HEADER, signature)
        .body(Body::from(body))
        .unwrap()
}

async fn assert_ok_body(response: axum::response::Response) -> Result<()> {
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    assert_eq!(&bytes[..], b"OK");
    Ok(())
}

/// A text message is translated and the translation is sent as the reply.
#[tokio::test]
async fn translated_reply_round_trip() -> Result<()> {
    let platform = MockPlatform::start().await;
    let translator = MockTranslator::start().await;

    translator.mount_translation("Bonjour", "fr").await;
    platform.mount_reply_ok(1).await;

    let app = translate_app(&platform, &translator, "fr")?;
    let payload = batch(vec![text_message_event("tok1", "Hello")]);
    let response = app.oneshot(signed_callback(&payload)).await?;

    assert_ok_body(response).await?;

    let replies = platform.reply_bodies().await;
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0]["replyToken"], "tok1");
    assert_eq!(replies[0]["messages"][0]["text"], "Bonjour");
    Ok(())
}

/// A translator outage degrades to the fallback reply, never a non-200.
#[tokio::test]
async fn translator_outage_still_returns_ok() -> Result<()> {
    let platform = MockPlatform::start().await;
    let translator = MockTranslator::start().await;

    translator.mount_failure(500).await;
    platform.mount_reply_ok(1).await;

    let app = translate_app(&platform, &translator, "fr")?;
    let payload = batch(vec![text_message_event("tok1", "Hello")]);
    let response = app.oneshot(signed_callback(&payload)).await?;

    assert_ok_body(response).await?;

    let replies = platform.reply_bodies().await;
    assert_eq!(replies[0]["messages"][0]["text"], TRANSLATION_FAILED_REPLY);
    Ok(())
}

/// A reply outage is swallowed after the signature gate; callers see `OK`.
#[tokio::test]
async fn reply_outage_still_returns_ok() -> Result<()> {
    let platform = MockPlatform::start().await;
    platform.mount_reply_failure(500).await;

    let app = echo_app(&platform, false)?;
    let payload = batch(vec![text_message_event("tok1", "Hello")]);
    let response = app.oneshot(signed_callback(&payload)).await?;

    assert_ok_body(response).await
}

/// A bad signature is rejected before any upstream call is made.
#[tokio::test]
async fn invalid_signature_never_reaches_upstreams() -> Result<()> {
    let platform = MockPlatform::start().await;
    let translator = MockTranslator::start().await;

    translator.mount_translation("Bonjour", "fr").await;
    platform.mount_reply_ok(0).await;

    let app = translate_app(&platform, &translator, "fr")?;
    let body = batch(vec![text_message_event("tok1", "Hello")]).to_string();
    let signature = sign_payload("wrong-secret", body.as_bytes());
    let request = Request::builder()
        .method("POST")
        .uri("/callback")
        .header("content-type", "application/json")
        .header(SIGNATURE_HEADER, signature)
        .body(Body::from(body))?;

    let response = app.oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(platform.request_count().await, 0);
    assert_eq!(translator.request_count().await, 0);
    Ok(())
}

/// Replies for a multi-event batch go out in batch order.
#[tokio::test]
async fn batch_replies_preserve_order() -> Result<()> {
    let platform = MockPlatform::start().await;
    platform.mount_reply_ok(3).await;

    let app = echo_app(&platform, false)?;
    let payload = batch(vec![
        text_message_event("t1", "one"),
        text_message_event("t2", "two"),
        text_message_event("t3", "three"),
    ]);
    let response = app.oneshot(signed_callback(&payload)).await?;

    assert_ok_body(response).await?;

    let replies = platform.reply_bodies().await;
    let tokens: Vec<_> = replies.iter().map(|r| r["replyToken"].as_str().unwrap()).collect();
    let texts: Vec<_> =
        replies.iter().map(|r| r["messages"][0]["text"].as_str().unwrap()).collect();
    assert_eq!(tokens, ["t1", "t2", "t3"]);
    assert_eq!(texts, ["one", "two", "three"]);
    Ok(())
}

/// Group replies carry the sender's display name when enabled.
#[tokio::test]
async fn group_reply_prefixed_with_sender_name() -> Result<()> {
    let platform = MockPlatform::start().await;
    platform.mount_member_profile("G1", "U7", "Alice").await;
    platform.mount_reply_ok(1).await;

    let app = echo_app(&platform, true)?;
    let payload = batch(vec![group_text_message_event("G1", "U7", "tok1", "Hola")]);
    let response = app.oneshot(signed_callback(&payload)).await?;

    assert_ok_body(response).await?;

    let replies = platform.reply_bodies().await;
    assert_eq!(replies[0]["messages"][0]["text"], "Alice: Hola");
    Ok(())
}

/// Non-text events in a mixed batch are skipped without blocking replies.
#[tokio::test]
async fn mixed_batch_replies_only_to_text() -> Result<()> {
    let platform = MockPlatform::start().await;
    platform.mount_reply_ok(1).await;

    let app = echo_app(&platform, false)?;
    let payload = batch(vec![
        serde_json::json!({
            "type": "follow",
            "replyToken": "tokF",
            "source": {"type": "user", "userId": "U1"}
        }),
        text_message_event("tok1", "Hello"),
    ]);
    let response = app.oneshot(signed_callback(&payload)).await?;

    assert_ok_body(response).await?;

    let replies = platform.reply_bodies().await;
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0]["replyToken"], "tok1");
    Ok(())
}
