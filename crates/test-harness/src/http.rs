//! HTTP mocking utilities for the upstream APIs.

use serde_json::Value;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Mock of the chat platform messaging API.
///
/// Mount expectations before driving the callback endpoint; wiremock
/// verifies `expect` counts when the server drops at the end of the test.
pub struct MockPlatform {
    server: MockServer,
}

impl MockPlatform {
    /// Starts a platform mock on a random port.
    pub async fn start() -> Self {
        Self { server: MockServer::start().await }
    }

    /// Returns the base URL of the mock.
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Mounts the reply endpoint accepting exactly `expected` calls.
    pub async fn mount_reply_ok(&self, expected: u64) {
        Mock::given(method("POST"))
            .and(path("/v2/bot/message/reply"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(expected)
            .mount(&self.server)
            .await;
    }

    /// Mounts the reply endpoint to always fail with the given status.
    pub async fn mount_reply_failure(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path("/v2/bot/message/reply"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Mounts a group member profile lookup returning the display name.
    pub async fn mount_member_profile(&self, group_id: &str, user_id: &str, display_name: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/v2/bot/group/{group_id}/member/{user_id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "displayName": display_name,
                "userId": user_id
            })))
            .mount(&self.server)
            .await;
    }

    /// Reply bodies received so far, in arrival order.
    pub async fn reply_bodies(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path() == "/v2/bot/message/reply")
            .map(|request| {
                serde_json::from_slice(&request.body).unwrap_or(Value::Null)
            })
            .collect()
    }

    /// Total number of requests the platform mock has received.
    pub async fn request_count(&self) -> usize {
        self.server.received_requests().await.unwrap_or_default().len()
    }
}

/// Mock of the translation API.
pub struct MockTranslator {
    server: MockServer,
}

impl MockTranslator {
    /// Starts a translator mock on a random port.
    pub async fn start() -> Self {
        Self { server: MockServer::start().await }
    }

    /// Returns the base URL of the mock.
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Mounts the translate endpoint returning a fixed translation.
    pub async fn mount_translation(&self, translated: &str, to: &str) {
        Mock::given(method("POST"))
            .and(path("/translate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"translations": [{"text": translated, "to": to}]}
            ])))
            .mount(&self.server)
            .await;
    }

    /// Mounts the translate endpoint to always fail with the given status.
    pub async fn mount_failure(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path("/translate"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Total number of requests the translator mock has received.
    pub async fn request_count(&self) -> usize {
        self.server.received_requests().await.unwrap_or_default().len()
    }
}
