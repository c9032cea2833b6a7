//! Webhook payload builders mirroring the platform's wire format.

use serde_json::{json, Value};

/// Builds a text message event from a direct chat.
pub fn text_message_event(reply_token: &str, text: &str) -> Value {
    json!({
        "type": "message",
        "replyToken": reply_token,
        "source": {"type": "user", "userId": "U-test-user"},
        "timestamp": 1_700_000_000_000_i64,
        "message": {"type": "text", "id": "M-test", "text": text}
    })
}

/// Builds a text message event from a group chat.
pub fn group_text_message_event(
    group_id: &str,
    user_id: &str,
    reply_token: &str,
    text: &str,
) -> Value {
    json!({
        "type": "message",
        "replyToken": reply_token,
        "source": {"type": "group", "groupId": group_id, "userId": user_id},
        "timestamp": 1_700_000_000_000_i64,
        "message": {"type": "text", "id": "M-test", "text": text}
    })
}

/// Wraps events in the batch envelope the platform posts.
pub fn batch(events: Vec<Value>) -> Value {
    json!({"destination": "U-test-bot", "events": events})
}
