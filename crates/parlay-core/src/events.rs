//! Platform webhook event model.
//!
//! Defines the JSON shapes the chat platform posts to the callback
//! endpoint: a batch envelope holding an array of events, each internally
//! tagged by kind and, for messages, by content type. Decoding is tolerant
//! of event and message kinds this service does not model; they map to
//! `Unknown` variants and are ignored by dispatch.

use std::fmt;

use chrono::{serde::ts_milliseconds_option, DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Decoded body of one webhook call.
///
/// The platform batches zero or more events per request. Events are
/// processed in array order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookBatch {
    /// Bot user ID the batch was delivered to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    /// Events in platform delivery order.
    pub events: Vec<Event>,
}

/// One decoded unit from the batch payload, tagged by kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Event {
    /// A user sent a message to the bot.
    Message(MessageEvent),
    /// A user added the bot as a friend.
    Follow(FollowEvent),
    /// A user blocked the bot.
    Unfollow(UnfollowEvent),
    /// The bot joined a group or room.
    Join(JoinEvent),
    /// The bot left a group or room.
    Leave(LeaveEvent),
    /// A user triggered a postback action.
    Postback(PostbackEvent),
    /// Event kind this service does not model.
    #[serde(other)]
    Unknown,
}

impl Event {
    /// Returns the reply token when the event carries one.
    pub fn reply_token(&self) -> Option<&ReplyToken> {
        match self {
            Self::Message(e) => Some(&e.reply_token),
            Self::Follow(e) => Some(&e.reply_token),
            Self::Join(e) => Some(&e.reply_token),
            Self::Postback(e) => Some(&e.reply_token),
            Self::Unfollow(_) | Self::Leave(_) | Self::Unknown => None,
        }
    }

    /// Returns the event source when the platform included one.
    pub fn source(&self) -> Option<&EventSource> {
        match self {
            Self::Message(e) => e.source.as_ref(),
            Self::Follow(e) => e.source.as_ref(),
            Self::Unfollow(e) => e.source.as_ref(),
            Self::Join(e) => e.source.as_ref(),
            Self::Leave(e) => e.source.as_ref(),
            Self::Postback(e) => e.source.as_ref(),
            Self::Unknown => None,
        }
    }
}

/// A message event carrying one piece of content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    /// Single-use token for replying to this event.
    pub reply_token: ReplyToken,
    /// Who sent the message and from where.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<EventSource>,
    /// When the platform accepted the event, epoch milliseconds.
    #[serde(
        default,
        with = "ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
    /// The message payload.
    pub message: MessageContent,
}

/// A user added the bot as a friend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowEvent {
    /// Single-use token for replying to this event.
    pub reply_token: ReplyToken,
    /// The user who followed the bot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<EventSource>,
    /// When the platform accepted the event, epoch milliseconds.
    #[serde(
        default,
        with = "ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
}

/// A user blocked the bot. Carries no reply token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnfollowEvent {
    /// The user who blocked the bot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<EventSource>,
    /// When the platform accepted the event, epoch milliseconds.
    #[serde(
        default,
        with = "ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
}

/// The bot joined a group or room.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinEvent {
    /// Single-use token for replying to this event.
    pub reply_token: ReplyToken,
    /// The group or room the bot joined.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<EventSource>,
    /// When the platform accepted the event, epoch milliseconds.
    #[serde(
        default,
        with = "ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
}

/// The bot left a group or room. Carries no reply token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveEvent {
    /// The group or room the bot left.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<EventSource>,
    /// When the platform accepted the event, epoch milliseconds.
    #[serde(
        default,
        with = "ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
}

/// A user triggered a postback action from a rich message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostbackEvent {
    /// Single-use token for replying to this event.
    pub reply_token: ReplyToken,
    /// The user who triggered the postback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<EventSource>,
    /// When the platform accepted the event, epoch milliseconds.
    #[serde(
        default,
        with = "ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
    /// Postback payload defined by the bot.
    pub postback: PostbackData,
}

/// Payload attached to a postback action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostbackData {
    /// Opaque data string set when the action was defined.
    pub data: String,
}

/// Where an event originated: direct chat, group, or room.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventSource {
    /// Direct chat with a single user.
    User(UserSource),
    /// Group chat the bot belongs to.
    Group(GroupSource),
    /// Multi-person room without group metadata.
    Room(RoomSource),
}

impl EventSource {
    /// Returns the sending user's ID when the platform included one.
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::User(s) => Some(&s.user_id),
            Self::Group(s) => s.user_id.as_deref(),
            Self::Room(s) => s.user_id.as_deref(),
        }
    }

    /// Returns the group ID for group-chat sources.
    pub fn group_id(&self) -> Option<&str> {
        match self {
            Self::Group(s) => Some(&s.group_id),
            Self::User(_) | Self::Room(_) => None,
        }
    }
}

/// Source of a direct-chat event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSource {
    /// Stable user identifier.
    pub user_id: String,
}

/// Source of a group-chat event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSource {
    /// Stable group identifier.
    pub group_id: String,
    /// Sending user, absent for some group-level events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Source of a room event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSource {
    /// Stable room identifier.
    pub room_id: String,
    /// Sending user, absent for some room-level events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// Message payload, tagged by content type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessageContent {
    /// Plain text message.
    Text(TextMessage),
    /// Image message; binary content is fetched separately.
    Image(ImageMessage),
    /// Sticker message.
    Sticker(StickerMessage),
    /// Content type this service does not model.
    #[serde(other)]
    Unknown,
}

/// Text message content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextMessage {
    /// Platform-assigned message ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The message text.
    pub text: String,
}

/// Image message content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageMessage {
    /// Platform-assigned message ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Sticker message content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickerMessage {
    /// Platform-assigned message ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Sticker set the sticker belongs to.
    pub package_id: String,
    /// Sticker within the set.
    pub sticker_id: String,
}

/// Single-use token issued per inbound event.
///
/// Required to send a reply; consumed by the platform on first use and
/// rejected on reuse. The newtype keeps tokens from being mixed up with
/// other strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplyToken(pub String);

impl ReplyToken {
    /// Creates a token from a raw string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReplyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ReplyToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

impl From<String> for ReplyToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}
