//! Text message handler: transform inbound text and reply.
//!
//! Implements the dispatch trait for text messages. The reply text is
//! produced by the configured transform, optionally prefixed with the
//! sender's display name in group chats. Translation problems degrade to
//! fixed fallback strings so an upstream outage never silences the bot;
//! only the reply call itself can fail the handler.

use std::sync::Arc;

use async_trait::async_trait;
use parlay_core::{Event, EventHandler, EventSource, MessageContent};
use tracing::{debug, instrument, warn};

use crate::{
    error::OutboundError,
    messaging::{MessagingClient, OutgoingMessage},
    translate::Translator,
};

/// Reply sent when the inbound text exceeds the translation length cap.
pub const OVER_LIMIT_REPLY: &str = "(message too long to translate)";

/// Reply sent when the translation API call fails.
pub const TRANSLATION_FAILED_REPLY: &str = "(translation unavailable)";

/// How inbound text becomes reply text.
#[derive(Debug, Clone)]
pub enum TextTransform {
    /// Echo the text unchanged.
    Identity,
    /// Prepend a fixed prefix.
    Prefix(String),
    /// Translate into a target language.
    Translate {
        /// Translation API client.
        translator: Arc<Translator>,
        /// Language code to translate into.
        target_language: String,
    },
}

/// Event handler that replies to text messages.
#[derive(Debug)]
pub struct TextMessageHandler {
    messaging: Arc<MessagingClient>,
    transform: TextTransform,
    prefix_sender_name: bool,
}

impl TextMessageHandler {
    /// Creates a handler that replies through the given messaging client.
    pub fn new(messaging: Arc<MessagingClient>, transform: TextTransform) -> Self {
        Self { messaging, transform, prefix_sender_name: false }
    }

    /// Enables prefixing group replies with the sender's display name.
    #[must_use]
    pub fn with_sender_name_prefix(mut self, enabled: bool) -> Self {
        self.prefix_sender_name = enabled;
        self
    }

    /// Produces the reply text for an inbound text.
    ///
    /// Translation failures never propagate: an over-cap text and an API
    /// failure each map to their fallback string.
    async fn transform_text(&self, text: &str) -> String {
        match &self.transform {
            TextTransform::Identity => text.to_string(),
            TextTransform::Prefix(prefix) => format!("{prefix}{text}"),
            TextTransform::Translate { translator, target_language } => {
                match translator.translate(text, target_language).await {
                    Ok(translated) => translated,
                    Err(OutboundError::TextTooLong { length, limit }) => {
                        warn!(length, limit, "Message exceeds translation length cap");
                        OVER_LIMIT_REPLY.to_string()
                    },
                    Err(error) => {
                        warn!(error = %error, "Translation failed, sending fallback reply");
                        TRANSLATION_FAILED_REPLY.to_string()
                    },
                }
            },
        }
    }

    /// Resolves the sender-name prefix for group messages.
    ///
    /// Returns `None` when the feature is off, the message is not from a
    /// group, the sender is unknown, or the profile lookup fails. Lookup
    /// failures degrade to an unprefixed reply rather than failing the
    /// handler.
    async fn sender_prefix(&self, source: Option<&EventSource>) -> Option<String> {
        if !self.prefix_sender_name {
            return None;
        }

        let source = source?;
        let group_id = source.group_id()?;
        let user_id = source.user_id()?;

        match self.messaging.group_member_profile(group_id, user_id).await {
            Ok(profile) => Some(format!("{}: ", profile.display_name)),
            Err(error) => {
                warn!(error = %error, "Profile lookup failed, replying without sender name");
                None
            },
        }
    }
}

#[async_trait]
impl EventHandler for TextMessageHandler {
    #[instrument(name = "handle_text_message", skip(self, event))]
    async fn handle(&self, event: &Event) -> anyhow::Result<()> {
        let Event::Message(message_event) = event else {
            debug!("Ignoring non-message event");
            return Ok(());
        };

        let MessageContent::Text(text_message) = &message_event.message else {
            debug!("Ignoring non-text message content");
            return Ok(());
        };

        let mut reply_text = self.transform_text(&text_message.text).await;

        if let Some(prefix) = self.sender_prefix(message_event.source.as_ref()).await {
            reply_text = format!("{prefix}{reply_text}");
        }

        self.messaging
            .reply(&message_event.reply_token, &[OutgoingMessage::text(reply_text)])
            .await?;

        Ok(())
    }
}
