//! Client for the chat platform messaging API.
//!
//! Covers the two calls the relay makes: posting a reply against a reply
//! token and fetching a group member's profile for sender-name prefixes.
//! Every request carries the channel access token as a bearer credential.

use parlay_core::ReplyToken;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    client::{build_http_client, check_status, ClientConfig},
    error::{OutboundError, Result},
};

/// A message sent back to the platform.
///
/// The relay only sends text today; the tagged representation matches the
/// platform's message object so further kinds slot in as variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutgoingMessage {
    /// Plain text message.
    Text {
        /// The message text.
        text: String,
    },
}

impl OutgoingMessage {
    /// Creates a text message.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

/// Body of a reply call.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: &'a [OutgoingMessage],
}

/// Profile of a group member as returned by the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberProfile {
    /// Name the member displays in the group.
    pub display_name: String,
    /// Stable user identifier.
    pub user_id: String,
    /// Avatar URL, absent when the member has none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture_url: Option<String>,
}

/// HTTP client for the platform messaging API.
#[derive(Debug, Clone)]
pub struct MessagingClient {
    client: reqwest::Client,
    config: ClientConfig,
    base_url: String,
    access_token: String,
}

impl MessagingClient {
    /// Creates a messaging client against a platform base URL.
    ///
    /// # Errors
    ///
    /// Returns `OutboundError::Configuration` if the HTTP client cannot
    /// be built from the provided settings.
    pub fn new(
        config: ClientConfig,
        base_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self> {
        let client = build_http_client(&config)?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, config, base_url, access_token: access_token.into() })
    }

    /// Sends reply messages against a reply token.
    ///
    /// The token is single-use; the platform rejects a second reply with a
    /// client error.
    ///
    /// # Errors
    ///
    /// Returns categorized errors for transport failures, timeouts, and
    /// non-success platform responses.
    #[instrument(name = "send_reply", skip(self, messages), fields(reply_token = %reply_token))]
    pub async fn reply(
        &self,
        reply_token: &ReplyToken,
        messages: &[OutgoingMessage],
    ) -> Result<()> {
        let request = ReplyRequest { reply_token: reply_token.as_str(), messages };

        let response = self
            .client
            .post(format!("{}/v2/bot/message/reply", self.base_url))
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| OutboundError::from_request_error(&e, self.config.timeout))?;

        check_status(response).await?;
        debug!(messages = messages.len(), "Reply accepted by platform");
        Ok(())
    }

    /// Fetches a group member's profile.
    ///
    /// # Errors
    ///
    /// Returns categorized errors for transport failures and non-success
    /// responses, and `InvalidResponse` when the body does not decode as
    /// a profile.
    #[instrument(name = "group_member_profile", skip(self))]
    pub async fn group_member_profile(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> Result<MemberProfile> {
        let response = self
            .client
            .get(format!("{}/v2/bot/group/{group_id}/member/{user_id}", self.base_url))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| OutboundError::from_request_error(&e, self.config.timeout))?;

        let response = check_status(response).await?;
        let profile = response
            .json::<MemberProfile>()
            .await
            .map_err(|e| OutboundError::invalid_response(format!("malformed profile body: {e}")))?;

        debug!(display_name = %profile.display_name, "Fetched member profile");
        Ok(profile)
    }
}
