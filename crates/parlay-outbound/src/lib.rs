//! Outbound HTTP clients for the Parlay webhook relay.
//!
//! Wraps the two upstream services the relay talks to: the chat platform
//! messaging API (replies and group member profiles) and the translation
//! API. Also provides the text message handler that ties them together
//! behind the dispatch trait from `parlay-core`.
//!
//! All calls share one bounded-timeout client configuration so a slow
//! upstream can never hold a webhook request open indefinitely.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod error;
pub mod handler;
pub mod messaging;
pub mod translate;

pub use client::ClientConfig;
pub use error::{OutboundError, Result};
pub use handler::{
    TextMessageHandler, TextTransform, OVER_LIMIT_REPLY, TRANSLATION_FAILED_REPLY,
};
pub use messaging::{MemberProfile, MessagingClient, OutgoingMessage};
pub use translate::Translator;
