//! Core domain types for the Parlay webhook relay.
//!
//! Provides the platform event model, the handler registry that routes
//! decoded events by kind and content type, and the request-level error
//! taxonomy. The gateway and outbound crates build on these types.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod dispatch;
pub mod error;
pub mod events;

pub use dispatch::{DispatchSummary, Dispatcher, EventHandler, EventKey, MessageKind, NoOpEventHandler};
pub use error::{CallbackError, Result};
pub use events::{
    Event, EventSource, MessageContent, MessageEvent, ReplyToken, TextMessage, WebhookBatch,
};
