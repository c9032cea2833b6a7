//! Event dispatch by kind and content type.
//!
//! Handlers register against an [`EventKey`] and the dispatcher walks a
//! decoded batch in order, looking each event up in the table. Events
//! without a registered handler are counted and skipped; a handler error
//! is logged and counted but never aborts the rest of the batch.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::events::{Event, MessageContent};

/// Content type of a message event, for routing purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Plain text message.
    Text,
    /// Image message.
    Image,
    /// Sticker message.
    Sticker,
    /// Content type without a dedicated route.
    Other,
}

/// Routing key derived from a decoded event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKey {
    /// Message event, keyed by content type.
    Message(MessageKind),
    /// Follow event.
    Follow,
    /// Unfollow event.
    Unfollow,
    /// Join event.
    Join,
    /// Leave event.
    Leave,
    /// Postback event.
    Postback,
}

impl EventKey {
    /// Derives the routing key for an event.
    ///
    /// Returns `None` for event kinds this service does not model, which
    /// the dispatcher skips without error.
    pub fn for_event(event: &Event) -> Option<Self> {
        match event {
            Event::Message(e) => Some(Self::Message(match e.message {
                MessageContent::Text(_) => MessageKind::Text,
                MessageContent::Image(_) => MessageKind::Image,
                MessageContent::Sticker(_) => MessageKind::Sticker,
                MessageContent::Unknown => MessageKind::Other,
            })),
            Event::Follow(_) => Some(Self::Follow),
            Event::Unfollow(_) => Some(Self::Unfollow),
            Event::Join(_) => Some(Self::Join),
            Event::Leave(_) => Some(Self::Leave),
            Event::Postback(_) => Some(Self::Postback),
            Event::Unknown => None,
        }
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message(MessageKind::Text) => write!(f, "message/text"),
            Self::Message(MessageKind::Image) => write!(f, "message/image"),
            Self::Message(MessageKind::Sticker) => write!(f, "message/sticker"),
            Self::Message(MessageKind::Other) => write!(f, "message/other"),
            Self::Follow => write!(f, "follow"),
            Self::Unfollow => write!(f, "unfollow"),
            Self::Join => write!(f, "join"),
            Self::Leave => write!(f, "leave"),
            Self::Postback => write!(f, "postback"),
        }
    }
}

/// Processes one decoded event.
///
/// Implementations run inside the request cycle after the response status
/// is already decided, so failures are reported through the returned
/// `Result` for logging rather than surfaced to the caller.
#[async_trait]
pub trait EventHandler: Send + Sync + fmt::Debug {
    /// Handles a single event.
    async fn handle(&self, event: &Event) -> anyhow::Result<()>;
}

/// Handler that accepts every event and does nothing.
#[derive(Debug, Default, Clone)]
pub struct NoOpEventHandler;

impl NoOpEventHandler {
    /// Creates a no-op handler.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventHandler for NoOpEventHandler {
    async fn handle(&self, _event: &Event) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Outcome counts for one dispatched batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Events a handler processed successfully.
    pub handled: usize,
    /// Events whose handler returned an error.
    pub failed: usize,
    /// Events with no routing key or no registered handler.
    pub ignored: usize,
}

/// Routing table from event key to handler.
#[derive(Debug, Default)]
pub struct Dispatcher {
    handlers: HashMap<EventKey, Arc<dyn EventHandler>>,
}

impl Dispatcher {
    /// Creates an empty dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for a key, replacing any previous registration.
    pub fn register(&mut self, key: EventKey, handler: Arc<dyn EventHandler>) {
        self.handlers.insert(key, handler);
    }

    /// Number of registered routes.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Runs handlers over a batch in order.
    ///
    /// Handlers run sequentially so replies preserve batch order. Handler
    /// errors are logged and counted; they never stop later events.
    pub async fn dispatch(&self, events: &[Event]) -> DispatchSummary {
        let mut summary = DispatchSummary::default();

        for event in events {
            let Some(key) = EventKey::for_event(event) else {
                debug!("Skipping event without routing key");
                summary.ignored += 1;
                continue;
            };

            let Some(handler) = self.handlers.get(&key) else {
                debug!(event_key = %key, "No handler registered for event");
                summary.ignored += 1;
                continue;
            };

            match handler.handle(event).await {
                Ok(()) => summary.handled += 1,
                Err(error) => {
                    warn!(event_key = %key, error = %error, "Event handler failed");
                    summary.failed += 1;
                }
            }
        }

        summary
    }
}
