//! Parlay webhook relay service.
//!
//! Main entry point for the relay. Initializes logging, loads
//! configuration, wires the reply pipeline, and serves the callback
//! endpoint until shutdown.

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use parlay_core::{Dispatcher, EventKey, MessageKind};
use parlay_gateway::{AppState, Config, ReplyMode};
use parlay_outbound::{MessagingClient, TextMessageHandler, TextTransform, Translator};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with structured logging
    init_tracing();

    info!("Starting Parlay webhook relay");

    // Load configuration; missing credentials halt startup here
    let config = Config::load()?;
    info!(
        reply_mode = ?config.reply_mode,
        api_base = %config.channel_api_base,
        target_language = %config.target_language,
        access_token = %config.channel_access_token_masked(),
        "Configuration loaded"
    );

    let dispatcher = build_dispatcher(&config)?;
    let state = AppState::new(config.channel_secret.clone(), dispatcher);

    let addr = config.parse_server_addr()?;
    let request_timeout = Duration::from_secs(config.request_timeout);

    info!(addr = %addr, "Parlay is ready to receive webhooks");

    parlay_gateway::start_server(state, addr, request_timeout)
        .await
        .context("Server failed")?;

    info!("Parlay shutdown complete");
    Ok(())
}

/// Initializes tracing with environment-based configuration.
fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,parlay=debug,tower_http=debug"))
        .expect("Invalid RUST_LOG environment variable");

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}

/// Wires the reply pipeline the configuration asks for.
///
/// All reply modes route text messages through the same handler; the
/// mode only changes the transform. Other event kinds stay unrouted and
/// are counted as ignored by dispatch.
fn build_dispatcher(config: &Config) -> Result<Dispatcher> {
    let client_config = config.to_client_config();

    let messaging = Arc::new(MessagingClient::new(
        client_config.clone(),
        config.channel_api_base.clone(),
        config.channel_access_token.clone(),
    )?);

    let transform = match config.reply_mode {
        ReplyMode::Echo => TextTransform::Identity,
        ReplyMode::Prefix => TextTransform::Prefix(config.reply_prefix.clone()),
        ReplyMode::Translate => TextTransform::Translate {
            translator: Arc::new(Translator::new(
                client_config,
                config.translator_endpoint.clone(),
                config.translator_key.clone(),
                config.translator_region.clone(),
            )?),
            target_language: config.target_language.clone(),
        },
    };

    let handler = TextMessageHandler::new(messaging, transform)
        .with_sender_name_prefix(config.prefix_sender_name);

    let mut dispatcher = Dispatcher::new();
    dispatcher.register(EventKey::Message(MessageKind::Text), Arc::new(handler));

    info!(handlers = dispatcher.handler_count(), "Dispatch table ready");
    Ok(dispatcher)
}
