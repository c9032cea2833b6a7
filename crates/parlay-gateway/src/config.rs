//! Configuration management for the Parlay webhook relay.

use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use parlay_outbound::ClientConfig;
use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "parlay.toml";

/// How the relay answers an inbound text message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyMode {
    /// Reply with the text unchanged.
    Echo,
    /// Reply with a configured prefix before the text.
    Prefix,
    /// Reply with the text translated to the target language.
    Translate,
}

/// Complete service configuration with defaults, file, and environment
/// overrides.
///
/// Configuration is loaded in priority order:
/// 1. Environment variables (highest priority)
/// 2. Configuration file (`parlay.toml`)
/// 3. Built-in defaults (lowest priority)
///
/// Platform credentials have no usable defaults, so startup halts with a
/// validation error until `CHANNEL_SECRET` and `CHANNEL_ACCESS_TOKEN` are
/// provided. Translate mode additionally requires translator credentials.
///
/// # Example
///
/// ```no_run
/// use parlay_gateway::Config;
///
/// // Load configuration from all sources
/// let config = Config::load().expect("Failed to load configuration");
///
/// println!("Server will bind to {}:{}", config.host, config.port);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Platform credentials
    /// Channel secret used to verify webhook signatures.
    ///
    /// Environment variable: `CHANNEL_SECRET`
    #[serde(default = "default_channel_secret", alias = "CHANNEL_SECRET")]
    pub channel_secret: String,
    /// Access token for the platform messaging API.
    ///
    /// Environment variable: `CHANNEL_ACCESS_TOKEN`
    #[serde(default = "default_channel_access_token", alias = "CHANNEL_ACCESS_TOKEN")]
    pub channel_access_token: String,
    /// Base URL of the platform messaging API.
    ///
    /// Environment variable: `CHANNEL_API_BASE`
    #[serde(default = "default_channel_api_base", alias = "CHANNEL_API_BASE")]
    pub channel_api_base: String,

    // Reply behavior
    /// How inbound text messages are answered.
    ///
    /// Environment variable: `REPLY_MODE`
    #[serde(default = "default_reply_mode", alias = "REPLY_MODE")]
    pub reply_mode: ReplyMode,
    /// Prefix prepended to replies in prefix mode.
    ///
    /// Environment variable: `REPLY_PREFIX`
    #[serde(default = "default_reply_prefix", alias = "REPLY_PREFIX")]
    pub reply_prefix: String,
    /// Whether group replies are prefixed with the sender's display name.
    ///
    /// Environment variable: `PREFIX_SENDER_NAME`
    #[serde(default = "default_prefix_sender_name", alias = "PREFIX_SENDER_NAME")]
    pub prefix_sender_name: bool,

    // Translator
    /// Subscription key for the translation API.
    ///
    /// Environment variable: `TRANSLATOR_KEY`
    #[serde(default = "default_translator_key", alias = "TRANSLATOR_KEY")]
    pub translator_key: String,
    /// Resource region for the translation API.
    ///
    /// Environment variable: `TRANSLATOR_REGION`
    #[serde(default = "default_translator_region", alias = "TRANSLATOR_REGION")]
    pub translator_region: String,
    /// Base URL of the translation API.
    ///
    /// Environment variable: `TRANSLATOR_ENDPOINT`
    #[serde(default = "default_translator_endpoint", alias = "TRANSLATOR_ENDPOINT")]
    pub translator_endpoint: String,
    /// Language code replies are translated into.
    ///
    /// Environment variable: `TARGET_LANGUAGE`
    #[serde(default = "default_target_language", alias = "TARGET_LANGUAGE")]
    pub target_language: String,

    // Server
    /// Server bind address.
    ///
    /// Environment variable: `HOST`
    #[serde(default = "default_host", alias = "HOST")]
    pub host: String,
    /// Server bind port.
    ///
    /// Environment variable: `PORT`
    #[serde(default = "default_port", alias = "PORT")]
    pub port: u16,
    /// Inbound HTTP request timeout in seconds.
    ///
    /// Environment variable: `REQUEST_TIMEOUT`
    #[serde(default = "default_request_timeout", alias = "REQUEST_TIMEOUT")]
    pub request_timeout: u64,
    /// Timeout for outbound platform and translator calls in seconds.
    ///
    /// Environment variable: `OUTBOUND_TIMEOUT`
    #[serde(default = "default_outbound_timeout", alias = "OUTBOUND_TIMEOUT")]
    pub outbound_timeout: u64,

    // Logging
    /// Log level configuration.
    ///
    /// Environment variable: `RUST_LOG`
    #[serde(default = "default_log_level", alias = "RUST_LOG")]
    pub rust_log: String,
}

impl Config {
    /// Load configuration from defaults, config file, and environment variable
    /// overrides.
    ///
    /// Configuration priority (highest to lowest):
    /// 1. Environment variables (e.g., `CHANNEL_SECRET`, `PORT`)
    /// 2. Configuration file (`parlay.toml`)
    /// 3. Built-in defaults
    ///
    /// Fails when required credentials are missing or any value is out of
    /// range, so a misconfigured relay never starts listening.
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(""));

        let config: Self = figment.extract().context("Failed to load configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Convert to the outbound crate's client configuration.
    pub fn to_client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.outbound_timeout),
            user_agent: "Parlay/1.0".to_string(),
        }
    }

    /// Parse server socket address from host and port configuration.
    pub fn parse_server_addr(&self) -> Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.host, self.port);
        SocketAddr::from_str(&addr_str).context("Invalid server address")
    }

    /// Get access token with most characters masked for logging.
    pub fn channel_access_token_masked(&self) -> String {
        mask_secret(&self.channel_access_token)
    }

    /// Get translator key with most characters masked for logging.
    pub fn translator_key_masked(&self) -> String {
        mask_secret(&self.translator_key)
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<()> {
        if self.channel_secret.is_empty() {
            anyhow::bail!("channel_secret is required; set CHANNEL_SECRET");
        }

        if self.channel_access_token.is_empty() {
            anyhow::bail!("channel_access_token is required; set CHANNEL_ACCESS_TOKEN");
        }

        if self.port == 0 {
            anyhow::bail!("port must be greater than 0");
        }

        if self.request_timeout == 0 {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        if self.outbound_timeout == 0 {
            anyhow::bail!("outbound_timeout must be greater than 0");
        }

        if self.reply_mode == ReplyMode::Translate {
            if self.translator_key.is_empty() {
                anyhow::bail!("translator_key is required in translate mode; set TRANSLATOR_KEY");
            }
            if self.translator_region.is_empty() {
                anyhow::bail!(
                    "translator_region is required in translate mode; set TRANSLATOR_REGION"
                );
            }
            if self.target_language.is_empty() {
                anyhow::bail!("target_language must not be empty");
            }
        }

        if self.reply_mode == ReplyMode::Prefix && self.reply_prefix.is_empty() {
            anyhow::bail!("reply_prefix is required in prefix mode; set REPLY_PREFIX");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            channel_secret: default_channel_secret(),
            channel_access_token: default_channel_access_token(),
            channel_api_base: default_channel_api_base(),
            reply_mode: default_reply_mode(),
            reply_prefix: default_reply_prefix(),
            prefix_sender_name: default_prefix_sender_name(),
            translator_key: default_translator_key(),
            translator_region: default_translator_region(),
            translator_endpoint: default_translator_endpoint(),
            target_language: default_target_language(),
            host: default_host(),
            port: default_port(),
            request_timeout: default_request_timeout(),
            outbound_timeout: default_outbound_timeout(),
            rust_log: default_log_level(),
        }
    }
}

fn mask_secret(value: &str) -> String {
    if value.chars().count() <= 4 {
        return "***".to_string();
    }
    let head: String = value.chars().take(4).collect();
    format!("{head}***")
}

fn default_channel_secret() -> String {
    String::new()
}

fn default_channel_access_token() -> String {
    String::new()
}

fn default_channel_api_base() -> String {
    "https://api.line.me".to_string()
}

fn default_reply_mode() -> ReplyMode {
    ReplyMode::Translate
}

fn default_reply_prefix() -> String {
    String::new()
}

fn default_prefix_sender_name() -> bool {
    false
}

fn default_translator_key() -> String {
    String::new()
}

fn default_translator_region() -> String {
    String::new()
}

fn default_translator_endpoint() -> String {
    "https://api.cognitive.microsofttranslator.com".to_string()
}

fn default_target_language() -> String {
    "en".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_request_timeout() -> u64 {
    30
}

fn default_outbound_timeout() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}
