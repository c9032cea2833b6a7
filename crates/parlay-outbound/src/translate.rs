//! Client for the translation API.
//!
//! Sends one text per call and returns the first translation from the
//! response. The API rejects texts over a documented character cap, so
//! the cap is enforced locally before any bytes go on the wire.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    client::{build_http_client, check_status, ClientConfig},
    error::{OutboundError, Result},
};

/// Maximum text length accepted by the translation API, in characters.
pub const MAX_TEXT_LEN: usize = 5000;

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    #[serde(rename = "Text")]
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    text: String,
}

/// HTTP client for the translation API.
#[derive(Debug, Clone)]
pub struct Translator {
    client: reqwest::Client,
    config: ClientConfig,
    endpoint: String,
    api_key: String,
    region: String,
}

impl Translator {
    /// Creates a translator against an API endpoint.
    ///
    /// # Errors
    ///
    /// Returns `OutboundError::Configuration` if the HTTP client cannot
    /// be built from the provided settings.
    pub fn new(
        config: ClientConfig,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Result<Self> {
        let client = build_http_client(&config)?;
        let endpoint = endpoint.into().trim_end_matches('/').to_string();

        Ok(Self { client, config, endpoint, api_key: api_key.into(), region: region.into() })
    }

    /// Translates a text into the target language.
    ///
    /// Texts over [`MAX_TEXT_LEN`] characters fail with `TextTooLong`
    /// before any request is made; a text of exactly the cap is sent.
    ///
    /// # Errors
    ///
    /// Returns categorized errors for transport failures, timeouts,
    /// non-success API responses, and bodies without a translation.
    #[instrument(
        name = "translate",
        skip(self, text),
        fields(chars = text.chars().count(), target = target_language)
    )]
    pub async fn translate(&self, text: &str, target_language: &str) -> Result<String> {
        let length = text.chars().count();
        if length > MAX_TEXT_LEN {
            return Err(OutboundError::text_too_long(length, MAX_TEXT_LEN));
        }

        let response = self
            .client
            .post(format!("{}/translate", self.endpoint))
            .query(&[("api-version", "3.0"), ("to", target_language)])
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .header("Ocp-Apim-Subscription-Region", &self.region)
            .json(&[TranslateRequest { text }])
            .send()
            .await
            .map_err(|e| OutboundError::from_request_error(&e, self.config.timeout))?;

        let response = check_status(response).await?;
        let results = response
            .json::<Vec<TranslateResponse>>()
            .await
            .map_err(|e| {
                OutboundError::invalid_response(format!("malformed translation body: {e}"))
            })?;

        let translated = results
            .into_iter()
            .next()
            .and_then(|result| result.translations.into_iter().next())
            .ok_or_else(|| OutboundError::invalid_response("empty translation result"))?;

        debug!(chars_out = translated.text.chars().count(), "Translation received");
        Ok(translated.text)
    }
}
