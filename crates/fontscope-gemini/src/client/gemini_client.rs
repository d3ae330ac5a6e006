//! Gemini client implementation
//!
//! This module provides the client for the `generateContent` endpoint.
//! It handles authentication, request/response processing, and error decoding.

use reqwest::{Client as HttpClient, ClientBuilder};

use super::{GeminiConfig, GeminiCredentials};
use crate::TRACING_TARGET_CLIENT;
use crate::api::{ApiErrorBody, GenerateContentRequest, GenerateContentResponse};
use crate::error::{Error, Result};

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Client for the Gemini `generateContent` endpoint.
///
/// Each call is a single attempt; retries are layered on top by
/// `fontscope_core::RetryingIdentifier`.
///
/// # Examples
///
/// ```rust,ignore
/// use fontscope_gemini::{GeminiClient, GeminiConfig, GeminiCredentials};
/// use std::time::Duration;
///
/// let config = GeminiConfig::builder()
///     .with_model("gemini-2.5-flash")
///     .with_timeout(Duration::from_secs(30))
///     .build()?;
///
/// let credentials = GeminiCredentials::api_key("your-api-key");
/// let client = GeminiClient::new(config, credentials)?;
/// ```
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http_client: HttpClient,
    config: GeminiConfig,
    credentials: GeminiCredentials,
}

impl GeminiClient {
    /// Create a new Gemini client with the given configuration and credentials.
    ///
    /// Missing credentials are not an error here; every call then fails with
    /// [`Error::MissingCredentials`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: GeminiConfig, credentials: GeminiCredentials) -> Result<Self> {
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            base_url = %config.base_url,
            model = %config.model,
            credentials = credentials.kind(),
            "Creating Gemini client"
        );

        let http_client = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(Error::Http)?;

        if !credentials.is_configured() {
            tracing::warn!(
                target: TRACING_TARGET_CLIENT,
                "No API key configured, requests will be rejected"
            );
        }

        Ok(Self {
            http_client,
            config,
            credentials,
        })
    }

    /// Create a new Gemini client with default configuration.
    pub fn with_defaults(credentials: GeminiCredentials) -> Result<Self> {
        Self::new(GeminiConfig::default(), credentials)
    }

    /// Get the client configuration.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Get the credentials type (for debugging/logging purposes only).
    pub fn credentials_type(&self) -> &'static str {
        self.credentials.kind()
    }

    /// Sends one `generateContent` call.
    ///
    /// Non-success statuses are decoded from the Google error body when
    /// possible and fall back to the raw response text otherwise.
    pub async fn generate_content(
        &self,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let GeminiCredentials::ApiKey(key) = &self.credentials else {
            return Err(Error::MissingCredentials);
        };

        let url = self.config.generate_content_url()?;
        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            url = %url,
            "Sending generateContent request"
        );

        let response = self
            .http_client
            .post(url)
            .header(API_KEY_HEADER, key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let error = decode_api_error(status.as_u16(), &text);
            tracing::debug!(
                target: TRACING_TARGET_CLIENT,
                status = status.as_u16(),
                error = %error,
                "generateContent request rejected"
            );
            return Err(error);
        }

        let response: GenerateContentResponse = serde_json::from_str(&text)?;
        if let Some(usage) = &response.usage_metadata {
            tracing::debug!(
                target: TRACING_TARGET_CLIENT,
                prompt_tokens = usage.prompt_token_count,
                candidate_tokens = usage.candidates_token_count,
                total_tokens = usage.total_token_count,
                "generateContent request completed"
            );
        }

        Ok(response)
    }
}

fn decode_api_error(status: u16, text: &str) -> Error {
    match serde_json::from_str::<ApiErrorBody>(text) {
        Ok(body) => Error::api_error(status, body.error.status, body.error.message),
        Err(_) if text.trim().is_empty() => Error::api_error(status, None, "Unknown error"),
        Err(_) => Error::api_error(status, None, text.trim()),
    }
}
