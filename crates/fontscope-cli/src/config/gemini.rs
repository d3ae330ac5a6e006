//! Gemini client configuration.

use std::time::Duration;

use anyhow::Context;
use clap::Args;
use fontscope_gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiConfig, GeminiCredentials};
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Gemini endpoint and credential configuration.
///
/// # Environment Variables
///
/// - `API_KEY` - Gemini API key (optional; without it every request is rejected)
/// - `GEMINI_MODEL` - Model name (default: gemini-2.5-flash)
/// - `GEMINI_BASE_URL` - API base URL
/// - `GEMINI_TIMEOUT` - Request timeout in seconds (default: 60)
/// - `GEMINI_CONNECT_TIMEOUT` - Connection timeout in seconds (default: 10)
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct GeminiArgs {
    /// API key sent with every request.
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    #[serde(skip_serializing, default)]
    pub api_key: Option<String>,

    /// Model used for identification.
    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Base URL of the Generative Language API.
    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Request timeout in seconds.
    #[arg(long, env = "GEMINI_TIMEOUT", default_value_t = 60)]
    pub timeout: u64,

    /// Connection timeout in seconds.
    #[arg(long, env = "GEMINI_CONNECT_TIMEOUT", default_value_t = 10)]
    pub connect_timeout: u64,
}

impl GeminiArgs {
    /// Builds the client configuration.
    pub fn to_config(&self) -> anyhow::Result<GeminiConfig> {
        let config = GeminiConfig::builder()
            .with_base_url(&self.base_url)?
            .with_model(self.model.as_str())
            .with_timeout(Duration::from_secs(self.timeout))
            .with_connect_timeout(Duration::from_secs(self.connect_timeout))
            .build()
            .context("invalid Gemini configuration")?;
        Ok(config)
    }

    /// Credentials from the configured API key, if any.
    pub fn credentials(&self) -> GeminiCredentials {
        GeminiCredentials::from_optional(self.api_key.clone())
    }

    /// Logs configuration (the API key is never logged).
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            model = %self.model,
            base_url = %self.base_url,
            timeout_secs = self.timeout,
            connect_timeout_secs = self.connect_timeout,
            api_key_set = self.credentials().is_configured(),
            "Gemini configuration"
        );
    }
}
