//! Gemini client configuration
//!
//! This module provides configuration structures and builders for the Gemini client.

use std::time::Duration;

use derive_builder::Builder;
use url::Url;

use crate::error::{Error, Result};

/// Default base URL of the Generative Language API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";

/// Default multimodal model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Configuration for the Gemini client
///
/// Contains the endpoint, model and HTTP settings used for every
/// `generateContent` call.
#[derive(Debug, Clone, Builder)]
#[builder(
    name = "GeminiBuilder",
    pattern = "owned",
    setter(into, strip_option, prefix = "with"),
    build_fn(validate = "Self::validate_config")
)]
pub struct GeminiConfig {
    /// Base URL for the Generative Language API, always ending in `/`
    #[builder(setter(custom), default = "GeminiConfig::default_base_url()")]
    pub base_url: Url,
    /// Model name, e.g. `gemini-2.5-flash`
    #[builder(default = "DEFAULT_MODEL.to_owned()")]
    pub model: String,
    /// Request timeout duration
    #[builder(default = "Duration::from_secs(60)")]
    pub timeout: Duration,
    /// Connection timeout duration
    #[builder(default = "Duration::from_secs(10)")]
    pub connect_timeout: Duration,
    /// User agent string for requests
    #[builder(default = "GeminiConfig::default_user_agent()")]
    pub user_agent: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            model: DEFAULT_MODEL.to_owned(),
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
            user_agent: Self::default_user_agent(),
        }
    }
}

impl GeminiConfig {
    /// Create a new configuration builder
    pub fn builder() -> GeminiBuilder {
        GeminiBuilder::default()
    }

    /// Endpoint of the `generateContent` method for the configured model.
    pub fn generate_content_url(&self) -> Result<Url> {
        let path = format!("models/{}:generateContent", self.model);
        Ok(self.base_url.join(&path)?)
    }

    fn default_base_url() -> Url {
        DEFAULT_BASE_URL.parse().expect("Valid default URL")
    }

    fn default_user_agent() -> String {
        format!("fontscope-gemini/{}", env!("CARGO_PKG_VERSION"))
    }
}

impl GeminiBuilder {
    /// Set the base URL for the Generative Language API
    ///
    /// A missing trailing slash is added so relative joins keep the last
    /// path segment (`.../v1beta` and `.../v1beta/` are equivalent).
    pub fn with_base_url(mut self, url: &str) -> Result<Self> {
        let normalized = if url.ends_with('/') {
            url.to_owned()
        } else {
            format!("{url}/")
        };

        let parsed = Url::parse(&normalized)
            .map_err(|e| Error::invalid_config(format!("Invalid base URL '{}': {}", url, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(Error::invalid_config(format!(
                "Base URL '{}' cannot be used as a base",
                url
            )));
        }

        self.base_url = Some(parsed);
        Ok(self)
    }

    fn validate_config(&self) -> std::result::Result<(), String> {
        if let Some(model) = &self.model {
            if model.trim().is_empty() {
                return Err("Model must not be empty".to_string());
            }
            if model.contains('/') {
                return Err(format!("Model '{}' must not contain '/'", model));
            }
        }

        if let Some(timeout) = &self.timeout
            && timeout.is_zero()
        {
            return Err("Timeout must be greater than 0".to_string());
        }

        if let Some(connect_timeout) = &self.connect_timeout
            && connect_timeout.is_zero()
        {
            return Err("Connect timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeminiConfig::default();

        assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert!(config.user_agent.starts_with("fontscope-gemini/"));
    }

    #[test]
    fn test_builder_defaults_match_default() {
        let config = GeminiConfig::builder().build().expect("Valid config");
        let default = GeminiConfig::default();

        assert_eq!(config.base_url, default.base_url);
        assert_eq!(config.model, default.model);
        assert_eq!(config.timeout, default.timeout);
    }

    #[test]
    fn test_generate_content_url() {
        let config = GeminiConfig::default();

        assert_eq!(
            config.generate_content_url().expect("Valid URL").as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_custom_base_url_without_trailing_slash() {
        let config = GeminiConfig::builder()
            .with_base_url("http://127.0.0.1:8080/v1beta")
            .expect("Valid URL")
            .with_model("gemini-test")
            .build()
            .expect("Valid config");

        assert_eq!(config.base_url.as_str(), "http://127.0.0.1:8080/v1beta/");
        assert_eq!(
            config.generate_content_url().expect("Valid URL").as_str(),
            "http://127.0.0.1:8080/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = GeminiConfig::builder().with_base_url("not-a-valid-url");

        assert!(result.is_err());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let result = GeminiConfig::builder()
            .with_timeout(Duration::from_secs(0))
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn test_validation_empty_model() {
        let result = GeminiConfig::builder().with_model("  ").build();

        assert!(result.is_err());
    }

    #[test]
    fn test_builder_error_converts() {
        let error: Error = GeminiConfig::builder()
            .with_connect_timeout(Duration::ZERO)
            .build()
            .unwrap_err()
            .into();

        assert!(matches!(error, Error::InvalidConfig { .. }));
    }
}
