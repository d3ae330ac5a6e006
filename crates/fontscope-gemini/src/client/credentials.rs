//! Authentication credentials
//!
//! This module provides the credential type for the Gemini client.

use std::fmt;

/// Authentication credentials for the Generative Language API
#[derive(Clone, Default, PartialEq, Eq)]
pub enum GeminiCredentials {
    /// API key sent as the `x-goog-api-key` header
    ApiKey(String),
    /// No authentication; every call fails with an authentication error
    #[default]
    None,
}

impl GeminiCredentials {
    /// Create API key credentials
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey(key.into())
    }

    /// Create credentials with no authentication
    pub fn none() -> Self {
        Self::None
    }

    /// API key credentials if `key` is present and not blank.
    pub fn from_optional(key: Option<String>) -> Self {
        match key {
            Some(key) if !key.trim().is_empty() => Self::ApiKey(key),
            _ => Self::None,
        }
    }

    /// Returns true if an API key is configured.
    pub fn is_configured(&self) -> bool {
        matches!(self, Self::ApiKey(_))
    }

    /// Get the credentials type (for debugging/logging purposes only).
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ApiKey(_) => "api_key",
            Self::None => "none",
        }
    }
}

impl fmt::Debug for GeminiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey(_) => f.debug_tuple("ApiKey").field(&"<redacted>").finish(),
            Self::None => f.write_str("None"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials() {
        match GeminiCredentials::api_key("test-key") {
            GeminiCredentials::ApiKey(key) => assert_eq!(key, "test-key"),
            _ => panic!("Expected API key credentials"),
        }

        assert_eq!(GeminiCredentials::none(), GeminiCredentials::None);
        assert_eq!(GeminiCredentials::default(), GeminiCredentials::None);
    }

    #[test]
    fn test_blank_key_is_no_credentials() {
        assert!(!GeminiCredentials::from_optional(None).is_configured());
        assert!(!GeminiCredentials::from_optional(Some("   ".into())).is_configured());
        assert!(GeminiCredentials::from_optional(Some("abc".into())).is_configured());
    }

    #[test]
    fn test_debug_redacts_key() {
        let debug = format!("{:?}", GeminiCredentials::api_key("super-secret"));

        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("redacted"));
    }
}
