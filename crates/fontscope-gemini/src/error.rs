//! Error types for fontscope-gemini
//!
//! Errors produced by a single `generateContent` call, and their mapping onto
//! [`fontscope_core::ErrorKind`] so the retry loop can classify them.

use fontscope_core::ErrorKind;

use crate::client::GeminiBuilderError;

/// Result type for all Gemini operations in this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Unified error type for Gemini operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP client/connection errors
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization errors when sending or receiving data
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Gemini API error response
    #[error("Gemini API error: {status} - {message}")]
    Api {
        status: u16,
        /// Canonical status name from the error body, e.g. `PERMISSION_DENIED`.
        code: Option<String>,
        message: String,
    },

    /// No API key was configured
    #[error("Missing API key")]
    MissingCredentials,

    /// The response carried no usable candidate text
    #[error("Empty response: {reason}")]
    EmptyResponse { reason: String },

    /// Invalid configuration
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl Error {
    /// Create an API error
    pub fn api_error(status: u16, code: Option<String>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            code,
            message: message.into(),
        }
    }

    /// Create an empty response error
    pub fn empty_response(reason: impl Into<String>) -> Self {
        Self::EmptyResponse {
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Error kind used by the retry loop and the controller.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Http(err) if err.is_timeout() => ErrorKind::Timeout,
            Error::Http(_) => ErrorKind::Network,
            Error::Serialization(_) | Error::EmptyResponse { .. } => ErrorKind::Parse,
            Error::UrlParse(_) | Error::InvalidConfig { .. } => ErrorKind::Configuration,
            Error::MissingCredentials => ErrorKind::Authentication,
            Error::Api { status, code, .. } => match (*status, code.as_deref()) {
                (401 | 403, _) | (_, Some("UNAUTHENTICATED" | "PERMISSION_DENIED")) => {
                    ErrorKind::Authentication
                }
                (429, _) | (_, Some("RESOURCE_EXHAUSTED")) => ErrorKind::RateLimited,
                (500..=599, _) => ErrorKind::ServiceUnavailable,
                _ => ErrorKind::Api,
            },
        }
    }
}

impl From<GeminiBuilderError> for Error {
    fn from(err: GeminiBuilderError) -> Self {
        Error::InvalidConfig {
            reason: err.to_string(),
        }
    }
}

impl From<Error> for fontscope_core::Error {
    fn from(err: Error) -> Self {
        let message = err.to_string();
        fontscope_core::Error::new(err.kind())
            .with_message(message)
            .with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        let kind = |status| Error::api_error(status, None, "boom").kind();

        assert_eq!(kind(401), ErrorKind::Authentication);
        assert_eq!(kind(403), ErrorKind::Authentication);
        assert_eq!(kind(429), ErrorKind::RateLimited);
        assert_eq!(kind(500), ErrorKind::ServiceUnavailable);
        assert_eq!(kind(503), ErrorKind::ServiceUnavailable);
        assert_eq!(kind(400), ErrorKind::Api);
        assert_eq!(kind(404), ErrorKind::Api);
    }

    #[test]
    fn status_name_overrides_code() {
        let error = Error::api_error(400, Some("PERMISSION_DENIED".into()), "bad key");
        assert_eq!(error.kind(), ErrorKind::Authentication);

        let error = Error::api_error(400, Some("RESOURCE_EXHAUSTED".into()), "quota");
        assert_eq!(error.kind(), ErrorKind::RateLimited);
    }

    #[test]
    fn converts_into_core_error() {
        let error: fontscope_core::Error = Error::empty_response("blocked: SAFETY").into();

        assert_eq!(error.kind, ErrorKind::Parse);
        assert!(error.is_invalid_response());
        assert_eq!(error.user_message(), "Empty response: blocked: SAFETY");
    }

    #[test]
    fn missing_credentials_are_authentication() {
        let error: fontscope_core::Error = Error::MissingCredentials.into();
        assert_eq!(error.kind, ErrorKind::Authentication);
        assert!(error.is_transient());
    }
}
