//! Common error type definitions.
//!
//! Every fallible operation in fontscope reports a structured [`Error`] whose
//! [`ErrorKind`] decides how it is treated:
//!
//! - **Validation**: rejected at file selection time, never sent anywhere.
//! - **Transient**: a single inference attempt failed (network, non-2xx,
//!   malformed output); retried by [`RetryingIdentifier`].
//! - **Terminal**: the retry budget is exhausted.
//! - **Unexpected**: anything escaping the retry loop unclassified.
//!
//! [`RetryingIdentifier`]: crate::RetryingIdentifier

use std::any::Any;

use strum::{AsRefStr, IntoStaticStr};
use thiserror::Error;
use tokio::task::JoinError;

/// Type alias for boxed dynamic errors that can be sent across threads.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for Results with our custom Error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Message shown when a selected file is not a PNG or JPEG image.
pub const INVALID_FILE_TYPE_MESSAGE: &str =
    "Invalid file type. Please upload a PNG, JPG, or JPEG file.";

/// Message shown when every inference attempt failed.
pub const EXHAUSTED_MESSAGE: &str = "Failed to identify font after multiple attempts.";

/// Message shown when an analysis was abandoned before it finished.
pub const CANCELLED_MESSAGE: &str = "Analysis was cancelled.";

/// Fallback message for errors that carry no message of their own.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred.";

/// Categories of errors that can occur in fontscope operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// The selected file failed validation.
    Validation,
    /// Network-related error occurred.
    Network,
    /// The request timed out.
    Timeout,
    /// Missing or rejected credentials.
    Authentication,
    /// Rate limit exceeded.
    RateLimited,
    /// Service temporarily unavailable.
    ServiceUnavailable,
    /// Any other non-success response from the inference service.
    Api,
    /// The response text could not be parsed as the expected JSON object.
    Parse,
    /// The response parsed but violated the declared schema.
    Schema,
    /// Every attempt of the retry budget failed.
    Exhausted,
    /// Invalid client configuration.
    Configuration,
    /// Failure not otherwise classified.
    Unexpected,
}

impl ErrorKind {
    /// Returns the snake_case name of this kind.
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// A structured error type for fontscope operations.
#[derive(Debug, Error)]
#[error("{}{}", kind.as_str(), message.as_ref().map(|m| format!(": {}", m)).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional error message.
    pub message: Option<String>,
    /// Optional source error.
    #[source]
    pub source: Option<BoxedError>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
        }
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds a source error to this error.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns true if the error was produced by a single inference attempt
    /// and may succeed when the request is sent again.
    pub fn is_transient(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Network
                | ErrorKind::Timeout
                | ErrorKind::Authentication
                | ErrorKind::RateLimited
                | ErrorKind::ServiceUnavailable
                | ErrorKind::Api
                | ErrorKind::Parse
                | ErrorKind::Schema
        )
    }

    /// Returns true if the service answered but the answer was unusable.
    pub fn is_invalid_response(&self) -> bool {
        matches!(self.kind, ErrorKind::Parse | ErrorKind::Schema)
    }

    /// Returns the message to show a user, falling back to a generic one.
    pub fn user_message(&self) -> String {
        match self.message.as_deref().map(str::trim) {
            Some(message) if !message.is_empty() => message.to_owned(),
            _ => UNKNOWN_ERROR_MESSAGE.to_owned(),
        }
    }
}

// Convenience constructors for common error scenarios
impl Error {
    /// Creates the validation error for an unsupported file type.
    pub fn invalid_file_type() -> Self {
        Self::new(ErrorKind::Validation).with_message(INVALID_FILE_TYPE_MESSAGE)
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse).with_message(message)
    }

    /// Creates a schema violation error.
    pub fn schema(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Schema).with_message(message)
    }

    /// Creates the terminal error returned once every attempt failed.
    pub fn exhausted() -> Self {
        Self::new(ErrorKind::Exhausted).with_message(EXHAUSTED_MESSAGE)
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration).with_message(message)
    }

    /// Creates an unexpected error without a message.
    pub fn unexpected() -> Self {
        Self::new(ErrorKind::Unexpected)
    }

    /// Creates the error applied when an analysis is abandoned before it resolved.
    pub fn cancelled() -> Self {
        Self::unexpected().with_message(CANCELLED_MESSAGE)
    }

    /// Classifies a failed analysis task.
    ///
    /// A panic payload that is a string becomes the message; anything else
    /// leaves the message empty so [`Error::user_message`] falls back.
    pub fn from_join_error(error: JoinError) -> Self {
        match error.try_into_panic() {
            Ok(payload) => match panic_message(payload.as_ref()) {
                Some(message) => Self::unexpected().with_message(message),
                None => Self::unexpected(),
            },
            Err(error) => Self::cancelled().with_source(error),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> Option<String> {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
}
