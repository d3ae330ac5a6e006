//! Scripted font identifier for testing.
//!
//! # Feature Flag
//!
//! This module is only available when the `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! fontscope-core = { version = "...", features = ["test-utils"] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use fontscope_core::mock::{MockIdentifier, sample_response};
//! use fontscope_core::{ErrorKind, RetryingIdentifier};
//!
//! // Fails twice with a network error, then succeeds.
//! let mock = MockIdentifier::failing_then(2, sample_response());
//! let identifier = RetryingIdentifier::new(mock);
//! ```

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::time::Instant;

use crate::error::{Error, ErrorKind, Result};
use crate::identifier::FontIdentifier;
use crate::request::AnalysisRequest;
use crate::types::{FontAnalysisResponse, FontMatch};

/// Outcome of a single scripted attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum MockOutcome {
    /// Return this response.
    Succeed(FontAnalysisResponse),
    /// Fail with an error of this kind.
    Fail(ErrorKind),
}

impl MockOutcome {
    fn into_result(self) -> Result<FontAnalysisResponse> {
        match self {
            Self::Succeed(response) => Ok(response),
            Self::Fail(kind) => Err(Error::new(kind).with_message("scripted mock failure")),
        }
    }
}

/// Identifier that replays a script of outcomes, one per attempt.
///
/// Once the script runs out every further attempt uses the fallback outcome.
#[derive(Debug)]
pub struct MockIdentifier {
    script: Mutex<VecDeque<MockOutcome>>,
    fallback: MockOutcome,
    attempts: Mutex<Vec<Instant>>,
}

impl MockIdentifier {
    /// Creates a mock that always succeeds with `response`.
    pub fn new(response: FontAnalysisResponse) -> Self {
        Self::scripted(Vec::new(), MockOutcome::Succeed(response))
    }

    /// Creates a mock that always fails with `kind`.
    pub fn always_failing(kind: ErrorKind) -> Self {
        Self::scripted(Vec::new(), MockOutcome::Fail(kind))
    }

    /// Creates a mock that fails `failures` times with a network error and
    /// succeeds afterwards.
    pub fn failing_then(failures: usize, response: FontAnalysisResponse) -> Self {
        let script = vec![MockOutcome::Fail(ErrorKind::Network); failures];
        Self::scripted(script, MockOutcome::Succeed(response))
    }

    /// Creates a mock from an explicit script.
    pub fn scripted(script: Vec<MockOutcome>, fallback: MockOutcome) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            attempts: Mutex::new(Vec::new()),
        }
    }

    /// Number of attempts made so far.
    pub fn attempts(&self) -> usize {
        lock(&self.attempts).len()
    }

    /// Instants at which each attempt started.
    pub fn attempt_instants(&self) -> Vec<Instant> {
        lock(&self.attempts).clone()
    }
}

impl Default for MockIdentifier {
    fn default() -> Self {
        Self::new(sample_response())
    }
}

#[async_trait::async_trait]
impl FontIdentifier for MockIdentifier {
    async fn identify(&self, _request: &AnalysisRequest) -> Result<FontAnalysisResponse> {
        lock(&self.attempts).push(Instant::now());

        let outcome = lock(&self.script)
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        outcome.into_result()
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// A valid response identifying Georgia.
pub fn sample_response() -> FontAnalysisResponse {
    FontAnalysisResponse {
        primary_font_name: "Georgia".to_owned(),
        confidence_level: 0.87,
        matches: vec![
            FontMatch::new("Cambria", "Modern Serif"),
            FontMatch::new("Times New Roman", "Classic Serif"),
            FontMatch::new("Constantia", "Humanist Serif"),
        ],
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ImageFormat;

    #[tokio::test]
    async fn replays_script_then_fallback() {
        let mock = MockIdentifier::scripted(
            vec![MockOutcome::Fail(ErrorKind::Parse), MockOutcome::Fail(ErrorKind::Timeout)],
            MockOutcome::Succeed(sample_response()),
        );
        let request = AnalysisRequest::new("AAAA", ImageFormat::Jpeg);

        assert_eq!(mock.identify(&request).await.unwrap_err().kind, ErrorKind::Parse);
        assert_eq!(mock.identify(&request).await.unwrap_err().kind, ErrorKind::Timeout);
        assert!(mock.identify(&request).await.is_ok());
        assert!(mock.identify(&request).await.is_ok());
        assert_eq!(mock.attempts(), 4);
    }

    #[test]
    fn sample_response_is_valid() {
        assert!(sample_response().validate().is_ok());
    }
}
