//! Bounded exponential backoff around a [`FontIdentifier`].
//!
//! Every failed attempt except the last waits `2^attempt * base_delay` plus a
//! uniformly random jitter below `max_jitter` (attempt is zero-indexed), then
//! sends the whole request again. Individual failures are logged; callers
//! only ever see the success or a single consolidated [`Error::exhausted`].

use std::time::Duration;

use rand::Rng;

use crate::TRACING_TARGET_RETRY;
use crate::error::{Error, Result};
use crate::identifier::FontIdentifier;
use crate::request::AnalysisRequest;
use crate::types::FontAnalysisResponse;

/// Retry policy for font identification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one.
    pub max_attempts: u32,
    /// Delay before the second attempt, doubled for every further attempt.
    pub base_delay: Duration,
    /// Exclusive upper bound of the random jitter added to each delay.
    pub max_jitter: Duration,
    /// Whether unparseable or schema-violating responses are retried like
    /// network failures. When false they are returned immediately.
    pub retry_invalid_responses: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1_000),
            max_jitter: Duration::from_millis(1_000),
            retry_invalid_responses: true,
        }
    }
}

impl RetryPolicy {
    /// Policy that performs a single attempt.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Deterministic part of the delay after the failed zero-indexed `attempt`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2_u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    /// Full delay after the failed zero-indexed `attempt`, jitter included.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff(attempt).saturating_add(self.jitter())
    }

    /// Returns true if another attempt may follow the failed `attempt`.
    pub fn should_retry(&self, attempt: u32, error: &Error) -> bool {
        if !self.retries(error) {
            return false;
        }

        attempt.saturating_add(1) < self.attempts()
    }

    /// Returns true if `error` is of a kind this policy retries at all.
    ///
    /// Only errors of a single inference attempt are retried; invalid
    /// responses only while `retry_invalid_responses` is set.
    pub fn retries(&self, error: &Error) -> bool {
        error.is_transient() && (self.retry_invalid_responses || !error.is_invalid_response())
    }

    /// Effective number of attempts; at least one request is always sent.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    fn jitter(&self) -> Duration {
        let bound = u64::try_from(self.max_jitter.as_millis()).unwrap_or(u64::MAX);
        if bound == 0 {
            return Duration::ZERO;
        }

        Duration::from_millis(rand::rng().random_range(0..bound))
    }
}

/// Wraps an identifier with the retry policy.
#[derive(Debug, Clone)]
pub struct RetryingIdentifier<I> {
    inner: I,
    policy: RetryPolicy,
}

impl<I> RetryingIdentifier<I>
where
    I: FontIdentifier,
{
    /// Wraps `inner` with the default policy.
    pub fn new(inner: I) -> Self {
        Self::with_policy(inner, RetryPolicy::default())
    }

    /// Wraps `inner` with a custom policy.
    pub fn with_policy(inner: I, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// Returns the retry policy.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Returns the wrapped identifier.
    pub fn inner(&self) -> &I {
        &self.inner
    }
}

#[async_trait::async_trait]
impl<I> FontIdentifier for RetryingIdentifier<I>
where
    I: FontIdentifier,
{
    async fn identify(&self, request: &AnalysisRequest) -> Result<FontAnalysisResponse> {
        let max_attempts = self.policy.attempts();
        let mut attempt = 0;

        loop {
            let error = match self.inner.identify(request).await {
                Ok(response) => {
                    tracing::debug!(
                        target: TRACING_TARGET_RETRY,
                        request_id = %request.request_id(),
                        identifier = self.inner.name(),
                        attempt = attempt + 1,
                        "Font identified"
                    );
                    return Ok(response);
                }
                Err(error) => error,
            };

            tracing::warn!(
                target: TRACING_TARGET_RETRY,
                request_id = %request.request_id(),
                identifier = self.inner.name(),
                attempt = attempt + 1,
                max_attempts,
                error = %error,
                "Font identification attempt failed"
            );

            if !self.policy.retries(&error) {
                return Err(error);
            }

            if !self.policy.should_retry(attempt, &error) {
                tracing::error!(
                    target: TRACING_TARGET_RETRY,
                    request_id = %request.request_id(),
                    attempts = attempt + 1,
                    "Font identification failed after all attempts"
                );
                return Err(Error::exhausted().with_source(error));
            }

            let delay = self.policy.delay_for(attempt);
            tracing::debug!(
                target: TRACING_TARGET_RETRY,
                request_id = %request.request_id(),
                delay_ms = delay.as_millis() as u64,
                "Retrying font identification"
            );

            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
