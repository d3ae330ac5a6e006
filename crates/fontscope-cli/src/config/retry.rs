//! Retry policy configuration.

use std::time::Duration;

use clap::Args;
use fontscope_core::RetryPolicy;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Retry budget and backoff configuration.
///
/// Every failed attempt except the last waits
/// `2^attempt * base_delay_ms + random(0..max_jitter_ms)` milliseconds.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct RetryArgs {
    /// Total number of attempts, including the first one.
    #[arg(long, env = "FONTSCOPE_MAX_ATTEMPTS", default_value_t = 3)]
    pub max_attempts: u32,

    /// Backoff base delay in milliseconds.
    #[arg(long, env = "FONTSCOPE_BASE_DELAY_MS", default_value_t = 1000)]
    pub base_delay_ms: u64,

    /// Exclusive upper bound of the random jitter in milliseconds.
    #[arg(long, env = "FONTSCOPE_MAX_JITTER_MS", default_value_t = 1000)]
    pub max_jitter_ms: u64,

    /// Return malformed or schema-violating answers immediately instead of
    /// retrying them.
    #[arg(long, env = "FONTSCOPE_FAIL_FAST_ON_INVALID_RESPONSE")]
    #[serde(default)]
    pub fail_fast_on_invalid_response: bool,
}

impl RetryArgs {
    /// Logs configuration.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            max_attempts = self.max_attempts,
            base_delay_ms = self.base_delay_ms,
            max_jitter_ms = self.max_jitter_ms,
            fail_fast_on_invalid_response = self.fail_fast_on_invalid_response,
            "Retry configuration"
        );
    }
}

impl From<&RetryArgs> for RetryPolicy {
    fn from(args: &RetryArgs) -> Self {
        Self {
            max_attempts: args.max_attempts,
            base_delay: Duration::from_millis(args.base_delay_ms),
            max_jitter: Duration::from_millis(args.max_jitter_ms),
            retry_invalid_responses: !args.fail_fast_on_invalid_response,
        }
    }
}
