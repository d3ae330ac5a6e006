//! Font identifier construction.

use std::sync::Arc;

use anyhow::Context;
use fontscope_core::{BoxedIdentifier, RetryPolicy, RetryingIdentifier};
use fontscope_gemini::GeminiClient;

use super::Cli;
use crate::TRACING_TARGET_CONFIG;

/// Creates the retrying font identifier from CLI configuration.
///
/// # Errors
///
/// Returns an error if the Gemini client cannot be initialized.
pub fn create_identifier(cli: &Cli) -> anyhow::Result<BoxedIdentifier> {
    let policy = RetryPolicy::from(&cli.retry);

    #[cfg(feature = "mock")]
    if cli.mock {
        tracing::warn!(
            target: TRACING_TARGET_CONFIG,
            "Using mock font identifier"
        );
        let mock = fontscope_core::mock::MockIdentifier::default();
        return Ok(Arc::new(RetryingIdentifier::with_policy(mock, policy)));
    }

    let config = cli.gemini.to_config()?;
    let client = GeminiClient::new(config, cli.gemini.credentials())
        .context("failed to create Gemini client")?;

    tracing::debug!(
        target: TRACING_TARGET_CONFIG,
        credentials = client.credentials_type(),
        max_attempts = policy.attempts(),
        "Font identifier created"
    );

    Ok(Arc::new(RetryingIdentifier::with_policy(client, policy)))
}
