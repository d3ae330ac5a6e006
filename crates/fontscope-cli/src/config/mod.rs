//! CLI configuration management.
//!
//! This module defines the complete CLI configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── image: PathBuf        # PNG or JPEG to analyze
//! ├── json: bool            # Machine readable output
//! ├── gemini: GeminiArgs    # API key, model, base URL, timeouts
//! └── retry: RetryArgs      # Attempts, backoff, fail-fast on invalid answers
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! fontscope --model gemini-2.5-pro sample.png
//!
//! # Or via environment variables
//! API_KEY=... GEMINI_MODEL=gemini-2.5-pro fontscope sample.png
//! ```

mod gemini;
mod provider;
mod retry;

use std::path::PathBuf;
use std::process;

use clap::Parser;
pub use gemini::GeminiArgs;
pub use provider::create_identifier;
pub use retry::RetryArgs;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "fontscope")]
#[command(about = "Identify the typeface used in an image")]
#[command(version)]
pub struct Cli {
    /// Image to analyze (.png, .jpg or .jpeg).
    pub image: PathBuf,

    /// Print the result as JSON instead of text.
    #[arg(long)]
    #[serde(default)]
    pub json: bool,

    /// Gemini endpoint and credentials.
    #[clap(flatten)]
    pub gemini: GeminiArgs,

    /// Retry budget and backoff.
    #[clap(flatten)]
    pub retry: RetryArgs,

    /// Answer with a canned analysis instead of calling Gemini.
    #[cfg(feature = "mock")]
    #[arg(long, env = "FONTSCOPE_MOCK")]
    #[serde(default)]
    pub mock: bool,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is loaded before clap parses arguments so its variables
    /// act as defaults.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    ///
    /// Logs go to stderr so stdout only carries the result.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    /// Logs build information at debug level.
    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    /// Logs configuration (no sensitive information).
    pub fn log(&self) {
        Self::log_build_info();

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            image = %self.image.display(),
            json = self.json,
            "Input configuration"
        );
        self.gemini.log();
        self.retry.log();
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [
            cfg!(feature = "dotenv").then_some("dotenv"),
            cfg!(feature = "mock").then_some("mock"),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
