#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for Gemini client operations.
///
/// Use this target for logging client initialization, configuration, and client-level errors.
pub const TRACING_TARGET_CLIENT: &str = "fontscope_gemini::client";

/// Tracing target for font identification through Gemini.
pub const TRACING_TARGET_PROVIDER: &str = "fontscope_gemini::provider";

pub mod api;
mod client;
pub mod error;
#[doc(hidden)]
pub mod prelude;
mod provider;

pub use crate::client::{
    DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiBuilder, GeminiBuilderError, GeminiClient,
    GeminiConfig, GeminiCredentials,
};
pub use crate::error::{Error, Result};
