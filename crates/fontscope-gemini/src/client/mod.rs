//! Gemini client module
//!
//! This module provides the HTTP client for the `generateContent` endpoint.
//! It handles authentication, request/response processing, and connection management.

mod credentials;
mod gemini_client;
mod gemini_config;

pub use credentials::GeminiCredentials;
pub use gemini_client::GeminiClient;
pub use gemini_config::{
    DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiBuilder, GeminiBuilderError, GeminiConfig,
};
