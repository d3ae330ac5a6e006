//! Prelude for the fontscope-gemini crate
//!
//! This module re-exports the most commonly used types and traits from the crate
//! to provide a convenient single import for users.

pub use fontscope_core::FontIdentifier;

pub use crate::client::{GeminiClient, GeminiConfig, GeminiCredentials};
pub use crate::error::{Error, Result};
