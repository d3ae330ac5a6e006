//! Prelude for the fontscope-core crate
//!
//! This module re-exports the most commonly used types and traits from the crate
//! to provide a convenient single import for users.

pub use crate::controller::{Controller, Phase, SharedController};
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::identifier::FontIdentifier;
pub use crate::preview::{PreviewRegistry, PreviewSurface};
pub use crate::request::AnalysisRequest;
pub use crate::retry::{RetryPolicy, RetryingIdentifier};
pub use crate::types::{FileSelection, FontAnalysisResponse, FontMatch, ImageFormat};
