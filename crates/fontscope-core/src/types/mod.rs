//! Common data types for fontscope.
//!
//! - **Image**: the user's selected file and the validated [`ImageAsset`]
//! - **Analysis**: the typed [`FontAnalysisResponse`] produced by a model

mod analysis;
mod image;

pub use analysis::{FontAnalysisResponse, FontMatch, MATCH_COUNT, confidence_percent};
pub use image::{FileSelection, ImageAsset, ImageFormat};
