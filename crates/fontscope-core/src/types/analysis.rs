//! Typed result of a font analysis.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of alternative matches a response must carry.
pub const MATCH_COUNT: usize = 3;

/// An alternative candidate typeface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontMatch {
    /// Font family name, e.g. `Cambria`.
    pub name: String,
    /// Visual classification, e.g. `Modern Serif`.
    pub description: String,
}

impl FontMatch {
    /// Creates a new match.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Font identification returned by a multimodal model.
///
/// Field names follow the JSON schema the model is constrained to, so the
/// type deserializes directly from the model output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontAnalysisResponse {
    /// Closest identified font name.
    pub primary_font_name: String,
    /// Confidence for the primary match, between 0.0 and 1.0.
    pub confidence_level: f64,
    /// Closest alternative matches, best first.
    pub matches: Vec<FontMatch>,
}

impl FontAnalysisResponse {
    /// Checks the invariants the output schema promises.
    pub fn validate(&self) -> Result<()> {
        if self.primary_font_name.trim().is_empty() {
            return Err(Error::schema("primary_font_name must not be empty"));
        }

        if !self.confidence_level.is_finite() || !(0.0..=1.0).contains(&self.confidence_level) {
            return Err(Error::schema(format!(
                "confidence_level {} is outside [0, 1]",
                self.confidence_level
            )));
        }

        if self.matches.len() != MATCH_COUNT {
            return Err(Error::schema(format!(
                "expected {} matches, got {}",
                MATCH_COUNT,
                self.matches.len()
            )));
        }

        if let Some(index) = self.matches.iter().position(|m| m.name.trim().is_empty()) {
            return Err(Error::schema(format!("match {} has an empty name", index + 1)));
        }

        Ok(())
    }

    /// Confidence as an integer percentage.
    pub fn confidence_percent(&self) -> u8 {
        confidence_percent(self.confidence_level)
    }

    /// Confidence formatted for display, e.g. `87%`.
    pub fn confidence_label(&self) -> String {
        format!("{}%", self.confidence_percent())
    }
}

/// Converts a confidence in [0, 1] into a percentage rounded half up.
///
/// The scaled value is first snapped to six decimals so binary artifacts such
/// as `0.285 * 100 = 28.499999999999996` still round up.
pub fn confidence_percent(level: f64) -> u8 {
    if !level.is_finite() {
        return 0;
    }

    let scaled = ((level * 100.0) * 1e6).round() / 1e6;
    scaled.round().clamp(0.0, 100.0) as u8
}
