//! Result rendering for stdout.

use fontscope_core::{FontAnalysisResponse, FontMatch};
use serde::Serialize;

/// JSON view of an analysis.
#[derive(Debug, Serialize)]
struct AnalysisView<'a> {
    file: Option<&'a str>,
    primary_font_name: &'a str,
    confidence_level: f64,
    confidence_percent: u8,
    matches: &'a [FontMatch],
}

/// Renders an analysis as human readable text.
pub fn render_text(file: Option<&str>, analysis: &FontAnalysisResponse) -> String {
    let header = file
        .map(|file| format!("File:         {file}\n"))
        .unwrap_or_default();
    let matches: String = analysis
        .matches
        .iter()
        .enumerate()
        .map(|(index, candidate)| {
            format!(
                "  {}. {}: {}\n",
                index + 1,
                candidate.name,
                candidate.description
            )
        })
        .collect();

    format!(
        "{header}Primary font: {}\nConfidence:   {}\n\nClosest matches:\n{matches}",
        analysis.primary_font_name,
        analysis.confidence_label(),
    )
}

/// Renders an analysis as pretty printed JSON.
pub fn render_json(file: Option<&str>, analysis: &FontAnalysisResponse) -> serde_json::Result<String> {
    let view = AnalysisView {
        file,
        primary_font_name: &analysis.primary_font_name,
        confidence_level: analysis.confidence_level,
        confidence_percent: analysis.confidence_percent(),
        matches: &analysis.matches,
    };
    serde_json::to_string_pretty(&view)
}

#[cfg(test)]
mod tests {
    use fontscope_core::mock::sample_response;

    use super::*;

    fn analysis() -> FontAnalysisResponse {
        FontAnalysisResponse {
            confidence_level: 0.865,
            ..sample_response()
        }
    }

    #[test]
    fn text_without_file_has_exact_layout() {
        let expected = "\
Primary font: Georgia
Confidence:   87%

Closest matches:
  1. Cambria: Modern Serif
  2. Times New Roman: Classic Serif
  3. Constantia: Humanist Serif
";
        assert_eq!(render_text(None, &analysis()), expected);
    }

    #[test]
    fn text_shows_rounded_percentage_and_matches() {
        let text = render_text(Some("sample.png"), &analysis());

        assert!(text.contains("File:         sample.png"));
        assert!(text.contains("Primary font: Georgia"));
        assert!(text.contains("Confidence:   87%"));
        for (index, candidate) in analysis().matches.iter().enumerate() {
            assert!(text.contains(&format!("  {}. {}: ", index + 1, candidate.name)));
        }
    }

    #[test]
    fn json_carries_raw_and_rounded_confidence() {
        let json = render_json(None, &analysis()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["file"], serde_json::Value::Null);
        assert_eq!(value["primary_font_name"], "Georgia");
        assert_eq!(value["confidence_level"], 0.865);
        assert_eq!(value["confidence_percent"], 87);
        assert_eq!(value["matches"].as_array().map(Vec::len), Some(3));
    }
}
