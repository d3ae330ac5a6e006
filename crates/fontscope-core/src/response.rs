//! Parsing of raw model output into a [`FontAnalysisResponse`].

use crate::TRACING_TARGET_RESPONSE;
use crate::error::{Error, Result};
use crate::types::FontAnalysisResponse;

/// Removes a surrounding markdown code fence, if any.
///
/// Models occasionally wrap JSON in ```` ```json ... ``` ```` despite being
/// told not to; both the tagged and the bare fence are stripped.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();

    let body = match trimmed.strip_prefix("```") {
        Some(rest) => match rest.get(..4) {
            Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
            _ => rest,
        },
        None => trimmed,
    };

    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parses and validates model output.
///
/// Returns a [`Parse`] error when the text is not the expected JSON object and
/// a [`Schema`] error when it is but violates the output schema.
///
/// [`Parse`]: crate::ErrorKind::Parse
/// [`Schema`]: crate::ErrorKind::Schema
pub fn parse_analysis(text: &str) -> Result<FontAnalysisResponse> {
    let json = strip_code_fences(text);
    if json.is_empty() {
        return Err(Error::parse("model returned an empty response"));
    }

    let response: FontAnalysisResponse = serde_json::from_str(json).map_err(|error| {
        tracing::debug!(
            target: TRACING_TARGET_RESPONSE,
            error = %error,
            length = json.len(),
            "Model output is not a font analysis object"
        );
        Error::parse(format!("invalid analysis JSON: {error}")).with_source(error)
    })?;

    response.validate()?;
    Ok(response)
}
