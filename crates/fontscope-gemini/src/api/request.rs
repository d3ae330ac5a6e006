use fontscope_core::AnalysisRequest;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of a `generateContent` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// A role-tagged list of parts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A single text or inline-data part.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<Blob>,
    /// Set on reasoning parts that are not part of the answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
}

/// Base64 encoded inline bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub mime_type: String,
    pub data: String,
}

/// Output constraints for the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Value>,
}

impl Content {
    /// User turn with the given parts.
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Some("user".to_owned()),
            parts,
        }
    }

    /// Role-less content, as used for system instructions.
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }
}

impl Part {
    /// Plain text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Inline data part.
    pub fn inline_data(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            inline_data: Some(Blob {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
            ..Self::default()
        }
    }
}

impl From<&AnalysisRequest> for GenerateContentRequest {
    fn from(request: &AnalysisRequest) -> Self {
        let parts = vec![
            Part::text(request.user_query()),
            Part::inline_data(request.mime_type(), request.data()),
        ];

        Self {
            contents: vec![Content::user(parts)],
            system_instruction: Some(Content::system(request.system_instruction())),
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_owned(),
                response_schema: Some(request.response_schema().clone()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use fontscope_core::{ImageFormat, SYSTEM_INSTRUCTION, USER_QUERY};
    use serde_json::json;

    use super::*;

    #[test]
    fn serializes_wire_format() {
        let request = AnalysisRequest::new("aGVsbG8=", ImageFormat::Jpeg);
        let body = serde_json::to_value(GenerateContentRequest::from(&request)).unwrap();

        assert_eq!(
            body["contents"],
            json!([{
                "role": "user",
                "parts": [
                    { "text": USER_QUERY },
                    { "inlineData": { "mimeType": "image/jpeg", "data": "aGVsbG8=" } }
                ]
            }])
        );
        assert_eq!(
            body["systemInstruction"],
            json!({ "parts": [{ "text": SYSTEM_INSTRUCTION }] })
        );
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(
            body["generationConfig"]["responseSchema"]["required"],
            json!(["primary_font_name", "confidence_level", "matches"])
        );
    }
}
