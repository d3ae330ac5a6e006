//! The analysis request sent to a multimodal model.
//!
//! A request pairs the base64 encoded image with the fixed instructions and
//! the output schema every provider must forward to its model.

use std::sync::LazyLock;

use serde_json::{Value, json};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::{ImageAsset, ImageFormat, MATCH_COUNT};

/// Instruction sent alongside the image.
pub const USER_QUERY: &str = "Analyze the attached image and identify the font used. Provide the primary identification and the top 3 closest matches, along with a confidence level for your primary identification.";

/// System-level instruction constraining the model's role and output.
pub const SYSTEM_INSTRUCTION: &str = "Act as a world-class typographic analyst and font identification engine. Your sole task is to meticulously analyze the provided image, which contains text, and identify the primary typeface used. If an exact match is uncertain, provide the top 3 closest known commercial or popular open-source font matches based on visual characteristics. You MUST adhere strictly to the JSON schema provided in the generation configuration and MUST NOT include any conversational text, markdown, or explanation outside of the JSON object.";

static RESPONSE_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "type": "OBJECT",
        "properties": {
            "primary_font_name": {
                "type": "STRING",
                "description": "The closest identified font name, e.g., 'Helvetica Neue' or 'Georgia'."
            },
            "confidence_level": {
                "type": "NUMBER",
                "description": "A confidence score for the primary match, between 0.0 (low) and 1.0 (high)."
            },
            "matches": {
                "type": "ARRAY",
                "description": "A list of the top 3 closest alternative font matches.",
                "minItems": MATCH_COUNT,
                "maxItems": MATCH_COUNT,
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING" },
                        "description": {
                            "type": "STRING",
                            "description": "Visual classification, e.g., 'Geometric Sans-serif' or 'Modern Serif'"
                        }
                    },
                    "required": ["name", "description"]
                }
            }
        },
        "required": ["primary_font_name", "confidence_level", "matches"]
    })
});

/// Output schema descriptor for [`FontAnalysisResponse`].
///
/// [`FontAnalysisResponse`]: crate::FontAnalysisResponse
pub fn response_schema() -> &'static Value {
    &RESPONSE_SCHEMA
}

/// A single, immutable font analysis request.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    request_id: Uuid,
    format: ImageFormat,
    data: String,
}

impl AnalysisRequest {
    /// Creates a request from already encoded image data.
    pub fn new(data: impl Into<String>, format: ImageFormat) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            format,
            data: data.into(),
        }
    }

    /// Creates a request from encoded data and a declared MIME type.
    pub fn from_parts(data: impl Into<String>, mime_type: &str) -> Result<Self> {
        let format = ImageFormat::from_mime_type(mime_type).ok_or_else(Error::invalid_file_type)?;
        Ok(Self::new(data, format))
    }

    /// Encodes an image asset into a request.
    pub fn from_asset(asset: &ImageAsset) -> Self {
        Self::new(asset.to_base64(), asset.format())
    }

    /// Unique identifier of this request, used for log correlation.
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Base64 encoded image data.
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Image format.
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// MIME type to tag the inline data with.
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Instruction text sent with the image.
    pub fn user_query(&self) -> &'static str {
        USER_QUERY
    }

    /// System instruction for the model.
    pub fn system_instruction(&self) -> &'static str {
        SYSTEM_INSTRUCTION
    }

    /// Output schema the model must conform to.
    pub fn response_schema(&self) -> &'static Value {
        response_schema()
    }
}
