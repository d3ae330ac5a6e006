//! Wire types of the `generateContent` REST method.
//!
//! Only the fields fontscope sends or reads are modelled; unknown response
//! fields are ignored.

mod request;
mod response;

pub use request::{Blob, Content, GenerateContentRequest, GenerationConfig, Part};
pub use response::{
    ApiErrorBody, ApiErrorDetail, Candidate, GenerateContentResponse, PromptFeedback,
    UsageMetadata,
};
