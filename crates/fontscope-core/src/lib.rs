#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for the retry loop.
pub const TRACING_TARGET_RETRY: &str = "fontscope_core::retry";

/// Tracing target for response parsing.
pub const TRACING_TARGET_RESPONSE: &str = "fontscope_core::response";

/// Tracing target for controller state transitions and previews.
pub const TRACING_TARGET_CONTROLLER: &str = "fontscope_core::controller";

mod error;
mod identifier;
mod preview;
mod request;
mod response;
mod retry;
mod types;

pub mod controller;
#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;
#[doc(hidden)]
pub mod prelude;

pub use crate::controller::{Controller, ControllerSnapshot, Phase, SharedController, Submission};
pub use crate::error::{
    BoxedError, CANCELLED_MESSAGE, EXHAUSTED_MESSAGE, Error, ErrorKind, INVALID_FILE_TYPE_MESSAGE, Result,
    UNKNOWN_ERROR_MESSAGE,
};
pub use crate::identifier::{BoxedIdentifier, FontIdentifier};
pub use crate::preview::{PreviewEvent, PreviewHandle, PreviewRegistry, PreviewSurface};
pub use crate::request::{
    AnalysisRequest, SYSTEM_INSTRUCTION, USER_QUERY, response_schema,
};
pub use crate::response::{parse_analysis, strip_code_fences};
pub use crate::retry::{RetryPolicy, RetryingIdentifier};
pub use crate::types::{
    FileSelection, FontAnalysisResponse, FontMatch, ImageAsset, ImageFormat, MATCH_COUNT,
    confidence_percent,
};
