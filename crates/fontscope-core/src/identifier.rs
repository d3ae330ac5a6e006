//! Font identifier abstraction.
//!
//! The external model is an opaque capability: anything that can turn an
//! [`AnalysisRequest`] into a [`FontAnalysisResponse`] implements
//! [`FontIdentifier`]. Providers implement a single attempt; the bounded
//! retry loop lives in [`RetryingIdentifier`], which implements the same
//! trait so it composes with any provider.
//!
//! [`RetryingIdentifier`]: crate::RetryingIdentifier

use std::sync::Arc;

use crate::error::Result;
use crate::request::AnalysisRequest;
use crate::types::FontAnalysisResponse;

/// Type alias for a shared, type-erased identifier.
pub type BoxedIdentifier = Arc<dyn FontIdentifier>;

/// Identifies the typeface shown in an image.
#[async_trait::async_trait]
pub trait FontIdentifier: Send + Sync {
    /// Analyzes the image in `request` and returns the identified font.
    async fn identify(&self, request: &AnalysisRequest) -> Result<FontAnalysisResponse>;

    /// Short name used in logs.
    fn name(&self) -> &str {
        "identifier"
    }
}

#[async_trait::async_trait]
impl<T> FontIdentifier for Arc<T>
where
    T: FontIdentifier + ?Sized,
{
    async fn identify(&self, request: &AnalysisRequest) -> Result<FontAnalysisResponse> {
        (**self).identify(request).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[async_trait::async_trait]
impl<T> FontIdentifier for Box<T>
where
    T: FontIdentifier + ?Sized,
{
    async fn identify(&self, request: &AnalysisRequest) -> Result<FontAnalysisResponse> {
        (**self).identify(request).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
