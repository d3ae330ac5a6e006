use std::sync::Arc;

use serde::Serialize;
use strum::{AsRefStr, Display};

use crate::TRACING_TARGET_CONTROLLER;
use crate::error::Result;
use crate::preview::{PreviewHandle, PreviewSurface};
use crate::request::AnalysisRequest;
use crate::types::{FileSelection, FontAnalysisResponse, ImageAsset};

/// Phase of the controller, derived from its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, AsRefStr, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    /// No file selected.
    Idle,
    /// A valid file is selected and no result is shown.
    Ready,
    /// A request is in flight.
    Analyzing,
    /// A result is present.
    Done,
    /// An error message is present.
    Errored,
}

/// A submitted analysis, to be resolved with [`Controller::resolve`].
#[derive(Debug, Clone)]
pub struct Submission {
    /// Ticket identifying this submission.
    pub generation: u64,
    /// Request to send to the identifier.
    pub request: AnalysisRequest,
}

/// Owned view of the controller used for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControllerSnapshot {
    /// Current phase.
    pub phase: Phase,
    /// Name of the selected file.
    pub file_name: Option<String>,
    /// URI of the live preview.
    pub preview_uri: Option<String>,
    /// Error message to display.
    pub error: Option<String>,
    /// Last analysis result.
    pub result: Option<FontAnalysisResponse>,
}

/// Single-writer state machine behind the presentation layer.
pub struct Controller {
    surface: Arc<dyn PreviewSurface>,
    file: Option<ImageAsset>,
    preview: Option<PreviewHandle>,
    error: Option<String>,
    result: Option<FontAnalysisResponse>,
    generation: u64,
    in_flight: Option<u64>,
}

impl Controller {
    /// Creates an idle controller drawing previews on `surface`.
    pub fn new(surface: Arc<dyn PreviewSurface>) -> Self {
        Self {
            surface,
            file: None,
            preview: None,
            error: None,
            result: None,
            generation: 0,
            in_flight: None,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        if self.in_flight.is_some() {
            Phase::Analyzing
        } else if self.error.is_some() {
            Phase::Errored
        } else if self.result.is_some() {
            Phase::Done
        } else if self.file.is_some() {
            Phase::Ready
        } else {
            Phase::Idle
        }
    }

    /// Selected image, if any.
    pub fn file(&self) -> Option<&ImageAsset> {
        self.file.as_ref()
    }

    /// Live preview of the selected image, if any.
    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.preview.as_ref()
    }

    /// Error message to display, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Last analysis result, if any.
    pub fn result(&self) -> Option<&FontAnalysisResponse> {
        self.result.as_ref()
    }

    /// Returns true while a request is in flight.
    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Returns true if the submit action is enabled.
    pub fn can_submit(&self) -> bool {
        self.file.is_some() && !self.is_loading()
    }

    /// Handles a file selection.
    ///
    /// Any selection supersedes an in-flight request.
    pub fn select_file(&mut self, selection: FileSelection) -> Phase {
        if let Some(stale) = self.in_flight.take() {
            tracing::debug!(
                target: TRACING_TARGET_CONTROLLER,
                generation = stale,
                "Selection supersedes in-flight analysis"
            );
        }

        match ImageAsset::try_from(selection).and_then(|asset| self.show(asset)) {
            Ok(()) => {
                self.result = None;
                self.error = None;
            }
            Err(error) => {
                tracing::info!(
                    target: TRACING_TARGET_CONTROLLER,
                    error = %error,
                    "File selection rejected"
                );
                self.release_preview();
                self.file = None;
                self.error = Some(error.user_message());
            }
        }

        self.phase()
    }

    /// Starts an analysis of the selected file.
    ///
    /// Returns `None` without touching state when submitting is disabled.
    pub fn submit(&mut self) -> Option<Submission> {
        if !self.can_submit() {
            return None;
        }

        let request = AnalysisRequest::from_asset(self.file.as_ref()?);
        self.generation += 1;
        self.in_flight = Some(self.generation);
        self.error = None;
        self.result = None;

        tracing::debug!(
            target: TRACING_TARGET_CONTROLLER,
            generation = self.generation,
            request_id = %request.request_id(),
            "Analysis submitted"
        );

        Some(Submission {
            generation: self.generation,
            request,
        })
    }

    /// Applies the outcome of the submission with ticket `generation`.
    ///
    /// Returns false, leaving state untouched, if the submission is stale.
    pub fn resolve(&mut self, generation: u64, outcome: Result<FontAnalysisResponse>) -> bool {
        if self.in_flight != Some(generation) {
            tracing::debug!(
                target: TRACING_TARGET_CONTROLLER,
                generation,
                current = ?self.in_flight,
                "Discarding stale analysis result"
            );
            return false;
        }

        self.in_flight = None;
        match outcome {
            Ok(response) => {
                tracing::info!(
                    target: TRACING_TARGET_CONTROLLER,
                    generation,
                    font = %response.primary_font_name,
                    confidence = response.confidence_level,
                    "Analysis completed"
                );
                self.result = Some(response);
                self.error = None;
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET_CONTROLLER,
                    generation,
                    error = %error,
                    "Analysis failed"
                );
                self.result = None;
                self.error = Some(error.user_message());
            }
        }

        true
    }

    /// Owned view of the current state.
    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            phase: self.phase(),
            file_name: self
                .file
                .as_ref()
                .and_then(|file| file.file_name())
                .map(str::to_owned),
            preview_uri: self.preview.as_ref().map(PreviewHandle::uri),
            error: self.error.clone(),
            result: self.result.clone(),
        }
    }

    /// Replaces the selected file and its preview.
    fn show(&mut self, asset: ImageAsset) -> Result<()> {
        self.release_preview();
        self.preview = Some(self.surface.create(&asset)?);
        self.file = Some(asset);
        Ok(())
    }

    fn release_preview(&mut self) {
        if let Some(handle) = self.preview.take() {
            self.surface.release(handle);
        }
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.release_preview();
    }
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("phase", &self.phase())
            .field("file", &self.file.as_ref().map(ImageAsset::id))
            .field("preview", &self.preview.as_ref().map(PreviewHandle::id))
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}
