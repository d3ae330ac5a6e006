//! Preview handles for selected images.
//!
//! A [`PreviewHandle`] is a transient display resource (an object URL, a
//! texture, a temporary file). Handles are not `Clone`: each one is released
//! exactly once by passing it back to the [`PreviewSurface`] that created it.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use uuid::Uuid;

use crate::TRACING_TARGET_CONTROLLER;
use crate::error::Result;
use crate::types::{ImageAsset, ImageFormat};

/// Display handle for a selected image.
#[derive(Debug, PartialEq, Eq, Hash, Serialize)]
pub struct PreviewHandle {
    id: Uuid,
    asset_id: Uuid,
    format: ImageFormat,
    byte_len: usize,
}

impl PreviewHandle {
    /// Creates a handle for `asset`.
    pub fn for_asset(asset: &ImageAsset) -> Self {
        Self {
            id: Uuid::new_v4(),
            asset_id: asset.id(),
            format: asset.format(),
            byte_len: asset.len(),
        }
    }

    /// Unique identifier of the handle.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Identifier of the previewed asset.
    pub fn asset_id(&self) -> Uuid {
        self.asset_id
    }

    /// Format of the previewed image.
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Size of the previewed image in bytes.
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    /// URI under which the preview can be referenced.
    pub fn uri(&self) -> String {
        format!("preview:{}", self.id)
    }
}

/// Allocates and releases preview handles.
pub trait PreviewSurface: Send + Sync {
    /// Creates a preview for `asset`.
    fn create(&self, asset: &ImageAsset) -> Result<PreviewHandle>;

    /// Releases a previously created preview.
    fn release(&self, handle: PreviewHandle);
}

/// Lifecycle event recorded by [`PreviewRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewEvent {
    /// A handle was created.
    Created(Uuid),
    /// A handle was released.
    Released(Uuid),
}

#[derive(Debug, Default)]
struct RegistryState {
    live: HashSet<Uuid>,
    events: Vec<PreviewEvent>,
}

/// In-memory preview surface that tracks live handles.
///
/// Cloning shares the same registry.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    state: Arc<Mutex<RegistryState>>,
}

impl PreviewRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles created and not yet released.
    pub fn live_count(&self) -> usize {
        self.lock().live.len()
    }

    /// Returns true if the handle with `id` is still live.
    pub fn is_live(&self, id: Uuid) -> bool {
        self.lock().live.contains(&id)
    }

    /// Every create and release, in order.
    pub fn events(&self) -> Vec<PreviewEvent> {
        self.lock().events.clone()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PreviewSurface for PreviewRegistry {
    fn create(&self, asset: &ImageAsset) -> Result<PreviewHandle> {
        let handle = PreviewHandle::for_asset(asset);

        let mut state = self.lock();
        state.live.insert(handle.id());
        state.events.push(PreviewEvent::Created(handle.id()));

        tracing::trace!(
            target: TRACING_TARGET_CONTROLLER,
            preview_id = %handle.id(),
            asset_id = %asset.id(),
            live = state.live.len(),
            "Preview created"
        );

        Ok(handle)
    }

    fn release(&self, handle: PreviewHandle) {
        let mut state = self.lock();
        if !state.live.remove(&handle.id()) {
            tracing::warn!(
                target: TRACING_TARGET_CONTROLLER,
                preview_id = %handle.id(),
                "Released a preview that was not live"
            );
            return;
        }

        state.events.push(PreviewEvent::Released(handle.id()));

        tracing::trace!(
            target: TRACING_TARGET_CONTROLLER,
            preview_id = %handle.id(),
            live = state.live.len(),
            "Preview released"
        );
    }
}
