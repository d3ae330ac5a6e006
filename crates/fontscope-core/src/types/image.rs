//! Image inputs accepted for font identification.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Image formats the identifier accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ImageFormat {
    /// Portable Network Graphics.
    Png,
    /// JPEG, declared either as `image/jpeg` or the non-standard `image/jpg`.
    Jpeg,
}

impl ImageFormat {
    /// Returns the canonical MIME type sent to the inference service.
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// Resolves a declared MIME type, ignoring case and parameters.
    pub fn from_mime_type(mime_type: &str) -> Option<Self> {
        let essence = mime_type.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// Resolves a file extension (without the leading dot).
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// Resolves the extension of a path.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

/// A file picked by the user, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSelection {
    /// Display name of the file, if known.
    pub file_name: Option<String>,
    /// MIME type declared for the file.
    pub mime_type: String,
    /// Raw file contents.
    pub bytes: Bytes,
}

impl FileSelection {
    /// MIME type declared for files whose extension is not recognised.
    pub const UNKNOWN_MIME_TYPE: &'static str = "application/octet-stream";

    /// Creates a selection with an explicit MIME type.
    pub fn new(mime_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: None,
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Creates a selection whose MIME type is derived from the path extension.
    pub fn from_path(path: &Path, bytes: impl Into<Bytes>) -> Self {
        let mime_type = ImageFormat::from_path(path)
            .map(ImageFormat::mime_type)
            .unwrap_or(Self::UNKNOWN_MIME_TYPE);

        let mut selection = Self::new(mime_type, bytes);
        selection.file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        selection
    }

    /// Sets the display name.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }
}

/// A validated PNG or JPEG image owned by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    id: Uuid,
    file_name: Option<String>,
    format: ImageFormat,
    bytes: Bytes,
}

impl ImageAsset {
    /// Creates an asset from bytes of a known format.
    pub fn new(format: ImageFormat, bytes: impl Into<Bytes>) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name: None,
            format,
            bytes: bytes.into(),
        }
    }

    /// Unique identifier of this asset.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Display name of the originating file.
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Image format.
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Canonical MIME type.
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Raw image bytes.
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Size of the image in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the image has no content.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Encodes the image as standard base64 for inline transfer.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

impl TryFrom<FileSelection> for ImageAsset {
    type Error = Error;

    fn try_from(selection: FileSelection) -> Result<Self> {
        let format =
            ImageFormat::from_mime_type(&selection.mime_type).ok_or_else(Error::invalid_file_type)?;

        Ok(Self {
            id: Uuid::new_v4(),
            file_name: selection.file_name,
            format,
            bytes: selection.bytes,
        })
    }
}
