//! Opaque image payloads exchanged with the backend.
//!
//! The backend stores and accepts images as standard base64 text. This
//! module never decodes or inspects the pixels; it only guarantees that a
//! payload is non-empty and offers a helper for turning raw file bytes into
//! the encoded form.

use std::fmt;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A base64-encoded image as the backend expects it.
///
/// Deserialization goes through [`ImagePayload::new`], so a blank payload
/// never parses.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ImagePayload(String);

impl ImagePayload {
    /// Wrap already-encoded text.
    ///
    /// Rejects empty or whitespace-only input.
    pub fn new(encoded: impl Into<String>) -> Result<Self, CoreError> {
        let encoded = encoded.into();
        if encoded.trim().is_empty() {
            return Err(CoreError::Validation(
                "image payload must not be empty".to_string(),
            ));
        }
        Ok(Self(encoded))
    }

    /// Encode raw image bytes with the standard base64 alphabet.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        if bytes.is_empty() {
            return Err(CoreError::Validation(
                "image file must not be empty".to_string(),
            ));
        }
        Ok(Self(STANDARD.encode(bytes)))
    }

    /// Read a file from disk and encode it.
    pub fn from_file(path: &Path) -> Result<Self, CoreError> {
        let bytes = std::fs::read(path).map_err(|e| {
            CoreError::Encoding(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_bytes(&bytes)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ImagePayload {
    type Error = CoreError;

    fn try_from(encoded: String) -> Result<Self, Self::Error> {
        Self::new(encoded)
    }
}

impl From<ImagePayload> for String {
    fn from(payload: ImagePayload) -> Self {
        payload.0
    }
}

// Payloads can be megabytes long; keep them out of logs.
impl fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImagePayload({} bytes)", self.0.len())
    }
}
