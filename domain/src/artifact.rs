//! The canonical artifact envelope.
//!
//! Every upstream image response (JSON with a list, JSON with a single
//! field, raw binary) is normalized into this one shape before it
//! leaves the system.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// MIME type used when an upstream does not declare one.
pub const DEFAULT_MIME: &str = "image/png";

/// Error decoding a single artifact blob.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("artifact {index} is not valid base64: {source}")]
    InvalidBase64 {
        index: usize,
        source: base64::DecodeError,
    },
}

/// Canonical response envelope: an ordered sequence of base64-encoded
/// artifacts plus their MIME type.
///
/// Invariant: `images_base64` is never null. An empty sequence is a
/// valid envelope meaning "no output".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactEnvelope {
    pub images_base64: Vec<String>,
    pub mime: String,
}

impl ArtifactEnvelope {
    pub fn new(images_base64: Vec<String>, mime: impl Into<String>) -> Self {
        Self {
            images_base64,
            mime: mime.into(),
        }
    }

    /// An empty envelope with the default MIME type.
    pub fn empty() -> Self {
        Self::new(Vec::new(), DEFAULT_MIME)
    }

    /// Wrap a single already-encoded artifact.
    pub fn single(blob: impl Into<String>, mime: impl Into<String>) -> Self {
        Self::new(vec![blob.into()], mime)
    }

    /// Encode raw bytes into a one-artifact envelope.
    pub fn from_bytes(bytes: &[u8], mime: impl Into<String>) -> Self {
        Self::single(BASE64.encode(bytes), mime)
    }

    pub fn is_empty(&self) -> bool {
        self.images_base64.is_empty()
    }

    /// Decode all artifacts, skipping any that fail.
    ///
    /// A blob that is not valid base64 is dropped with a warning and the
    /// remaining artifacts are still delivered; a bad artifact never
    /// poisons its siblings.
    pub fn decode_artifacts(&self) -> Vec<Vec<u8>> {
        self.images_base64
            .iter()
            .enumerate()
            .filter_map(|(index, blob)| match BASE64.decode(blob) {
                Ok(bytes) => Some(bytes),
                Err(source) => {
                    let err = DecodeError::InvalidBase64 { index, source };
                    warn!(error = %err, "Skipping undecodable artifact");
                    None
                }
            })
            .collect()
    }
}
