//! Backend port
//!
//! Defines the canonical contract every backend adapter satisfies: turn
//! a [`GenerationRequest`] into a reply, which is either plain text or
//! an artifact envelope. Implementations (chat forwarder, deterministic
//! mock, embedding bridges) live in the infrastructure layer.

use async_trait::async_trait;
use artrelay_domain::{ArtifactEnvelope, GenerationRequest};
use thiserror::Error;

/// Errors that can occur while a backend services a request.
///
/// Backend failures are recoverable at the connection boundary: they
/// become an `LLM_ERROR:` frame or a 502, never a crash.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("upstream returned status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unrecognized upstream response: {0}")]
    UnrecognizedResponse(String),

    #[error("backend call timed out")]
    Timeout,
}

impl BackendError {
    /// Build an upstream error, truncating oversized bodies so a
    /// misbehaving server cannot flood logs or error frames.
    pub fn upstream(status: u16, body: impl Into<String>) -> Self {
        const MAX_BODY: usize = 4 * 1024;
        let mut body = body.into();
        if body.len() > MAX_BODY {
            let mut end = MAX_BODY;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            body.truncate(end);
        }
        Self::Upstream { status, body }
    }
}

/// A backend reply: either plain text or a canonical envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendReply {
    Text(String),
    Artifacts(ArtifactEnvelope),
}

impl BackendReply {
    /// Flatten the reply into the text-only wire path.
    ///
    /// The TCP relay only carries text frames, so an envelope reply is
    /// embedded as its serialized JSON for the downstream consumer to
    /// parse back out.
    pub fn into_wire_text(self) -> String {
        match self {
            BackendReply::Text(text) => text,
            BackendReply::Artifacts(envelope) => serde_json::to_string(&envelope)
                .unwrap_or_else(|_| r#"{"images_base64":[],"mime":"image/png"}"#.to_string()),
        }
    }
}

/// The backend contract.
///
/// Implementations must be safe for concurrent use: one instance is
/// shared by every connection task, with no per-request locking.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Stable name of this backend, for logging.
    fn name(&self) -> &str;

    /// Service one generation request.
    async fn generate(&self, request: GenerationRequest) -> Result<BackendReply, BackendError>;
}
