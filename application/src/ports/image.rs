//! Image synthesizer port
//!
//! The final stage of the orchestrator pipeline: an embedding goes in,
//! a canonical artifact envelope comes out. The infrastructure adapter
//! forwards to the configured image endpoint and normalizes whatever
//! shape comes back; it may also route to an internal deterministic
//! placeholder when the endpoint resolves to the mock sentinel.

use crate::ports::backend::BackendError;
use async_trait::async_trait;
use artrelay_domain::{ArtifactEnvelope, Embedding};

/// One synthesis request.
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub embedding: Embedding,
    pub width: u32,
    pub height: u32,
    /// Original request text; only used to label placeholder output.
    pub text: String,
    /// Per-request endpoint override, if the caller supplied one.
    pub url_override: Option<String>,
}

/// An upstream (or internal placeholder) that renders an embedding into
/// artifacts.
#[async_trait]
pub trait ImageSynthesizer: Send + Sync {
    async fn synthesize(&self, request: &SynthesisRequest)
        -> Result<ArtifactEnvelope, BackendError>;
}
