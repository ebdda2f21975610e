//! Bridge backends
//!
//! Two registry entries (`llama_emb` and `nlp`) that relay the client's
//! text to the orchestrator's `POST /v1/text-to-image` endpoint and
//! hand the resulting artifact envelope back as the reply. They differ
//! only in which embedding source tag they select.

use crate::providers::registry::ProviderContext;
use artrelay_application::{Backend, BackendError, BackendReply, EmbeddingKind};
use artrelay_domain::{ArtifactEnvelope, GenerationRequest, NlpParams};
use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

#[derive(Serialize)]
struct TextToImageBody {
    text: String,
    source: EmbeddingKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    llm_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    nlp_params: Option<NlpParams>,
}

/// Backend that delegates to the text-to-image orchestrator.
pub struct BridgeBackend {
    http: reqwest::Client,
    bridge_url: String,
    kind: EmbeddingKind,
    llm_model: Option<String>,
}

impl BridgeBackend {
    pub fn new(context: &ProviderContext, kind: EmbeddingKind) -> Self {
        Self {
            http: context.http.clone(),
            bridge_url: context.settings.bridge_url.clone(),
            kind,
            llm_model: context.settings.model.clone(),
        }
    }

    fn body_for(&self, request: &GenerationRequest) -> TextToImageBody {
        match self.kind {
            EmbeddingKind::Llm => TextToImageBody {
                text: request.text.clone(),
                source: self.kind,
                llm_model: request.model.clone().or_else(|| self.llm_model.clone()),
                nlp_params: None,
            },
            // The nlp upstream favors content words, so ask for
            // lemmatized nouns and adjectives with frequency weighting.
            EmbeddingKind::Nlp => TextToImageBody {
                text: request.text.clone(),
                source: self.kind,
                llm_model: None,
                nlp_params: Some(NlpParams::bridge_defaults()),
            },
        }
    }
}

#[async_trait]
impl Backend for BridgeBackend {
    fn name(&self) -> &str {
        match self.kind {
            EmbeddingKind::Llm => "llama_emb",
            EmbeddingKind::Nlp => "nlp",
        }
    }

    async fn generate(&self, request: GenerationRequest) -> Result<BackendReply, BackendError> {
        // Nothing to embed: answer locally instead of bothering the
        // orchestrator with a request that cannot succeed.
        if request.text.trim().is_empty() {
            return Ok(BackendReply::Artifacts(ArtifactEnvelope::empty()));
        }

        let url = format!("{}/v1/text-to-image", self.bridge_url);
        debug!(%url, source = self.kind.as_str(), "Forwarding to orchestrator");

        let response = self
            .http
            .post(&url)
            .json(&self.body_for(&request))
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(BackendError::upstream(status, text));
        }

        let envelope: ArtifactEnvelope = serde_json::from_str(&text)
            .map_err(|e| BackendError::UnrecognizedResponse(e.to_string()))?;
        Ok(BackendReply::Artifacts(envelope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artrelay_application::RelaySettings;

    fn backend(kind: EmbeddingKind) -> BridgeBackend {
        let context = ProviderContext {
            settings: RelaySettings::default(),
            http: reqwest::Client::new(),
        };
        BridgeBackend::new(&context, kind)
    }

    #[tokio::test]
    async fn test_empty_text_short_circuits() {
        // No orchestrator is listening in this test; an HTTP attempt
        // would fail, so success proves the request never left.
        let reply = backend(EmbeddingKind::Nlp)
            .generate(GenerationRequest::new("   ", "nlp"))
            .await
            .unwrap();
        assert_eq!(reply, BackendReply::Artifacts(ArtifactEnvelope::empty()));
    }

    #[test]
    fn test_llm_body_carries_model() {
        let b = backend(EmbeddingKind::Llm);
        let body = b.body_for(&GenerationRequest::new("cat", "llama_emb"));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["source"], "llm");
        assert_eq!(json["llm_model"], "local-llama");
        assert!(json.get("nlp_params").is_none());
    }

    #[test]
    fn test_nlp_body_carries_bridge_defaults() {
        let b = backend(EmbeddingKind::Nlp);
        let body = b.body_for(&GenerationRequest::new("red cat", "nlp"));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["source"], "nlp");
        assert!(json.get("llm_model").is_none());
        assert_eq!(json["nlp_params"]["use_lemma"], true);
        assert_eq!(json["nlp_params"]["weighted"], true);
    }

    #[test]
    fn test_request_model_overrides_default() {
        let b = backend(EmbeddingKind::Llm);
        let body = b.body_for(&GenerationRequest::new("cat", "llama_emb").with_model("other"));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["llm_model"], "other");
    }
}
