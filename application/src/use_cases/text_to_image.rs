//! Text-to-image orchestration use case.
//!
//! The pipeline behind `POST /v1/text-to-image`: pick an embedding
//! source by the request's `source` tag, obtain a vector, forward it to
//! the image synthesizer, and return the canonical envelope. The use
//! case performs no retries; any upstream failure surfaces as a single
//! [`BackendError`] carrying the upstream's status and body.

use crate::ports::backend::BackendError;
use crate::ports::embedding::{EmbeddingKind, EmbeddingOptions, EmbeddingSource};
use crate::ports::image::{ImageSynthesizer, SynthesisRequest};
use artrelay_domain::{ArtifactEnvelope, NlpParams};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Errors surfaced by the orchestrator.
#[derive(Error, Debug)]
pub enum TextToImageError {
    /// Caller error: missing or invalid required field. Surfaced as a
    /// 4xx without side effects.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Upstream failure at the embedding or image step.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Input for the [`TextToImageUseCase`].
#[derive(Debug, Clone)]
pub struct TextToImageInput {
    pub text: String,
    pub source: EmbeddingKind,
    pub llm_model: Option<String>,
    pub nlp_params: Option<NlpParams>,
    pub image_url_override: Option<String>,
}

impl TextToImageInput {
    pub fn new(text: impl Into<String>, source: EmbeddingKind) -> Self {
        Self {
            text: text.into(),
            source,
            llm_model: None,
            nlp_params: None,
            image_url_override: None,
        }
    }

    pub fn with_llm_model(mut self, model: impl Into<String>) -> Self {
        self.llm_model = Some(model.into());
        self
    }
}

/// Use case chaining the embedding step and the image step.
pub struct TextToImageUseCase {
    sources: Vec<Arc<dyn EmbeddingSource>>,
    synthesizer: Arc<dyn ImageSynthesizer>,
    width: u32,
    height: u32,
}

impl TextToImageUseCase {
    pub fn new(
        sources: Vec<Arc<dyn EmbeddingSource>>,
        synthesizer: Arc<dyn ImageSynthesizer>,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            sources,
            synthesizer,
            width,
            height,
        }
    }

    fn resolve_source(
        &self,
        kind: EmbeddingKind,
    ) -> Result<&dyn EmbeddingSource, TextToImageError> {
        self.sources
            .iter()
            .find(|s| s.kind() == kind)
            .map(|s| s.as_ref())
            .ok_or_else(|| {
                BackendError::Transport(format!(
                    "no embedding source registered for '{}'",
                    kind.as_str()
                ))
                .into()
            })
    }

    /// Execute the full pipeline for one request.
    pub async fn execute(
        &self,
        input: TextToImageInput,
    ) -> Result<ArtifactEnvelope, TextToImageError> {
        // Validation happens before any upstream call is made.
        if input.source == EmbeddingKind::Llm
            && input.llm_model.as_deref().unwrap_or("").is_empty()
        {
            return Err(TextToImageError::InvalidRequest(
                "llm_model is required when source='llm'".to_string(),
            ));
        }

        let source = self.resolve_source(input.source)?;

        let options = EmbeddingOptions {
            llm_model: input.llm_model.clone(),
            nlp_params: Some(
                input
                    .nlp_params
                    .clone()
                    .unwrap_or_else(NlpParams::default),
            ),
        };

        let embedding = source.embed(&input.text, &options).await?;
        debug!(
            source = input.source.as_str(),
            dimension = embedding.len(),
            "Embedding obtained"
        );

        let request = SynthesisRequest {
            embedding,
            width: self.width,
            height: self.height,
            text: input.text.clone(),
            url_override: input.image_url_override.clone(),
        };

        let envelope = self.synthesizer.synthesize(&request).await?;
        info!(
            source = input.source.as_str(),
            artifacts = envelope.images_base64.len(),
            mime = %envelope.mime,
            "Text-to-image pipeline complete"
        );
        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artrelay_domain::Embedding;
    use async_trait::async_trait;

    struct FixedEmbedder {
        kind: EmbeddingKind,
        result: Result<Embedding, u16>,
    }

    #[async_trait]
    impl EmbeddingSource for FixedEmbedder {
        fn kind(&self) -> EmbeddingKind {
            self.kind
        }

        async fn embed(
            &self,
            _text: &str,
            _options: &EmbeddingOptions,
        ) -> Result<Embedding, BackendError> {
            match &self.result {
                Ok(vector) => Ok(vector.clone()),
                Err(status) => Err(BackendError::upstream(*status, "embed failed")),
            }
        }
    }

    struct FixedSynthesizer {
        envelope: ArtifactEnvelope,
    }

    #[async_trait]
    impl ImageSynthesizer for FixedSynthesizer {
        async fn synthesize(
            &self,
            request: &SynthesisRequest,
        ) -> Result<ArtifactEnvelope, BackendError> {
            assert_eq!(request.width, 512);
            assert_eq!(request.height, 512);
            Ok(self.envelope.clone())
        }
    }

    fn use_case(
        embed_result: Result<Embedding, u16>,
        envelope: ArtifactEnvelope,
    ) -> TextToImageUseCase {
        TextToImageUseCase::new(
            vec![
                Arc::new(FixedEmbedder {
                    kind: EmbeddingKind::Llm,
                    result: embed_result.clone(),
                }),
                Arc::new(FixedEmbedder {
                    kind: EmbeddingKind::Nlp,
                    result: embed_result,
                }),
            ],
            Arc::new(FixedSynthesizer { envelope }),
            512,
            512,
        )
    }

    #[tokio::test]
    async fn test_llm_requires_model() {
        let uc = use_case(Ok(vec![0.1]), ArtifactEnvelope::empty());
        let err = uc
            .execute(TextToImageInput::new("x", EmbeddingKind::Llm))
            .await
            .unwrap_err();
        assert!(matches!(err, TextToImageError::InvalidRequest(_)));

        // An empty model string is as missing as no model at all.
        let err = uc
            .execute(TextToImageInput::new("x", EmbeddingKind::Llm).with_llm_model(""))
            .await
            .unwrap_err();
        assert!(matches!(err, TextToImageError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_pipeline_returns_envelope() {
        let envelope = ArtifactEnvelope::single("Zm9v", "image/jpeg");
        let uc = use_case(Ok(vec![0.1, 0.2]), envelope.clone());
        let out = uc
            .execute(TextToImageInput::new("x", EmbeddingKind::Llm).with_llm_model("m"))
            .await
            .unwrap();
        assert_eq!(out, envelope);
    }

    #[tokio::test]
    async fn test_embedding_failure_surfaces_as_backend_error() {
        let uc = use_case(Err(504), ArtifactEnvelope::empty());
        let err = uc
            .execute(TextToImageInput::new("dog", EmbeddingKind::Nlp))
            .await
            .unwrap_err();
        match err {
            TextToImageError::Backend(BackendError::Upstream { status, body }) => {
                assert_eq!(status, 504);
                assert!(body.contains("embed failed"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_nlp_needs_no_model() {
        let uc = use_case(Ok(vec![0.5]), ArtifactEnvelope::empty());
        assert!(uc
            .execute(TextToImageInput::new("dog", EmbeddingKind::Nlp))
            .await
            .is_ok());
    }
}
