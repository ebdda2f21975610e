//! Embedding source port
//!
//! The orchestrator obtains an embedding vector from one of several
//! upstream sources before handing it to the image synthesizer. Each
//! source declares which kind it serves so the use case can route by
//! the request's `source` tag.

use crate::ports::backend::BackendError;
use async_trait::async_trait;
use artrelay_domain::{Embedding, NlpParams};
use serde::{Deserialize, Serialize};

/// Which embedding upstream a request selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingKind {
    Llm,
    Nlp,
}

impl EmbeddingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbeddingKind::Llm => "llm",
            EmbeddingKind::Nlp => "nlp",
        }
    }
}

/// Per-request refinements forwarded to the selected source.
///
/// An llm source reads `llm_model`; an nlp source reads `nlp_params`.
/// Fields irrelevant to the selected source are ignored.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingOptions {
    pub llm_model: Option<String>,
    pub nlp_params: Option<NlpParams>,
}

/// An upstream capable of turning text into an embedding vector.
#[async_trait]
pub trait EmbeddingSource: Send + Sync {
    fn kind(&self) -> EmbeddingKind;

    async fn embed(
        &self,
        text: &str,
        options: &EmbeddingOptions,
    ) -> Result<Embedding, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_deserializes_lowercase() {
        let kind: EmbeddingKind = serde_json::from_str(r#""nlp""#).unwrap();
        assert_eq!(kind, EmbeddingKind::Nlp);
        assert!(serde_json::from_str::<EmbeddingKind>(r#""speech""#).is_err());
    }
}
