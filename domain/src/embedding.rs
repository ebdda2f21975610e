//! Embedding value objects.

use serde::{Deserialize, Serialize};

/// An embedding vector produced by an upstream source.
pub type Embedding = Vec<f32>;

/// Tuning parameters for the NLP embedding endpoint.
///
/// Field defaults mirror what the endpoint assumes when a field is
/// omitted; they are serialized in full so the upstream never has to
/// guess.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NlpParams {
    pub use_lemma: bool,
    pub keep_pos: Option<Vec<String>>,
    pub lowercase: bool,
    pub min_tokens: u32,
    pub weighted: bool,
}

impl Default for NlpParams {
    fn default() -> Self {
        Self {
            use_lemma: true,
            keep_pos: None,
            lowercase: true,
            min_tokens: 1,
            weighted: false,
        }
    }
}

impl NlpParams {
    /// Defaults used by the nlp bridge backend when the caller supplies
    /// nothing: lemmatized nouns and adjectives, frequency-weighted.
    pub fn bridge_defaults() -> Self {
        Self {
            keep_pos: Some(vec!["NOUN".to_string(), "ADJ".to_string()]),
            weighted: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = NlpParams::default();
        assert!(params.use_lemma);
        assert!(params.lowercase);
        assert_eq!(params.min_tokens, 1);
        assert!(!params.weighted);
        assert!(params.keep_pos.is_none());
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let params: NlpParams = serde_json::from_str(r#"{"weighted": true}"#).unwrap();
        assert!(params.weighted);
        assert!(params.use_lemma);
    }

    #[test]
    fn test_bridge_defaults() {
        let params = NlpParams::bridge_defaults();
        assert_eq!(
            params.keep_pos,
            Some(vec!["NOUN".to_string(), "ADJ".to_string()])
        );
        assert!(params.weighted);
    }
}
