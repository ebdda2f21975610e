//! Generation request value object.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A single request flowing into a backend.
///
/// `provider` names the adapter that was selected for this request;
/// `model` and `params` are optional refinements that individual
/// adapters may honor or ignore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Raw request text as received from the client.
    pub text: String,
    /// Name of the provider this request was routed to.
    pub provider: String,
    /// Optional model override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Opaque per-request parameters, passed through to the adapter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<BTreeMap<String, Value>>,
}

impl GenerationRequest {
    pub fn new(text: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            provider: provider.into(),
            model: None,
            params: None,
        }
    }

    /// Set a model override.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}
