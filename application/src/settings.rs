//! Immutable runtime settings.
//!
//! Settings are constructed exactly once at startup (from the file
//! configuration in the infrastructure layer) and passed by value into
//! the registry, the use cases, and the wire surfaces. Nothing re-reads
//! configuration after initialization.

use std::time::Duration;

/// Settings for the TCP relay and its backend adapters.
#[derive(Debug, Clone)]
pub struct RelaySettings {
    /// Address the TCP relay listens on.
    pub listen_addr: String,
    /// Name of the default provider resolved at startup.
    pub provider: String,
    /// Base URL of the chat-completion upstream.
    pub base_url: String,
    /// API key for the chat upstream, if it needs one.
    pub api_key: Option<String>,
    /// Default model sent to the chat upstream.
    pub model: Option<String>,
    /// Bound on every backend call.
    pub timeout: Duration,
    /// Reply prefix used by the mock backend.
    pub mock_prefix: String,
    /// Base URL of the orchestrator, used by the bridge backends.
    pub bridge_url: String,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:12345".to_string(),
            provider: "llama".to_string(),
            base_url: "http://localhost:1234/v1".to_string(),
            api_key: None,
            model: Some("local-llama".to_string()),
            timeout: Duration::from_secs(120),
            mock_prefix: "MOCK:".to_string(),
            bridge_url: "http://localhost:8000".to_string(),
        }
    }
}

/// Settings for the orchestrator (embedding + image pipeline).
#[derive(Debug, Clone)]
pub struct BridgeSettings {
    /// Address the HTTP surface listens on.
    pub listen_addr: String,
    /// Base URL of the llm embeddings upstream.
    pub llm_base: String,
    /// API key for the llm embeddings upstream.
    pub llm_api_key: Option<String>,
    /// Base URL of the nlp embeddings upstream.
    pub nlp_base: String,
    /// API key for the nlp embeddings upstream.
    pub nlp_api_key: Option<String>,
    /// Image endpoint URL. Empty or `mock*` selects the internal
    /// deterministic placeholder generator.
    pub image_url: String,
    /// API key for the image endpoint.
    pub image_api_key: Option<String>,
    /// Bound on every upstream call.
    pub timeout: Duration,
    /// Fixed output width forwarded to the image endpoint.
    pub width: u32,
    /// Fixed output height forwarded to the image endpoint.
    pub height: u32,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            llm_base: "http://localhost:1234/v1".to_string(),
            llm_api_key: None,
            nlp_base: "http://localhost:9000".to_string(),
            nlp_api_key: None,
            image_url: String::new(),
            image_api_key: None,
            timeout: Duration::from_secs(120),
            width: 512,
            height: 512,
        }
    }
}
