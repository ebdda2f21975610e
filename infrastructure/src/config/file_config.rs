//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every section and field has a default, so an empty file (or no file
//! at all) yields a runnable configuration: the relay listens on
//! 0.0.0.0:12345 with the `llama` provider and the bridge uses the
//! internal placeholder image generator.

use artrelay_application::{BridgeSettings, RelaySettings};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// `[relay]` section: the TCP relay surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRelayConfig {
    /// Address the relay listens on.
    pub listen: String,
    /// Default provider name, resolved against the registry at startup.
    pub provider: String,
    /// Bound on every backend call, in seconds.
    pub timeout_secs: u64,
}

impl Default for FileRelayConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:12345".to_string(),
            provider: "llama".to_string(),
            timeout_secs: 120,
        }
    }
}

/// Chat upstream settings (`[providers.chat]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChatConfig {
    /// Base URL of the OpenAI-style chat endpoint.
    pub base_url: String,
    /// API key, if the upstream needs one.
    pub api_key: Option<String>,
    /// Default model name.
    pub model: String,
}

impl Default for FileChatConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:1234/v1".to_string(),
            api_key: None,
            model: "local-llama".to_string(),
        }
    }
}

/// Mock backend settings (`[providers.mock]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMockConfig {
    /// Reply prefix.
    pub prefix: String,
}

impl Default for FileMockConfig {
    fn default() -> Self {
        Self {
            prefix: "MOCK:".to_string(),
        }
    }
}

/// `[providers]` section: per-adapter upstream settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    /// Chat upstream settings.
    pub chat: FileChatConfig,
    /// Mock backend settings.
    pub mock: FileMockConfig,
    /// Orchestrator base URL used by the bridge backends.
    pub bridge_url: Option<String>,
}

/// `[bridge]` section: the orchestrator and its upstreams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBridgeConfig {
    /// Address the HTTP surface listens on.
    pub listen: String,
    /// Base URL of the llm embeddings upstream.
    pub llm_base: String,
    /// API key for the llm embeddings upstream.
    pub llm_api_key: Option<String>,
    /// Base URL of the nlp embeddings upstream.
    pub nlp_base: String,
    /// API key for the nlp embeddings upstream.
    pub nlp_api_key: Option<String>,
    /// Image endpoint URL; empty or `mock*` selects the placeholder.
    pub image_url: String,
    /// API key for the image endpoint.
    pub image_api_key: Option<String>,
    /// Bound on every upstream call, in seconds.
    pub timeout_secs: u64,
    /// Fixed output width.
    pub width: u32,
    /// Fixed output height.
    pub height: u32,
}

impl Default for FileBridgeConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8000".to_string(),
            llm_base: "http://localhost:1234/v1".to_string(),
            llm_api_key: None,
            nlp_base: "http://localhost:9000".to_string(),
            nlp_api_key: None,
            image_url: String::new(),
            image_api_key: None,
            timeout_secs: 120,
            width: 512,
            height: 512,
        }
    }
}

/// Complete file configuration (raw TOML structure).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// TCP relay settings.
    pub relay: FileRelayConfig,
    /// Backend adapter settings.
    pub providers: FileProvidersConfig,
    /// Orchestrator settings.
    pub bridge: FileBridgeConfig,
}

fn none_if_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl FileConfig {
    /// Build the immutable relay settings value handed to the registry
    /// and the relay surface.
    pub fn relay_settings(&self) -> RelaySettings {
        RelaySettings {
            listen_addr: self.relay.listen.clone(),
            provider: self.relay.provider.trim().to_lowercase(),
            base_url: self.providers.chat.base_url.trim_end_matches('/').to_string(),
            api_key: none_if_empty(self.providers.chat.api_key.clone()),
            model: none_if_empty(Some(self.providers.chat.model.clone())),
            timeout: Duration::from_secs(self.relay.timeout_secs),
            mock_prefix: self.providers.mock.prefix.clone(),
            bridge_url: self
                .providers
                .bridge_url
                .clone()
                .unwrap_or_else(|| format!("http://{}", bridge_client_addr(&self.bridge.listen)))
                .trim_end_matches('/')
                .to_string(),
        }
    }

    /// Build the immutable bridge settings value handed to the
    /// orchestrator stack.
    pub fn bridge_settings(&self) -> BridgeSettings {
        BridgeSettings {
            listen_addr: self.bridge.listen.clone(),
            llm_base: self.bridge.llm_base.trim_end_matches('/').to_string(),
            llm_api_key: none_if_empty(self.bridge.llm_api_key.clone()),
            nlp_base: self.bridge.nlp_base.trim_end_matches('/').to_string(),
            nlp_api_key: none_if_empty(self.bridge.nlp_api_key.clone()),
            image_url: self.bridge.image_url.clone(),
            image_api_key: none_if_empty(self.bridge.image_api_key.clone()),
            timeout: Duration::from_secs(self.bridge.timeout_secs),
            width: self.bridge.width,
            height: self.bridge.height,
        }
    }
}

/// Turn a listen address into something a client on the same host can
/// dial: an unspecified bind address becomes localhost.
fn bridge_client_addr(listen: &str) -> String {
    match listen.rsplit_once(':') {
        Some((host, port)) if host == "0.0.0.0" || host == "::" || host.is_empty() => {
            format!("localhost:{port}")
        }
        _ => listen.to_string(),
    }
}
