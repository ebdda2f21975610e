//! Infrastructure layer for artrelay
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: the provider registry and its backend adapters,
//! the embedding and image upstream clients with the response
//! normalizer, and configuration file loading.

pub mod bridge;
pub mod config;
pub mod providers;

// Re-export commonly used types
pub use bridge::{
    embed::{LlmEmbeddingClient, NlpEmbeddingClient},
    image::ImageClient,
    normalize::{normalize_image_response, RawUpstreamResponse},
    placeholder,
};
pub use config::{ConfigLoader, FileBridgeConfig, FileConfig, FileProvidersConfig, FileRelayConfig};
pub use providers::{
    bridge::BridgeBackend,
    chat::ChatBackend,
    mock::MockBackend,
    registry::{ProviderContext, ProviderRegistry, RegistryError},
};
