//! Provider registry
//!
//! A fixed table mapping provider names to backend constructors. The
//! table is assembled explicitly in [`ProviderRegistry::builtin`];
//! adding a backend means adding one line there, and a name that is not
//! in the table fails resolution before the relay ever binds a socket.

use crate::providers::bridge::BridgeBackend;
use crate::providers::chat::ChatBackend;
use crate::providers::mock::MockBackend;
use artrelay_application::{Backend, EmbeddingKind, RelaySettings};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors raised while resolving a provider name.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("unknown provider '{name}' (known: {})", known.join(", "))]
    UnknownProvider { name: String, known: Vec<String> },

    #[error("invalid configuration for provider '{name}': {reason}")]
    InvalidProviderConfig { name: String, reason: String },
}

/// Everything a backend constructor may need.
///
/// The HTTP client is shared so every adapter reuses one connection
/// pool.
#[derive(Clone)]
pub struct ProviderContext {
    pub settings: RelaySettings,
    pub http: reqwest::Client,
}

type Constructor = fn(&ProviderContext) -> Result<Arc<dyn Backend>, RegistryError>;

/// Registry of named backend constructors.
pub struct ProviderRegistry {
    entries: Vec<(&'static str, Constructor)>,
}

impl ProviderRegistry {
    /// An empty registry. Mostly useful in tests.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a constructor under a stable name. Last registration
    /// wins, so callers can shadow a builtin.
    pub fn register(mut self, name: &'static str, constructor: Constructor) -> Self {
        self.entries.retain(|(n, _)| *n != name);
        self.entries.push((name, constructor));
        self
    }

    /// The full set of builtin providers.
    pub fn builtin() -> Self {
        Self::new()
            .register("llama", |ctx| Ok(Arc::new(ChatBackend::new(ctx))))
            .register("mock", |ctx| {
                Ok(Arc::new(MockBackend::new(ctx.settings.mock_prefix.clone())))
            })
            .register("llama_emb", |ctx| {
                Ok(Arc::new(BridgeBackend::new(ctx, EmbeddingKind::Llm)))
            })
            .register("nlp", |ctx| {
                Ok(Arc::new(BridgeBackend::new(ctx, EmbeddingKind::Nlp)))
            })
    }

    /// Names of every registered provider, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(n, _)| n.to_string()).collect()
    }

    /// Construct the backend registered under `name`.
    pub fn resolve(
        &self,
        name: &str,
        context: &ProviderContext,
    ) -> Result<Arc<dyn Backend>, RegistryError> {
        let constructor = self
            .entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, c)| c)
            .ok_or_else(|| RegistryError::UnknownProvider {
                name: name.to_string(),
                known: self.names(),
            })?;
        let backend = constructor(context)?;
        debug!(provider = name, "Resolved backend");
        Ok(backend)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> ProviderContext {
        ProviderContext {
            settings: RelaySettings::default(),
            http: reqwest::Client::new(),
        }
    }

    #[test]
    fn test_builtin_names() {
        let registry = ProviderRegistry::builtin();
        assert_eq!(registry.names(), vec!["llama", "mock", "llama_emb", "nlp"]);
    }

    #[test]
    fn test_resolve_known_provider() {
        let registry = ProviderRegistry::builtin();
        let backend = registry.resolve("mock", &context()).unwrap();
        assert_eq!(backend.name(), "mock");
    }

    #[test]
    fn test_unknown_provider_lists_known_names() {
        let registry = ProviderRegistry::builtin();
        let Err(err) = registry.resolve("speech", &context()) else {
            panic!("resolving an unregistered name must fail");
        };
        match err {
            RegistryError::UnknownProvider { name, known } => {
                assert_eq!(name, "speech");
                assert!(known.contains(&"llama".to_string()));
                assert!(known.contains(&"nlp".to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_register_shadows_builtin() {
        let registry = ProviderRegistry::builtin().register("mock", |_| {
            Ok(Arc::new(MockBackend::new("SHADOW:".to_string())))
        });
        assert_eq!(registry.names().len(), 4);
        assert!(registry.resolve("mock", &context()).is_ok());
    }
}
