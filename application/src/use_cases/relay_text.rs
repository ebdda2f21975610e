//! Relay text use case.
//!
//! One inbound request text goes to the configured backend and comes
//! back as the text that will be framed onto the wire. The backend call
//! is bounded by the configured upstream timeout so a stalled upstream
//! can never pin a connection task forever.

use crate::ports::backend::{Backend, BackendError};
use artrelay_domain::GenerationRequest;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// Use case for dispatching one relay request to the backend.
///
/// Shared by every connection task; holds no per-request state.
pub struct RelayTextUseCase {
    backend: Arc<dyn Backend>,
    provider: String,
    timeout: Duration,
}

impl RelayTextUseCase {
    pub fn new(backend: Arc<dyn Backend>, provider: impl Into<String>, timeout: Duration) -> Self {
        Self {
            backend,
            provider: provider.into(),
            timeout,
        }
    }

    /// Dispatch one request text and return the reply text.
    ///
    /// Artifact replies are flattened to their canonical JSON since the
    /// relay wire only carries text. A timeout surfaces as
    /// [`BackendError::Timeout`].
    pub async fn handle(&self, text: &str) -> Result<String, BackendError> {
        let request = GenerationRequest::new(text, &self.provider);

        let reply = timeout(self.timeout, self.backend.generate(request))
            .await
            .map_err(|_| BackendError::Timeout)??;

        let wire = reply.into_wire_text();
        debug!(backend = self.backend.name(), reply_len = wire.len(), "Backend replied");
        Ok(wire)
    }
}
