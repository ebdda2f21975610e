//! Deterministic mock backend
//!
//! Answers every request with a configured prefix followed by the
//! request text. No I/O, no upstream, so the whole wire path can be
//! exercised without any server running.

use artrelay_application::{Backend, BackendError, BackendReply};
use artrelay_domain::GenerationRequest;
use async_trait::async_trait;

pub struct MockBackend {
    prefix: String,
}

impl MockBackend {
    pub fn new(prefix: String) -> Self {
        Self { prefix }
    }
}

#[async_trait]
impl Backend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<BackendReply, BackendError> {
        Ok(BackendReply::Text(format!(
            "{} {}",
            self.prefix, request.text
        )))
    }
}
