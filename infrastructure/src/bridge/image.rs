//! Image endpoint client
//!
//! Implements the [`ImageSynthesizer`] port: forwards an embedding to
//! the configured image server and normalizes its answer, or renders
//! placeholder artifacts when the mock sentinel is selected.

use crate::bridge::normalize::{normalize_image_response, RawUpstreamResponse};
use crate::bridge::placeholder;
use artrelay_application::{BackendError, BridgeSettings, ImageSynthesizer, SynthesisRequest};
use artrelay_domain::ArtifactEnvelope;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

#[derive(Serialize)]
struct ImageBody<'a> {
    embedding: &'a [f32],
    width: u32,
    height: u32,
}

/// Client for the image generation endpoint.
pub struct ImageClient {
    http: reqwest::Client,
    default_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl ImageClient {
    pub fn new(http: reqwest::Client, settings: &BridgeSettings) -> Self {
        Self {
            http,
            default_url: settings.image_url.clone(),
            api_key: settings.image_api_key.clone(),
            timeout: settings.timeout,
        }
    }

    /// Effective endpoint for one request: the request's override wins
    /// over the configured default.
    fn select_url<'a>(&'a self, request: &'a SynthesisRequest) -> &'a str {
        request
            .url_override
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or(&self.default_url)
    }
}

/// An empty URL or one starting with `mock` selects the internal
/// placeholder generator instead of a real endpoint.
fn is_mock_url(url: &str) -> bool {
    let url = url.trim();
    url.is_empty() || url.to_ascii_lowercase().starts_with("mock")
}

#[async_trait]
impl ImageSynthesizer for ImageClient {
    async fn synthesize(
        &self,
        request: &SynthesisRequest,
    ) -> Result<ArtifactEnvelope, BackendError> {
        let url = self.select_url(request);
        if is_mock_url(url) {
            return Ok(placeholder::placeholder_envelope(
                &request.text,
                request.width,
                request.height,
            ));
        }

        debug!(%url, dimension = request.embedding.len(), "Forwarding embedding to image server");

        let mut builder = self
            .http
            .post(url)
            .timeout(self.timeout)
            .json(&ImageBody {
                embedding: &request.embedding,
                width: request.width,
                height: request.height,
            });
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?
            .to_vec();

        normalize_image_response(&RawUpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}
