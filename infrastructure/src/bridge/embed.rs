//! Embedding upstream clients
//!
//! Two implementations of the [`EmbeddingSource`] port: an OpenAI-style
//! `/embeddings` endpoint and a lightweight NLP service speaking
//! `POST /embed` with an `X-API-Key` header.

use artrelay_application::{BackendError, BridgeSettings, EmbeddingKind, EmbeddingOptions, EmbeddingSource};
use artrelay_domain::Embedding;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

#[derive(Serialize)]
struct LlmEmbeddingBody<'a> {
    model: &'a str,
    input: [&'a str; 1],
}

/// Client for an OpenAI-style `/embeddings` endpoint.
pub struct LlmEmbeddingClient {
    http: reqwest::Client,
    base: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl LlmEmbeddingClient {
    pub fn new(http: reqwest::Client, settings: &BridgeSettings) -> Self {
        Self {
            http,
            base: settings.llm_base.clone(),
            api_key: settings.llm_api_key.clone(),
            timeout: settings.timeout,
        }
    }
}

#[async_trait]
impl EmbeddingSource for LlmEmbeddingClient {
    fn kind(&self) -> EmbeddingKind {
        EmbeddingKind::Llm
    }

    async fn embed(
        &self,
        text: &str,
        options: &EmbeddingOptions,
    ) -> Result<Embedding, BackendError> {
        // The orchestrator validates this before routing here.
        let model = options.llm_model.as_deref().ok_or_else(|| {
            BackendError::Transport("llm embedding requested without a model".to_string())
        })?;

        let url = format!("{}/embeddings", self.base);
        debug!(%url, model, "Requesting llm embedding");

        let mut builder = self
            .http
            .post(&url)
            .timeout(self.timeout)
            .json(&LlmEmbeddingBody {
                model,
                input: [text],
            });
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(BackendError::upstream(status, body));
        }

        parse_llm_embedding(&body)
    }
}

fn parse_llm_embedding(body: &str) -> Result<Embedding, BackendError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| BackendError::UnrecognizedResponse(e.to_string()))?;
    let vector = value["data"][0]["embedding"]
        .as_array()
        .ok_or_else(|| {
            BackendError::UnrecognizedResponse(
                "embeddings response missing data[0].embedding".to_string(),
            )
        })?
        .iter()
        .map(|v| v.as_f64().map(|f| f as f32))
        .collect::<Option<Vec<f32>>>()
        .ok_or_else(|| {
            BackendError::UnrecognizedResponse("embedding contains non-numeric values".to_string())
        })?;
    Ok(vector)
}

/// Client for the NLP embedding service.
pub struct NlpEmbeddingClient {
    http: reqwest::Client,
    base: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl NlpEmbeddingClient {
    pub fn new(http: reqwest::Client, settings: &BridgeSettings) -> Self {
        Self {
            http,
            base: settings.nlp_base.clone(),
            api_key: settings.nlp_api_key.clone(),
            timeout: settings.timeout,
        }
    }
}

#[async_trait]
impl EmbeddingSource for NlpEmbeddingClient {
    fn kind(&self) -> EmbeddingKind {
        EmbeddingKind::Nlp
    }

    async fn embed(
        &self,
        text: &str,
        options: &EmbeddingOptions,
    ) -> Result<Embedding, BackendError> {
        let body = nlp_body(text, options)?;

        let url = format!("{}/embed", self.base);
        debug!(%url, "Requesting nlp embedding");

        let mut builder = self.http.post(&url).timeout(self.timeout).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.header("X-API-Key", key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(BackendError::upstream(status, text));
        }

        parse_nlp_embedding(&text)
    }
}

/// The NLP service takes `text` alongside the tuning fields at the top
/// level of one flat object.
fn nlp_body(text: &str, options: &EmbeddingOptions) -> Result<Value, BackendError> {
    let mut body = match &options.nlp_params {
        Some(params) => serde_json::to_value(params)
            .map_err(|e| BackendError::Transport(e.to_string()))?,
        None => json!({}),
    };
    body["text"] = Value::String(text.to_string());
    Ok(body)
}

fn parse_nlp_embedding(body: &str) -> Result<Embedding, BackendError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| BackendError::UnrecognizedResponse(e.to_string()))?;
    value["vector"]
        .as_array()
        .ok_or_else(|| {
            BackendError::UnrecognizedResponse("embed response missing 'vector'".to_string())
        })?
        .iter()
        .map(|v| v.as_f64().map(|f| f as f32))
        .collect::<Option<Vec<f32>>>()
        .ok_or_else(|| {
            BackendError::UnrecognizedResponse("vector contains non-numeric values".to_string())
        })
}
