//! Chat-completion backend
//!
//! Forwards the client's text to an OpenAI-style `/chat/completions`
//! endpoint as a single user message and normalizes whatever shape the
//! upstream answers with back into plain text.

use crate::providers::registry::ProviderContext;
use artrelay_application::{Backend, BackendError, BackendReply};
use artrelay_domain::{ChatMessage, GenerationRequest};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Token cap sent with every completion request.
const MAX_TOKENS: u32 = 500;
/// Sampling temperature sent with every completion request.
const TEMPERATURE: f64 = 0.2;

#[derive(Serialize)]
struct CompletionBody {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f64,
}

/// Backend that relays text through a chat-completion upstream.
pub struct ChatBackend {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl ChatBackend {
    pub fn new(context: &ProviderContext) -> Self {
        Self {
            http: context.http.clone(),
            base_url: context.settings.base_url.clone(),
            api_key: context.settings.api_key.clone(),
            model: context
                .settings
                .model
                .clone()
                .unwrap_or_else(|| "local-llama".to_string()),
        }
    }
}

/// Pull the reply text out of an upstream response body.
///
/// Tries the shapes a chat upstream may answer with, in order:
/// `choices[0].message.content`, then the legacy `choices[0].text`,
/// then a bare `content` field. A body that is not JSON at all, or JSON
/// in none of those shapes, is taken literally.
pub fn extract_chat_text(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.to_string();
    };

    if let Some(text) = value["choices"][0]["message"]["content"].as_str() {
        return text.to_string();
    }
    if let Some(text) = value["choices"][0]["text"].as_str() {
        return text.to_string();
    }
    if let Some(text) = value["content"].as_str() {
        return text.to_string();
    }

    warn!("Chat upstream returned JSON in an unfamiliar shape, passing it through");
    body.to_string()
}

#[async_trait]
impl Backend for ChatBackend {
    fn name(&self) -> &str {
        "llama"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<BackendReply, BackendError> {
        let model = request.model.clone().unwrap_or_else(|| self.model.clone());
        let body = CompletionBody {
            model,
            messages: vec![ChatMessage::user(&request.text)],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!(%url, model = %body.model, "Forwarding to chat upstream");

        let mut builder = self.http.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
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
        if text.trim().is_empty() {
            return Err(BackendError::UnrecognizedResponse(
                "empty body from chat upstream".to_string(),
            ));
        }

        Ok(BackendReply::Text(extract_chat_text(&text)))
    }
}
