//! Orchestrator routes
//!
//! `POST /v1/text-to-image` is the only endpoint. Caller mistakes come
//! back as a 400 before any upstream is contacted; upstream failures
//! come back as a 502 carrying the upstream's complaint. Both shapes
//! are `{"detail": "..."}` so clients have one error format to parse.

use artrelay_application::{
    EmbeddingKind, TextToImageError, TextToImageInput, TextToImageUseCase,
};
use artrelay_domain::NlpParams;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared state behind every orchestrator route.
#[derive(Clone)]
pub struct BridgeState {
    pub use_case: Arc<TextToImageUseCase>,
}

/// Request body for `POST /v1/text-to-image`.
///
/// `source` arrives as a free string so an unknown tag can be answered
/// with a 400 instead of a generic deserialization failure.
#[derive(Debug, Deserialize)]
struct TextToImageBody {
    text: String,
    source: String,
    #[serde(default)]
    llm_model: Option<String>,
    #[serde(default)]
    nlp_params: Option<NlpParams>,
    #[serde(default)]
    image_url_override: Option<String>,
}

fn error_response(status: StatusCode, detail: impl Into<String>) -> Response {
    (status, Json(json!({ "detail": detail.into() }))).into_response()
}

/// Build the orchestrator router.
pub fn bridge_router(state: BridgeState) -> Router {
    Router::new()
        .route("/v1/text-to-image", post(text_to_image))
        .with_state(state)
}

async fn text_to_image(
    State(state): State<BridgeState>,
    Json(body): Json<TextToImageBody>,
) -> Response {
    let source = match body.source.as_str() {
        "llm" => EmbeddingKind::Llm,
        "nlp" => EmbeddingKind::Nlp,
        other => {
            warn!(source = other, "Rejecting unknown embedding source");
            return error_response(
                StatusCode::BAD_REQUEST,
                "source must be 'llm' or 'nlp'",
            );
        }
    };

    let mut input = TextToImageInput::new(body.text, source);
    input.llm_model = body.llm_model;
    input.nlp_params = body.nlp_params;
    input.image_url_override = body.image_url_override;

    match state.use_case.execute(input).await {
        Ok(envelope) => {
            info!(artifacts = envelope.images_base64.len(), "Request served");
            (StatusCode::OK, Json(envelope)).into_response()
        }
        Err(TextToImageError::InvalidRequest(detail)) => {
            error_response(StatusCode::BAD_REQUEST, detail)
        }
        Err(TextToImageError::Backend(err)) => {
            warn!(error = %err, "Upstream failure");
            error_response(StatusCode::BAD_GATEWAY, err.to_string())
        }
    }
}
