//! Image response normalizer
//!
//! Image servers answer in one of three shapes: JSON carrying a list of
//! base64 images, JSON carrying a single base64 image, or a raw binary
//! body. This module flattens all of them into [`ArtifactEnvelope`] so
//! nothing downstream ever sees an upstream-specific shape.

use artrelay_application::BackendError;
use artrelay_domain::{ArtifactEnvelope, DEFAULT_MIME};
use serde_json::Value;
use tracing::debug;

/// An image server response captured before interpretation.
#[derive(Debug, Clone)]
pub struct RawUpstreamResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RawUpstreamResponse {
    fn content_type(&self) -> &str {
        self.content_type.as_deref().unwrap_or("")
    }

    fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Normalize an image server response into the canonical envelope.
///
/// Interpretation order:
/// 1. JSON body with a non-empty `images_base64` list passes through.
/// 2. JSON body with a single `image_base64` field is wrapped into a
///    one-element list.
/// 3. A 200 with an `image/*` or `application/octet-stream` body is
///    base64-encoded into a one-element list.
/// 4. Anything else is an upstream error.
///
/// A conformant JSON body always wins over binary sniffing, even when
/// the declared content-type is ambiguous. A failing status is an error
/// even when the body happens to parse as one of the JSON shapes; an
/// upstream that says 500 is not trusted to have produced an image.
pub fn normalize_image_response(
    response: &RawUpstreamResponse,
) -> Result<ArtifactEnvelope, BackendError> {
    let ctype = response.content_type().to_ascii_lowercase();

    if !response.is_success() {
        return Err(BackendError::upstream(response.status, response.body_text()));
    }

    if let Ok(value) = serde_json::from_slice::<Value>(&response.body) {
        if let Some(envelope) = envelope_from_json(&value) {
            debug!(
                artifacts = envelope.images_base64.len(),
                "Normalized JSON image response"
            );
            return Ok(envelope);
        }
    }

    if ctype.starts_with("image/") || ctype.starts_with("application/octet-stream") {
        let mime = if ctype.starts_with("image/") {
            response.content_type()
        } else {
            DEFAULT_MIME
        };
        debug!(bytes = response.body.len(), mime, "Normalized binary image response");
        return Ok(ArtifactEnvelope::from_bytes(&response.body, mime));
    }

    Err(BackendError::UnrecognizedResponse(format!(
        "image server returned unusable response (content-type '{}'): {}",
        response.content_type(),
        response.body_text()
    )))
}

fn envelope_from_json(value: &Value) -> Option<ArtifactEnvelope> {
    let mime = value["mime"].as_str().unwrap_or(DEFAULT_MIME);

    if let Some(list) = value["images_base64"].as_array() {
        let blobs: Vec<String> = list
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect();
        if !blobs.is_empty() {
            return Some(ArtifactEnvelope::new(blobs, mime));
        }
    }

    value["image_base64"]
        .as_str()
        .map(|blob| ArtifactEnvelope::single(blob, mime))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_response(status: u16, body: &str) -> RawUpstreamResponse {
        RawUpstreamResponse {
            status,
            content_type: Some("application/json".to_string()),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_json_list_passes_through() {
        let response = json_response(200, r#"{"images_base64":["AAAA","BBBB"],"mime":"image/jpeg"}"#);
        let envelope = normalize_image_response(&response).unwrap();
        assert_eq!(envelope.images_base64, vec!["AAAA", "BBBB"]);
        assert_eq!(envelope.mime, "image/jpeg");
    }

    #[test]
    fn test_json_single_field_is_wrapped() {
        let response = json_response(200, r#"{"image_base64":"Zm9v"}"#);
        let envelope = normalize_image_response(&response).unwrap();
        assert_eq!(envelope.images_base64, vec!["Zm9v"]);
        assert_eq!(envelope.mime, DEFAULT_MIME);
    }

    #[test]
    fn test_json_empty_list_falls_through_to_error() {
        let response = json_response(200, r#"{"images_base64":[]}"#);
        let err = normalize_image_response(&response).unwrap_err();
        assert!(matches!(err, BackendError::UnrecognizedResponse(_)));
    }

    #[test]
    fn test_json_wins_over_ambiguous_content_type() {
        // A JSON envelope delivered with an image content-type is still
        // taken as JSON, not base64-encoded as a binary blob.
        let response = RawUpstreamResponse {
            status: 200,
            content_type: Some("image/png".to_string()),
            body: br#"{"images_base64":["AAAA"]}"#.to_vec(),
        };
        let envelope = normalize_image_response(&response).unwrap();
        assert_eq!(envelope.images_base64, vec!["AAAA"]);
    }

    #[test]
    fn test_binary_image_is_encoded() {
        let response = RawUpstreamResponse {
            status: 200,
            content_type: Some("image/png".to_string()),
            body: b"pngbytes".to_vec(),
        };
        let envelope = normalize_image_response(&response).unwrap();
        assert_eq!(envelope.mime, "image/png");
        assert_eq!(envelope.decode_artifacts(), vec![b"pngbytes".to_vec()]);
    }

    #[test]
    fn test_octet_stream_gets_default_mime() {
        let response = RawUpstreamResponse {
            status: 200,
            content_type: Some("application/octet-stream".to_string()),
            body: b"blob".to_vec(),
        };
        let envelope = normalize_image_response(&response).unwrap();
        assert_eq!(envelope.mime, DEFAULT_MIME);
    }

    #[test]
    fn test_failing_status_is_error_even_with_valid_json() {
        let response = json_response(500, r#"{"images_base64":["AAAA"]}"#);
        let err = normalize_image_response(&response).unwrap_err();
        match err {
            BackendError::Upstream { status, .. } => assert_eq!(status, 500),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_html_error_page_is_unrecognized() {
        let response = RawUpstreamResponse {
            status: 200,
            content_type: Some("text/html".to_string()),
            body: b"<html>busy</html>".to_vec(),
        };
        let err = normalize_image_response(&response).unwrap_err();
        match err {
            BackendError::UnrecognizedResponse(msg) => assert!(msg.contains("text/html")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_content_type_is_unrecognized() {
        let response = RawUpstreamResponse {
            status: 200,
            content_type: None,
            body: b"????".to_vec(),
        };
        assert!(normalize_image_response(&response).is_err());
    }
}
