//! Deterministic placeholder artifacts
//!
//! When no image endpoint is configured (or the sentinel `mock` URL is
//! selected) the orchestrator still answers with real PNGs so the whole
//! pipeline stays exercisable offline. Output is a pure function of the
//! request text and dimensions.

use artrelay_domain::ArtifactEnvelope;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage};
use tracing::debug;

/// Number of placeholder artifacts per response.
pub const MOCK_COUNT: usize = 2;

const BACKGROUND: Rgb<u8> = Rgb([32, 32, 48]);
const FOREGROUND: Rgb<u8> = Rgb([220, 220, 240]);

/// Build the placeholder envelope for one request.
pub fn placeholder_envelope(text: &str, width: u32, height: u32) -> ArtifactEnvelope {
    let blobs = (0..MOCK_COUNT)
        .map(|index| {
            let bytes = render_png(text, index, width, height);
            base64_encode(&bytes)
        })
        .collect();
    debug!(count = MOCK_COUNT, width, height, "Rendered placeholder artifacts");
    ArtifactEnvelope::new(blobs, "image/png")
}

fn base64_encode(bytes: &[u8]) -> String {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Render one placeholder frame: a flat background with a vertical
/// stripe whose position is derived from the text, so different prompts
/// produce visibly different output.
fn render_png(text: &str, index: usize, width: u32, height: u32) -> Vec<u8> {
    let mut img = RgbImage::from_pixel(width.max(1), height.max(1), BACKGROUND);

    let hash = fold_text(text).wrapping_add(index as u32);
    let stripe = hash % img.width();
    let stripe_width = (img.width() / 32).max(1);
    for y in 0..img.height() {
        for dx in 0..stripe_width {
            let x = (stripe + dx) % img.width();
            img.put_pixel(x, y, FOREGROUND);
        }
    }

    let mut out = Vec::new();
    let encoder = PngEncoder::new(&mut out);
    encoder
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            ExtendedColorType::Rgb8,
        )
        .expect("png encoding into an in-memory buffer cannot fail");
    out
}

fn fold_text(text: &str) -> u32 {
    text.bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32))
}
