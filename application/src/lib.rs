//! Application layer for artrelay
//!
//! This crate contains use cases, port definitions, and the immutable
//! runtime settings values constructed once at startup. It depends only
//! on the domain layer.

pub mod ports;
pub mod settings;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    backend::{Backend, BackendError, BackendReply},
    embedding::{EmbeddingKind, EmbeddingOptions, EmbeddingSource},
    image::{ImageSynthesizer, SynthesisRequest},
};
pub use settings::{BridgeSettings, RelaySettings};
pub use use_cases::relay_text::RelayTextUseCase;
pub use use_cases::text_to_image::{TextToImageError, TextToImageInput, TextToImageUseCase};
