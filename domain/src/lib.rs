//! Domain layer for artrelay
//!
//! This crate contains the core value objects of the relay: chat
//! messages, generation requests, embeddings, and the canonical
//! artifact envelope that every heterogeneous upstream response is
//! normalized into. It has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! ## Artifact Envelope
//!
//! Upstream image services reply in wildly different shapes (JSON with
//! a list of images, JSON with a single field, raw binary). The
//! [`ArtifactEnvelope`] is the single canonical contract: an ordered
//! sequence of base64 blobs plus a MIME type. An empty sequence is
//! valid and means "no output"; the sequence is never null.
//!
//! ## Backend
//!
//! A backend turns a [`GenerationRequest`] into a reply (text or an
//! envelope). The contract itself is a port in the application layer;
//! this crate only holds the data that flows through it.

pub mod artifact;
pub mod chat;
pub mod embedding;
pub mod generation;

// Re-export commonly used types
pub use artifact::{ArtifactEnvelope, DecodeError, DEFAULT_MIME};
pub use chat::{ChatMessage, Role};
pub use embedding::{Embedding, NlpParams};
pub use generation::GenerationRequest;
