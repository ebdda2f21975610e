//! Orchestrator upstream clients
//!
//! HTTP clients for the embedding upstreams and the image endpoint,
//! plus the response normalizer that flattens every image server
//! answer into the canonical artifact envelope and the deterministic
//! placeholder generator used when no image endpoint is configured.

pub mod embed;
pub mod image;
pub mod normalize;
pub mod placeholder;
