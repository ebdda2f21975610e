//! Presentation layer for artrelay
//!
//! The wire surfaces: the newline-framed TCP relay, the HTTP surface
//! for the text-to-image orchestrator, a small TCP client helper, and
//! the CLI argument definitions.

pub mod cli;
pub mod client;
pub mod codec;
pub mod http;
pub mod tcp;

// Re-export commonly used types
pub use cli::{Cli, Command};
pub use client::{ClientError, RelayClient};
pub use codec::FrameCodec;
pub use http::{bridge_router, BridgeState};
pub use tcp::RelayServer;
