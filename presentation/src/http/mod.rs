//! HTTP surface for the text-to-image orchestrator

mod routes;

pub use routes::{bridge_router, BridgeState};
