//! TCP relay surface
//!
//! The accept loop and the per-connection request/reply loop.

mod connection;
mod server;

pub use connection::serve_connection;
pub use server::RelayServer;
