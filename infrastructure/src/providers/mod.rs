//! Backend provider adapters
//!
//! Each submodule implements the application layer's [`Backend`] port
//! for one upstream family. The registry maps stable provider names to
//! constructors so the active backend is chosen by configuration and
//! validated once at startup.
//!
//! [`Backend`]: artrelay_application::Backend

pub mod bridge;
pub mod chat;
pub mod mock;
pub mod registry;
