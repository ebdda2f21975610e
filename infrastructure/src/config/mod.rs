//! Configuration loading
//!
//! Raw TOML structures plus the figment-based loader that merges
//! defaults, config files, and `ARTRELAY_*` environment variables into
//! one immutable configuration read exactly once at startup.

mod file_config;
mod loader;

pub use file_config::{
    FileBridgeConfig, FileChatConfig, FileConfig, FileMockConfig, FileProvidersConfig,
    FileRelayConfig,
};
pub use loader::ConfigLoader;
