//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for artrelay
#[derive(Parser, Debug)]
#[command(name = "artrelay")]
#[command(author, version, about = "Text-to-artifact relay and orchestrator")]
#[command(long_about = r#"
Artrelay accepts raw text over TCP, routes it through a configured
backend (chat completion, deterministic mock, or an embedding bridge)
and answers with newline-framed replies. The serve command also starts
the HTTP orchestrator that chains an embedding upstream into an image
endpoint.

Configuration files are loaded from (in priority order):
1. ARTRELAY_* environment variables
2. --config <path>     Explicit config file
3. ./artrelay.toml     Project-level config
4. ~/.config/artrelay/config.toml   Global config

Example:
  artrelay serve
  artrelay serve --provider mock
  artrelay send "a red cat on a roof"
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the TCP relay and the HTTP orchestrator
    Serve {
        /// Override the configured provider
        #[arg(short, long, value_name = "NAME")]
        provider: Option<String>,

        /// Override the configured relay listen address
        #[arg(short, long, value_name = "ADDR")]
        listen: Option<String>,
    },

    /// Send one request to a running relay and print the reply
    Send {
        /// The request text
        text: String,

        /// Relay address to connect to
        #[arg(short, long, value_name = "ADDR", default_value = "localhost:12345")]
        addr: String,

        /// Directory to write decoded artifacts into, when the reply
        /// is an artifact envelope
        #[arg(short, long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_parses() {
        let cli = Cli::try_parse_from(["artrelay", "serve", "--provider", "mock", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Serve { provider, listen } => {
                assert_eq!(provider.as_deref(), Some("mock"));
                assert!(listen.is_none());
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_send_defaults() {
        let cli = Cli::try_parse_from(["artrelay", "send", "a red cat"]).unwrap();
        match cli.command {
            Command::Send { text, addr, out_dir } => {
                assert_eq!(text, "a red cat");
                assert_eq!(addr, "localhost:12345");
                assert!(out_dir.is_none());
            }
            _ => panic!("expected send"),
        }
    }
}
