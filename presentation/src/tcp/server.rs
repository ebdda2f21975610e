//! TCP accept loop

use crate::tcp::connection::serve_connection;
use artrelay_application::RelayTextUseCase;
use std::io;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// The relay's TCP listener. One task per connection; the shared use
/// case carries the backend.
pub struct RelayServer {
    listener: TcpListener,
    use_case: Arc<RelayTextUseCase>,
}

impl RelayServer {
    /// Bind the listen address. Fails fast so a bad address is caught
    /// at startup, not at first connection.
    pub async fn bind(addr: &str, use_case: Arc<RelayTextUseCase>) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!(addr = %listener.local_addr()?, "Relay listening");
        Ok(Self { listener, use_case })
    }

    /// The bound address, useful when binding port 0.
    pub fn local_addr(&self) -> io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections until the token is cancelled.
    ///
    /// Accept errors are logged and the loop continues; a transient
    /// failure on one accept must not take the relay down.
    pub async fn run(self, shutdown: CancellationToken) -> io::Result<()> {
        loop {
            let accepted = tokio::select! {
                accepted = self.listener.accept() => accepted,
                _ = shutdown.cancelled() => {
                    info!("Relay shutting down");
                    return Ok(());
                }
            };

            match accepted {
                Ok((stream, peer)) => {
                    info!(%peer, "Client connected");
                    let use_case = self.use_case.clone();
                    let token = shutdown.clone();
                    tokio::spawn(async move {
                        if let Err(err) = serve_connection(stream, peer, use_case, token).await {
                            debug!(%peer, error = %err, "Connection ended with I/O error");
                        }
                    });
                }
                Err(err) => {
                    warn!(error = %err, "Accept failed");
                }
            }
        }
    }
}
