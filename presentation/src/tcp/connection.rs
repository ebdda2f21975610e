//! Per-connection request/reply loop
//!
//! One read burst is one request: whatever bytes arrive in a single
//! read are decoded as lossy UTF-8, trimmed, and dispatched as one
//! request text. The connection is strictly sequential; the next read
//! does not happen until the current reply (or error frame) has been
//! written. Backend failures are answered in-band with an `LLM_ERROR:`
//! frame and the connection stays open for the next request.

use crate::codec::encode_frame;
use artrelay_application::RelayTextUseCase;
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const READ_BUFFER: usize = 64 * 1024;

/// Marker prefix for in-band error frames.
pub const ERROR_PREFIX: &str = "LLM_ERROR:";

/// Drive one client connection until it disconnects or the server
/// shuts down.
pub async fn serve_connection(
    mut stream: TcpStream,
    peer: std::net::SocketAddr,
    use_case: Arc<RelayTextUseCase>,
    shutdown: CancellationToken,
) -> io::Result<()> {
    let mut buf = vec![0u8; READ_BUFFER];

    loop {
        let read = tokio::select! {
            read = stream.read(&mut buf) => read?,
            _ = shutdown.cancelled() => {
                debug!(%peer, "Closing connection on shutdown");
                return Ok(());
            }
        };
        if read == 0 {
            info!(%peer, "Client disconnected");
            return Ok(());
        }

        let text = String::from_utf8_lossy(&buf[..read]);
        let text = text.trim();
        // A burst of pure whitespace is not a request.
        if text.is_empty() {
            continue;
        }

        debug!(%peer, len = text.len(), "Request received");
        let reply = match use_case.handle(text).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(%peer, error = %err, "Backend failed, answering in-band");
                format!("{ERROR_PREFIX} {err}")
            }
        };

        stream.write_all(&encode_frame(&reply)).await?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::FrameCodec;
    use artrelay_application::{Backend, BackendError, BackendReply};
    use artrelay_domain::GenerationRequest;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::net::TcpListener;

    struct PrefixBackend;

    #[async_trait]
    impl Backend for PrefixBackend {
        fn name(&self) -> &str {
            "mock"
        }

        async fn generate(
            &self,
            request: GenerationRequest,
        ) -> Result<BackendReply, BackendError> {
            Ok(BackendReply::Text(format!("MOCK: {}", request.text)))
        }
    }

    struct SlowBackend;

    #[async_trait]
    impl Backend for SlowBackend {
        fn name(&self) -> &str {
            "slow"
        }

        async fn generate(
            &self,
            request: GenerationRequest,
        ) -> Result<BackendReply, BackendError> {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(BackendReply::Text(format!("SLOW: {}", request.text)))
        }
    }

    struct FailingBackend;

    #[async_trait]
    impl Backend for FailingBackend {
        fn name(&self) -> &str {
            "failing"
        }

        async fn generate(&self, _: GenerationRequest) -> Result<BackendReply, BackendError> {
            Err(BackendError::upstream(503, "overloaded"))
        }
    }

    async fn spawn_server(backend: Arc<dyn Backend>) -> std::net::SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let use_case = Arc::new(RelayTextUseCase::new(
            backend,
            "test",
            Duration::from_secs(5),
        ));
        tokio::spawn(async move {
            loop {
                let (stream, peer) = listener.accept().await.unwrap();
                let use_case = use_case.clone();
                tokio::spawn(serve_connection(
                    stream,
                    peer,
                    use_case,
                    CancellationToken::new(),
                ));
            }
        });
        addr
    }

    async fn read_frame(stream: &mut TcpStream) -> String {
        let mut codec = FrameCodec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = stream.read(&mut buf).await.unwrap();
            assert!(n > 0, "connection closed before a frame arrived");
            let mut frames = codec.feed(&buf[..n]);
            if let Some(frame) = frames.pop() {
                return String::from_utf8(frame).unwrap();
            }
        }
    }

    #[tokio::test]
    async fn test_request_reply_round_trip() {
        let addr = spawn_server(Arc::new(PrefixBackend)).await;
        let mut stream = TcpStream::connect(addr).await.unwrap();

        stream.write_all(b"cat").await.unwrap();
        assert_eq!(read_frame(&mut stream).await, "MOCK: cat");

        // The connection survives for a second request.
        stream.write_all(b"dog").await.unwrap();
        assert_eq!(read_frame(&mut stream).await, "MOCK: dog");
    }

    #[tokio::test]
    async fn test_surrounding_whitespace_trimmed() {
        let addr = spawn_server(Arc::new(PrefixBackend)).await;
        let mut stream = TcpStream::connect(addr).await.unwrap();

        stream.write_all(b"  cat \n").await.unwrap();
        assert_eq!(read_frame(&mut stream).await, "MOCK: cat");
    }

    #[tokio::test]
    async fn test_backend_failure_is_in_band_and_nonfatal() {
        let addr = spawn_server(Arc::new(FailingBackend)).await;
        let mut stream = TcpStream::connect(addr).await.unwrap();

        stream.write_all(b"cat").await.unwrap();
        let reply = read_frame(&mut stream).await;
        assert!(reply.starts_with(ERROR_PREFIX), "got: {reply}");
        assert!(reply.contains("503"));

        // Still serving after the error.
        stream.write_all(b"dog").await.unwrap();
        assert!(read_frame(&mut stream).await.starts_with(ERROR_PREFIX));
    }

    #[tokio::test]
    async fn test_connections_do_not_cross_talk() {
        let addr = spawn_server(Arc::new(PrefixBackend)).await;
        let mut a = TcpStream::connect(addr).await.unwrap();
        let mut b = TcpStream::connect(addr).await.unwrap();

        a.write_all(b"from-a").await.unwrap();
        b.write_all(b"from-b").await.unwrap();

        assert_eq!(read_frame(&mut a).await, "MOCK: from-a");
        assert_eq!(read_frame(&mut b).await, "MOCK: from-b");
    }

    #[tokio::test]
    async fn test_disconnect_between_requests_is_clean() {
        let addr = spawn_server(Arc::new(PrefixBackend)).await;
        {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            stream.write_all(b"cat").await.unwrap();
            let _ = read_frame(&mut stream).await;
        } // dropped here

        // The server keeps accepting after an abrupt disconnect.
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(b"dog").await.unwrap();
        assert_eq!(read_frame(&mut stream).await, "MOCK: dog");
    }

    #[tokio::test]
    async fn test_disconnect_during_outstanding_call_is_clean() {
        let addr = spawn_server(Arc::new(SlowBackend)).await;
        {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            stream.write_all(b"cat").await.unwrap();
            // Drop while the backend is still working; the pending
            // reply has nowhere to go.
        }
        tokio::time::sleep(Duration::from_millis(300)).await;

        // The discarded reply must not disturb later connections.
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(b"dog").await.unwrap();
        assert_eq!(read_frame(&mut stream).await, "SLOW: dog");
    }
}
