//! TCP client helper
//!
//! A small client for the relay, used by the `send` command and by
//! integration tests. Sends raw text and reads newline-framed replies.

use crate::codec::{encode_frame, FrameCodec};
use artrelay_domain::ArtifactEnvelope;
use std::collections::VecDeque;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("server closed the connection")]
    ConnectionClosed,
}

/// Client side of the relay protocol.
pub struct RelayClient {
    stream: TcpStream,
    codec: FrameCodec,
    queued: VecDeque<String>,
}

impl RelayClient {
    /// Connect to a relay.
    pub async fn connect(addr: &str) -> Result<Self, ClientError> {
        let stream = TcpStream::connect(addr).await?;
        debug!(%addr, "Connected to relay");
        Ok(Self {
            stream,
            codec: FrameCodec::new(),
            queued: VecDeque::new(),
        })
    }

    /// Send one request. The relay treats the whole burst as the
    /// request text, so no delimiter is appended.
    pub async fn send(&mut self, text: &str) -> Result<(), ClientError> {
        self.stream.write_all(text.as_bytes()).await?;
        Ok(())
    }

    /// Read the next reply frame, blocking until one arrives.
    pub async fn next_reply(&mut self) -> Result<String, ClientError> {
        loop {
            if let Some(frame) = self.queued.pop_front() {
                return Ok(frame);
            }

            let mut buf = [0u8; 64 * 1024];
            let n = self.stream.read(&mut buf).await?;
            if n == 0 {
                return Err(ClientError::ConnectionClosed);
            }
            for frame in self.codec.feed(&buf[..n]) {
                self.queued
                    .push_back(String::from_utf8_lossy(&frame).into_owned());
            }
        }
    }

    /// Send one request and wait for its reply.
    pub async fn request(&mut self, text: &str) -> Result<String, ClientError> {
        self.send(text).await?;
        self.next_reply().await
    }
}

/// Try to interpret a reply as an artifact envelope.
///
/// Bridge backends answer with the envelope's JSON on a single line;
/// any other reply is plain text and yields `None`.
pub fn parse_artifact_reply(reply: &str) -> Option<ArtifactEnvelope> {
    serde_json::from_str(reply).ok()
}

/// Send an outbound frame on a raw stream. Exposed for callers that
/// speak the framed direction themselves.
pub async fn write_frame(stream: &mut TcpStream, payload: &str) -> std::io::Result<()> {
    stream.write_all(&encode_frame(payload)).await
}
