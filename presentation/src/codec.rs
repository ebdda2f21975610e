//! Newline frame codec
//!
//! Replies travel as newline-terminated frames. The codec buffers
//! incoming bytes and yields one payload per `\n`, discarding empty
//! frames so a trailing delimiter or keep-alive blank line never turns
//! into a phantom message.
//!
//! Payloads are not escaped: a reply that itself contains `\n` will be
//! split into multiple frames on the receiving side. Producers that
//! need an opaque payload (like the artifact envelope) use single-line
//! JSON.

/// Incremental splitter for newline-terminated frames.
#[derive(Debug, Default)]
pub struct FrameCodec {
    buffer: Vec<u8>,
}

impl FrameCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of bytes, returning every frame completed by it.
    ///
    /// Frames arrive in order; bytes after the last delimiter stay
    /// buffered until a later chunk completes them.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Vec<u8>> {
        self.buffer.extend_from_slice(chunk);

        let mut frames = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let mut frame: Vec<u8> = self.buffer.drain(..=pos).collect();
            frame.pop(); // delimiter
            if !frame.is_empty() {
                frames.push(frame);
            }
        }
        frames
    }

    /// Bytes buffered but not yet terminated.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}

/// Terminate a payload for the wire.
pub fn encode_frame(payload: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 1);
    out.extend_from_slice(payload.as_bytes());
    out.push(b'\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_frame() {
        let mut codec = FrameCodec::new();
        assert_eq!(codec.feed(b"hello\n"), vec![b"hello".to_vec()]);
        assert_eq!(codec.pending(), 0);
    }

    #[test]
    fn test_partial_then_completion() {
        let mut codec = FrameCodec::new();
        assert!(codec.feed(b"hel").is_empty());
        assert_eq!(codec.pending(), 3);
        assert_eq!(codec.feed(b"lo\nwor"), vec![b"hello".to_vec()]);
        assert_eq!(codec.feed(b"ld\n"), vec![b"world".to_vec()]);
    }

    #[test]
    fn test_multiple_frames_in_one_chunk() {
        let mut codec = FrameCodec::new();
        assert_eq!(
            codec.feed(b"a\nb\nc\n"),
            vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]
        );
    }

    #[test]
    fn test_empty_frames_discarded() {
        let mut codec = FrameCodec::new();
        assert_eq!(codec.feed(b"\n\na\n\n"), vec![b"a".to_vec()]);
    }

    #[test]
    fn test_embedded_newline_splits_payload() {
        // Known framing limit: an unescaped delimiter inside a payload
        // produces two frames.
        let mut codec = FrameCodec::new();
        let frames = codec.feed(&encode_frame("line1\nline2"));
        assert_eq!(frames, vec![b"line1".to_vec(), b"line2".to_vec()]);
    }

    #[test]
    fn test_encode_appends_delimiter() {
        assert_eq!(encode_frame("hi"), b"hi\n".to_vec());
    }

    #[test]
    fn test_byte_at_a_time() {
        let mut codec = FrameCodec::new();
        let mut frames = Vec::new();
        for b in b"cat\ndog\n" {
            frames.extend(codec.feed(&[*b]));
        }
        assert_eq!(frames, vec![b"cat".to_vec(), b"dog".to_vec()]);
    }
}
