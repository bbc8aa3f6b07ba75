//! Streamed response consumption.
//!
//! The chat backend answers a successful submission with a chunked text
//! body. This module assembles that byte stream into a single string,
//! decoding UTF-8 incrementally so that a multi-byte character split across
//! chunk boundaries is still decoded correctly. The stream is consumed by
//! value; dropping it on any exit path releases the underlying connection.

use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bytes::Bytes;
use futures::{Stream, StreamExt};

use crate::error::{Error, Result};
use crate::observability::{STREAM_BYTES, STREAM_CHUNKS};

/// A boxed stream of body chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// A successful backend response whose body arrives incrementally.
pub struct StreamingReply {
    body: Option<ByteStream>,
}

impl StreamingReply {
    /// Wrap a body stream.
    pub fn new(body: ByteStream) -> Self {
        Self { body: Some(body) }
    }

    /// A reply that exposes no readable body.
    pub fn without_body() -> Self {
        Self { body: None }
    }

    /// A reply whose whole body is a single chunk. Useful for hosts that
    /// already hold the text, and for tests.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::from_chunks(vec![Bytes::from(text.into())])
    }

    /// A reply delivered as the given sequence of chunks.
    pub fn from_chunks(chunks: Vec<Bytes>) -> Self {
        let stream = futures::stream::iter(chunks.into_iter().map(Ok));
        Self::new(Box::pin(stream))
    }

    /// Take the body stream, failing if the reply exposes none.
    pub fn into_body(self) -> Result<ByteStream> {
        self.body
            .ok_or_else(|| Error::streaming("response exposed no readable body", None))
    }
}

/// Assemble a streamed reply into its full text.
pub async fn collect_text(reply: StreamingReply) -> Result<String> {
    let mut stream = reply.into_body()?;
    let mut decoder = Utf8Accumulator::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        STREAM_CHUNKS.click();
        STREAM_BYTES.count(chunk.len() as u64);
        decoder.push(&chunk)?;
    }
    decoder.finish()
}

/// Assemble a streamed reply into its full text, honoring a host-owned
/// interrupt flag.
///
/// The flag is observed once per chunk; when it is set, the stream is
/// dropped and the text accumulated so far is returned.
pub async fn collect_text_with_interrupt(
    reply: StreamingReply,
    interrupted: Arc<AtomicBool>,
) -> Result<String> {
    let mut stream = reply.into_body()?;
    let mut decoder = Utf8Accumulator::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        STREAM_CHUNKS.click();
        STREAM_BYTES.count(chunk.len() as u64);
        decoder.push(&chunk)?;
        if interrupted.load(Ordering::Relaxed) {
            return Ok(decoder.finish_partial());
        }
    }
    decoder.finish()
}

/// Incremental UTF-8 decoder.
///
/// Holds back the trailing bytes of an incomplete sequence until the next
/// chunk completes it.
struct Utf8Accumulator {
    text: String,
    partial: Vec<u8>,
}

impl Utf8Accumulator {
    fn new() -> Self {
        Self {
            text: String::new(),
            partial: Vec::new(),
        }
    }

    fn push(&mut self, bytes: &[u8]) -> Result<()> {
        self.partial.extend_from_slice(bytes);
        let buffered = std::mem::take(&mut self.partial);
        match std::str::from_utf8(&buffered) {
            Ok(decoded) => {
                self.text.push_str(decoded);
            }
            Err(err) => {
                if err.error_len().is_some() {
                    return Err(Error::encoding(
                        format!("invalid UTF-8 in response stream: {err}"),
                        Some(Box::new(err)),
                    ));
                }
                // The tail is a sequence cut off by the chunk boundary; keep
                // it for the next chunk.
                let valid = err.valid_up_to();
                let decoded = std::str::from_utf8(&buffered[..valid])?;
                self.text.push_str(decoded);
                self.partial = buffered[valid..].to_vec();
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<String> {
        if !self.partial.is_empty() {
            return Err(Error::encoding(
                "response stream ended inside a UTF-8 sequence",
                None,
            ));
        }
        Ok(self.text)
    }

    /// Text decoded so far, discarding any incomplete trailing sequence.
    fn finish_partial(self) -> String {
        self.text
    }
}
