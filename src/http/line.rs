//! CRLF line reading over a byte channel.
//!
//! # Responsibilities
//! - Read one byte at a time until `\r\n` is seen
//! - Grow the line buffer by doubling when a line outgrows it
//! - Keep the buffer between reads so a connection reuses its allocation
//!
//! # Design Decisions
//! - Byte-at-a-time reads never consume past the terminator
//! - End of stream is not an error: the partial line is returned
//! - Each connection owns its reader; nothing is shared across connections

use tokio::io::{AsyncRead, AsyncReadExt};

/// Initial line buffer capacity in bytes.
pub const DEFAULT_LINE_LEN: usize = 255;

/// Growable line storage with a logical length separate from its capacity.
#[derive(Debug)]
struct LineBuffer {
    bytes: Vec<u8>,
    len: usize,
}

impl LineBuffer {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: vec![0; capacity.max(1)],
            len: 0,
        }
    }

    fn reset(&mut self) {
        self.len = 0;
    }

    fn push(&mut self, byte: u8) {
        if self.len >= self.bytes.len() {
            let doubled = self.bytes.len() * 2;
            self.bytes.resize(doubled, 0);
        }
        self.bytes[self.len] = byte;
        self.len += 1;
    }

    fn last(&self) -> Option<u8> {
        self.len.checked_sub(1).map(|i| self.bytes[i])
    }

    fn pop(&mut self) {
        self.len = self.len.saturating_sub(1);
    }

    fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    fn capacity(&self) -> usize {
        self.bytes.len()
    }
}

/// Reads CRLF-terminated lines from a channel.
#[derive(Debug)]
pub struct LineReader {
    buffer: LineBuffer,
}

impl LineReader {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_LINE_LEN)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: LineBuffer::with_capacity(capacity),
        }
    }

    /// Current buffer capacity. Never shrinks.
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Read one line, returning it without the trailing `\r\n`.
    ///
    /// An empty string is the blank line that ends a header block. If the
    /// channel reaches end of stream first, whatever was accumulated is
    /// returned (possibly empty). Read failures surface as `Err`.
    pub async fn read_line<R>(&mut self, channel: &mut R) -> std::io::Result<String>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        self.buffer.reset();
        let mut byte = [0u8; 1];

        loop {
            let n = channel.read(&mut byte).await?;
            if n == 0 {
                tracing::trace!(partial_len = self.buffer.len, "End of stream before CRLF");
                break;
            }

            if byte[0] == b'\n' && self.buffer.last() == Some(b'\r') {
                self.buffer.pop();
                break;
            }

            self.buffer.push(byte[0]);
        }

        Ok(String::from_utf8_lossy(self.buffer.as_slice()).into_owned())
    }
}

impl Default for LineReader {
    fn default() -> Self {
        Self::new()
    }
}
