//! Output scratch buffer shared by the interpreter and the transmit channel.

use core::fmt;

use crate::config::MAX_OUTPUT_SIZE;

/// Fixed-capacity text buffer for one output chunk.
///
/// The interpreter writes into it through `fmt::Write`; the console then
/// hands the bytes to the transmit channel. Output past capacity is
/// silently cut off, as a C `snprintf` into the same buffer would be.
pub struct OutputBuffer<const N: usize = MAX_OUTPUT_SIZE> {
    buf: [u8; N],
    len: usize,
}

impl<const N: usize> OutputBuffer<N> {
    /// Create empty buffer
    pub const fn new() -> Self {
        Self { buf: [0u8; N], len: 0 }
    }

    /// Clear buffer
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Bytes written since the last clear.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Contents as text; empty if truncation split a UTF-8 sequence.
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(self.as_bytes()).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for OutputBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Write for OutputBuffer<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let bytes = s.as_bytes();
        let to_copy = bytes.len().min(N - self.len);
        self.buf[self.len..self.len + to_copy].copy_from_slice(&bytes[..to_copy]);
        self.len += to_copy;
        Ok(())
    }
}
