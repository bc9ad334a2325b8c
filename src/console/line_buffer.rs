//! Line buffer for console input

use crate::config::INPUT_CAPACITY;

/// Fixed-capacity line of printable ASCII.
///
/// Bytes past `len` are always zero, so the storage stays a valid
/// terminated C string for anything that peeks at it.
#[derive(Clone)]
pub struct LineBuffer<const N: usize = INPUT_CAPACITY> {
    buf: [u8; N],
    len: usize,
}

impl<const N: usize> LineBuffer<N> {
    /// Create empty buffer
    pub const fn new() -> Self {
        Self {
            buf: [0u8; N],
            len: 0,
        }
    }

    /// Append a character. Returns `false` (and drops it) when full.
    pub fn push(&mut self, c: u8) -> bool {
        if self.len < N {
            self.buf[self.len] = c;
            self.len += 1;
            true
        } else {
            false
        }
    }

    /// Erase the last character. Returns `false` on an empty line.
    pub fn backspace(&mut self) -> bool {
        if self.len > 0 {
            self.len -= 1;
            self.buf[self.len] = 0;
            true
        } else {
            false
        }
    }

    /// Clear buffer
    pub fn clear(&mut self) {
        self.buf = [0u8; N];
        self.len = 0;
    }

    /// Replace contents with a copy of `other`.
    pub fn copy_from(&mut self, other: &Self) {
        self.buf = other.buf;
        self.len = other.len;
    }

    /// Set buffer contents from string, truncated to capacity
    pub fn set(&mut self, s: &str) {
        self.clear();
        for &b in s.as_bytes().iter().take(N) {
            self.push(b);
        }
    }

    /// Get buffer as string slice
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.buf[..self.len]).unwrap_or("")
    }

    /// Get raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == N
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for LineBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
