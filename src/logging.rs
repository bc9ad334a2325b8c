//! Non-blocking diagnostic logging for the console.
//!
//! ```text
//! Console task / TX path      LogStream           Log drain
//! ──────────────────────      ─────────           ─────────
//!
//! console_warn!() ──────────▶ [L0][L1][L2] ──────▶ log UART / stderr
//! never blocks                lock-free            blocking ok
//! ```
//!
//! The console UART carries the operator session, so diagnostics never go
//! there. Producers push into a ring; a separate drain (see `log_sink`)
//! writes entries to a dedicated TX-only UART. A full ring drops the entry
//! and bumps a counter instead of stalling the producer.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Maximum message length.
pub const MAX_MSG_LEN: usize = 96;

/// Ring size (number of entries).
pub const LOG_BUFFER_SIZE: usize = 64;

/// Process-wide console log ring.
pub static CONSOLE_LOG: LogStream = LogStream::new();

/// Log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    /// Convert to string for output.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// A single log entry.
#[derive(Clone, Copy)]
pub struct LogEntry {
    /// Scheduler tick at push time.
    pub ticks: u32,
    pub level: LogLevel,
    /// Message length.
    pub len: u8,
    /// Message bytes (not null-terminated).
    pub msg: [u8; MAX_MSG_LEN],
}

impl LogEntry {
    const EMPTY: Self = Self {
        ticks: 0,
        level: LogLevel::Info,
        len: 0,
        msg: [0; MAX_MSG_LEN],
    };

    /// Message text.
    pub fn message(&self) -> &str {
        core::str::from_utf8(&self.msg[..self.len as usize]).unwrap_or("<invalid utf8>")
    }
}

impl Default for LogEntry {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Lock-free log ring (multiple producers, single drainer).
pub struct LogStream<const N: usize = LOG_BUFFER_SIZE> {
    entries: UnsafeCell<[LogEntry; N]>,
    /// Set by the producer once its slot is fully written.
    ready: [AtomicBool; N],
    write_idx: AtomicU32,
    read_idx: AtomicU32,
    dropped: AtomicU32,
}

// SAFETY: producers each claim a unique slot by compare-exchange on write_idx
// and publish it through `ready`; the single drainer only reads published slots.
unsafe impl<const N: usize> Sync for LogStream<N> {}
unsafe impl<const N: usize> Send for LogStream<N> {}

impl<const N: usize> LogStream<N> {
    const MASK: usize = N - 1;

    /// Create an empty ring.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "Log buffer size must be power of 2");
        const NOT_READY: AtomicBool = AtomicBool::new(false);

        Self {
            entries: UnsafeCell::new([LogEntry::EMPTY; N]),
            ready: [NOT_READY; N],
            write_idx: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Push an entry. Never blocks.
    ///
    /// Returns `false` if the ring was full and the entry was dropped.
    pub fn push(&self, ticks: u32, level: LogLevel, msg: &[u8]) -> bool {
        let read = self.read_idx.load(Ordering::Acquire);
        let mut write = self.write_idx.load(Ordering::Relaxed);

        // Claim a slot only if there is room, so a full ring never advances
        // write_idx past unread entries.
        loop {
            if write.wrapping_sub(read) >= N as u32 {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                return false;
            }
            match self.write_idx.compare_exchange_weak(
                write,
                write.wrapping_add(1),
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(current) => write = current,
            }
        }

        let idx = (write as usize) & Self::MASK;
        let len = msg.len().min(MAX_MSG_LEN);

        // SAFETY: the slot at `idx` was claimed exclusively above.
        unsafe {
            let entry = &mut (*self.entries.get())[idx];
            entry.ticks = ticks;
            entry.level = level;
            entry.len = len as u8;
            entry.msg[..len].copy_from_slice(&msg[..len]);
        }
        self.ready[idx].store(true, Ordering::Release);

        true
    }

    /// Take the oldest entry, if any.
    pub fn drain(&self) -> Option<LogEntry> {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);

        if read == write {
            return None;
        }

        let idx = (read as usize) & Self::MASK;

        // Claimed but still being written.
        if !self.ready[idx].load(Ordering::Acquire) {
            return None;
        }

        // SAFETY: single drainer; the producer published the slot via `ready`.
        let entry = unsafe { (*self.entries.get())[idx] };
        self.ready[idx].store(false, Ordering::Relaxed);

        self.read_idx.store(read.wrapping_add(1), Ordering::Release);
        Some(entry)
    }

    /// Entries dropped because the ring was full.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Reset the dropped counter (after reporting it).
    #[inline]
    pub fn reset_dropped(&self) {
        self.dropped.store(0, Ordering::Relaxed);
    }

    /// Entries waiting to be drained.
    #[inline]
    pub fn pending(&self) -> u32 {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);
        write.wrapping_sub(read)
    }
}

impl<const N: usize> Default for LogStream<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Bounded `fmt::Write` adapter over a byte slice. Excess output is cut off.
pub struct SliceWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> SliceWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos == 0
    }
}

impl core::fmt::Write for SliceWriter<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let bytes = s.as_bytes();
        let to_write = bytes.len().min(self.buf.len() - self.pos);
        self.buf[self.pos..self.pos + to_write].copy_from_slice(&bytes[..to_write]);
        self.pos += to_write;
        Ok(())
    }
}

/// Format a message into a buffer, returning the number of bytes written.
#[inline]
pub fn format_to_buffer(buf: &mut [u8], args: core::fmt::Arguments<'_>) -> usize {
    let mut writer = SliceWriter::new(buf);
    let _ = core::fmt::write(&mut writer, args);
    writer.len()
}

/// Current scheduler tick, used to stamp entries.
#[cfg(target_os = "espidf")]
#[inline]
pub fn now_ticks() -> u32 {
    // SAFETY: xTaskGetTickCount may be called from any task.
    unsafe { esp_idf_svc::sys::xTaskGetTickCount() }
}

/// Host builds have no scheduler; entries are stamped 0.
#[cfg(not(target_os = "espidf"))]
#[inline]
pub fn now_ticks() -> u32 {
    0
}

/// Log macro. Formats on the stack and pushes without blocking.
///
/// ```ignore
/// console_log!(LogLevel::Warn, CONSOLE_LOG, "tx dropped ({} bytes)", len);
/// ```
#[macro_export]
macro_rules! console_log {
    ($level:expr, $stream:expr, $($arg:tt)*) => {{
        let mut buf = [0u8; $crate::logging::MAX_MSG_LEN];
        let len = $crate::logging::format_to_buffer(&mut buf, format_args!($($arg)*));
        $stream.push($crate::logging::now_ticks(), $level, &buf[..len]);
    }};
}

#[macro_export]
macro_rules! console_error {
    ($stream:expr, $($arg:tt)*) => {
        $crate::console_log!($crate::logging::LogLevel::Error, $stream, $($arg)*)
    };
}

#[macro_export]
macro_rules! console_warn {
    ($stream:expr, $($arg:tt)*) => {
        $crate::console_log!($crate::logging::LogLevel::Warn, $stream, $($arg)*)
    };
}

#[macro_export]
macro_rules! console_info {
    ($stream:expr, $($arg:tt)*) => {
        $crate::console_log!($crate::logging::LogLevel::Info, $stream, $($arg)*)
    };
}

#[macro_export]
macro_rules! console_debug {
    ($stream:expr, $($arg:tt)*) => {
        $crate::console_log!($crate::logging::LogLevel::Debug, $stream, $($arg)*)
    };
}
