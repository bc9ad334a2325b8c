//! Console counters.
//!
//! Every failure the console absorbs silently (dropped transfers, dropped
//! characters) still leaves a trace here. All fields are atomics so the
//! completion handler, the console task and the `stats` command can touch
//! them without a lock.

use core::sync::atomic::{AtomicU32, Ordering};

/// Process-wide console counters.
pub static CONSOLE_STATS: ConsoleStats = ConsoleStats::new();

/// Lock-free console statistics.
///
/// # Usage
///
/// ```ignore
/// static STATS: ConsoleStats = ConsoleStats::new();
///
/// // In the transmit channel:
/// if !lock.try_lock_for(wait) {
///     STATS.record_tx_dropped();
///     return Err(TxError::Contention);
/// }
///
/// // In the `stats` command:
/// let snap = STATS.snapshot();
/// ```
pub struct ConsoleStats {
    /// Transfers that ran to completion.
    tx_completed: AtomicU32,

    /// Transfers dropped because the channel lock timed out.
    tx_dropped: AtomicU32,

    /// Issue attempts rejected by a busy peripheral (retried).
    tx_busy_retries: AtomicU32,

    /// Printable characters discarded because the input line was full.
    rx_overflow: AtomicU32,

    /// Lines handed to the interpreter.
    lines_dispatched: AtomicU32,

    /// Empty lines that re-ran the previous command.
    lines_repeated: AtomicU32,
}

impl ConsoleStats {
    /// Create zeroed counters.
    pub const fn new() -> Self {
        Self {
            tx_completed: AtomicU32::new(0),
            tx_dropped: AtomicU32::new(0),
            tx_busy_retries: AtomicU32::new(0),
            rx_overflow: AtomicU32::new(0),
            lines_dispatched: AtomicU32::new(0),
            lines_repeated: AtomicU32::new(0),
        }
    }

    #[inline]
    pub fn record_tx_completed(&self) {
        self.tx_completed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_tx_dropped(&self) {
        self.tx_dropped.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_tx_busy(&self) {
        self.tx_busy_retries.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_rx_overflow(&self) {
        self.rx_overflow.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a dispatched line; `repeated` marks a repeat-last-command.
    #[inline]
    pub fn record_dispatch(&self, repeated: bool) {
        self.lines_dispatched.fetch_add(1, Ordering::Relaxed);
        if repeated {
            self.lines_repeated.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get a snapshot of all counters.
    ///
    /// Fields are read one by one, so the snapshot is not atomic as a whole.
    #[inline]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            tx_completed: self.tx_completed.load(Ordering::Relaxed),
            tx_dropped: self.tx_dropped.load(Ordering::Relaxed),
            tx_busy_retries: self.tx_busy_retries.load(Ordering::Relaxed),
            rx_overflow: self.rx_overflow.load(Ordering::Relaxed),
            lines_dispatched: self.lines_dispatched.load(Ordering::Relaxed),
            lines_repeated: self.lines_repeated.load(Ordering::Relaxed),
        }
    }
}

impl Default for ConsoleStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Counters at a point in time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub tx_completed: u32,
    pub tx_dropped: u32,
    pub tx_busy_retries: u32,
    pub rx_overflow: u32,
    pub lines_dispatched: u32,
    pub lines_repeated: u32,
}

impl StatsSnapshot {
    /// Counter names and values, in display order.
    pub fn entries(&self) -> [(&'static str, u32); 6] {
        [
            ("tx completed", self.tx_completed),
            ("tx dropped", self.tx_dropped),
            ("tx busy retries", self.tx_busy_retries),
            ("rx overflow", self.rx_overflow),
            ("lines dispatched", self.lines_dispatched),
            ("lines repeated", self.lines_repeated),
        ]
    }
}
