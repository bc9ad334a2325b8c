//! Synchronized transmit channel.
//!
//! One UART, one producer task, one completion interrupt.
//!
//! ```text
//! submitter                        completion ISR
//! ─────────                        ──────────────
//! try_lock_for(wait) ── timeout ──▶ drop, Err(Contention)
//! arm()            ready = false
//! begin_send()     retried while Busy
//! spin ◀────────────────────────── notify(instance): ready = true
//! unlock()
//! ```
//!
//! # Invariants
//!
//! - At most one transfer is in flight: the lock is held from `arm()` until
//!   the ready flag has been observed.
//! - `ready` goes false→true exactly once per submission, and only the
//!   matching instance may set it.
//! - The completion wait is unbounded. A peripheral that never completes
//!   hangs the submitter; there is no watchdog at this layer.

use core::cell::UnsafeCell;
use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};

use crate::console_warn;
use crate::hal::{PeripheralId, TxDriver};
use crate::lock::ChannelLock;
use crate::logging::CONSOLE_LOG;
use crate::stats::ConsoleStats;

/// Why a transmission did not happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxError {
    /// The channel lock was not obtained within the bounded wait.
    /// The data was dropped.
    Contention,
}

impl fmt::Display for TxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxError::Contention => f.write_str("transmit channel busy, output dropped"),
        }
    }
}

/// Anything the console can send bytes through.
pub trait Transmit {
    /// Send all of `data`, returning once it is on the wire.
    fn transmit(&self, data: &[u8]) -> Result<(), TxError>;
}

impl<T: Transmit + ?Sized> Transmit for &T {
    fn transmit(&self, data: &[u8]) -> Result<(), TxError> {
        (**self).transmit(data)
    }
}

/// Completion flag shared with the TX-complete interrupt.
///
/// The interrupt holds a plain `&'static TxCompletion` and never owns
/// anything else of the channel.
pub struct TxCompletion {
    ready: AtomicBool,
    instance: PeripheralId,
}

impl TxCompletion {
    /// Flag for transfers on `instance`. Starts ready (nothing in flight).
    pub const fn new(instance: PeripheralId) -> Self {
        Self {
            ready: AtomicBool::new(true),
            instance,
        }
    }

    /// Called from the TX-complete interrupt.
    ///
    /// Sets the flag only if `completed` is the instance this flag tracks.
    /// Never blocks. Returns whether the flag was set.
    #[inline]
    pub fn notify(&self, completed: PeripheralId) -> bool {
        if completed != self.instance {
            return false;
        }
        self.ready.store(true, Ordering::Release);
        true
    }

    /// Clear the flag before issuing a transfer.
    #[inline]
    pub fn arm(&self) {
        self.ready.store(false, Ordering::Release);
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Instance this flag tracks.
    pub fn instance(&self) -> PeripheralId {
        self.instance
    }

    /// Spin until the interrupt has signalled completion.
    fn wait(&self) {
        while !self.is_ready() {
            core::hint::spin_loop();
        }
    }
}

/// The console's only way onto the wire.
///
/// # Example
///
/// ```ignore
/// static TX_DONE: TxCompletion = TxCompletion::new(PeripheralId(0));
/// static STATS: ConsoleStats = ConsoleStats::new();
///
/// let channel = TxChannel::new(uart_tx, FreeRtosMutex::new()?, &TX_DONE, &STATS, 300);
/// let _ = channel.transmit(b"\r\n>");
///
/// // TX-complete ISR:
/// TX_DONE.notify(PeripheralId(0));
/// ```
pub struct TxChannel<'a, D, L> {
    driver: UnsafeCell<D>,
    lock: L,
    completion: &'a TxCompletion,
    stats: &'a ConsoleStats,
    wait_ticks: u32,
}

// SAFETY: the driver is only touched while `lock` is held, so at most one
// context uses it at a time. The completion flag and stats are atomics.
unsafe impl<D: Send, L: Sync> Sync for TxChannel<'_, D, L> {}

impl<'a, D: TxDriver, L: ChannelLock> TxChannel<'a, D, L> {
    /// Build a channel over `driver`, guarded by `lock`.
    ///
    /// `wait_ticks` bounds how long a caller waits for the lock.
    pub fn new(
        driver: D,
        lock: L,
        completion: &'a TxCompletion,
        stats: &'a ConsoleStats,
        wait_ticks: u32,
    ) -> Self {
        Self {
            driver: UnsafeCell::new(driver),
            lock,
            completion,
            stats,
            wait_ticks,
        }
    }

    /// Run one full submit-wait-complete cycle. Caller holds the lock.
    fn send_locked(&self, data: &[u8]) {
        // SAFETY: the lock is held, nothing else can reach the driver.
        let driver = unsafe { &mut *self.driver.get() };

        self.completion.arm();
        while driver.begin_send(data).is_err() {
            self.stats.record_tx_busy();
            core::hint::spin_loop();
        }
        self.completion.wait();
        self.stats.record_tx_completed();
    }
}

impl<D: TxDriver, L: ChannelLock> Transmit for TxChannel<'_, D, L> {
    fn transmit(&self, data: &[u8]) -> Result<(), TxError> {
        // A zero-length request would never raise a completion.
        if data.is_empty() {
            return Ok(());
        }

        if !self.lock.try_lock_for(self.wait_ticks) {
            self.stats.record_tx_dropped();
            console_warn!(CONSOLE_LOG, "tx: channel busy, dropped {} bytes", data.len());
            return Err(TxError::Contention);
        }

        self.send_locked(data);
        self.lock.unlock();
        Ok(())
    }
}
