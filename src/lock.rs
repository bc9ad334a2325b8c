//! Exclusive-access token for the transmit channel.
//!
//! The channel only needs two things from a lock: take it within a bounded
//! number of scheduler ticks, and give it back. On the chip this is a
//! FreeRTOS mutex (priority inheritance included); on the host an atomic
//! flag with a tick deadline does the same job.

use core::sync::atomic::{AtomicBool, Ordering};

/// Lock with a bounded acquisition wait.
pub trait ChannelLock {
    /// Try to take the lock, waiting at most `ticks` scheduler ticks.
    ///
    /// Returns `true` if the caller now owns the lock.
    fn try_lock_for(&self, ticks: u32) -> bool;

    /// Release a lock taken with `try_lock_for`.
    fn unlock(&self);
}

/// Source of scheduler ticks.
pub trait TickClock {
    /// Monotonic tick count. Wrapping is allowed.
    fn ticks(&self) -> u32;
}

/// Portable lock: a compare-exchange flag, polled until a tick deadline.
pub struct AtomicLock<C> {
    locked: AtomicBool,
    clock: C,
}

impl<C: TickClock> AtomicLock<C> {
    pub const fn new(clock: C) -> Self {
        Self {
            locked: AtomicBool::new(false),
            clock,
        }
    }

    fn try_acquire(&self) -> bool {
        self.locked
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    /// Whether some context currently holds the lock.
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Relaxed)
    }
}

impl<C: TickClock> ChannelLock for AtomicLock<C> {
    fn try_lock_for(&self, ticks: u32) -> bool {
        let start = self.clock.ticks();
        loop {
            if self.try_acquire() {
                return true;
            }
            if self.clock.ticks().wrapping_sub(start) >= ticks {
                // One last attempt so a zero-tick wait still gets a chance.
                return self.try_acquire();
            }
            core::hint::spin_loop();
        }
    }

    fn unlock(&self) {
        self.locked.store(false, Ordering::Release);
    }
}

/// FreeRTOS mutex (`xSemaphoreCreateMutex`).
#[cfg(target_os = "espidf")]
pub struct FreeRtosMutex {
    handle: esp_idf_svc::sys::QueueHandle_t,
}

// SAFETY: FreeRTOS semaphores are designed to be shared between tasks.
#[cfg(target_os = "espidf")]
unsafe impl Send for FreeRtosMutex {}
#[cfg(target_os = "espidf")]
unsafe impl Sync for FreeRtosMutex {}

#[cfg(target_os = "espidf")]
impl FreeRtosMutex {
    /// `queueQUEUE_TYPE_MUTEX`
    const QUEUE_TYPE_MUTEX: u8 = 1;
    /// `queueSEND_TO_BACK`
    const SEND_TO_BACK: esp_idf_svc::sys::BaseType_t = 0;

    /// Create the mutex. Returns `None` if the FreeRTOS heap is exhausted.
    pub fn new() -> Option<Self> {
        // SAFETY: plain FreeRTOS allocation call.
        let handle = unsafe { esp_idf_svc::sys::xQueueCreateMutex(Self::QUEUE_TYPE_MUTEX) };
        if handle.is_null() {
            None
        } else {
            Some(Self { handle })
        }
    }
}

#[cfg(target_os = "espidf")]
impl ChannelLock for FreeRtosMutex {
    fn try_lock_for(&self, ticks: u32) -> bool {
        // SAFETY: handle is a valid mutex created in `new`.
        unsafe { esp_idf_svc::sys::xQueueSemaphoreTake(self.handle, ticks) == 1 }
    }

    fn unlock(&self) {
        // xSemaphoreGive
        // SAFETY: handle is valid; mutexes carry no item, so a null item is expected.
        unsafe {
            esp_idf_svc::sys::xQueueGenericSend(
                self.handle,
                core::ptr::null(),
                0,
                Self::SEND_TO_BACK,
            );
        }
    }
}
