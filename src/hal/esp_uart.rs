//! Console UART on ESP-IDF.
//!
//! The UART driver itself is installed by `esp_idf_svc::hal::uart::UartDriver`
//! and must outlive everything here; these types only talk to the installed
//! port.
//!
//! ESP-IDF hides the raw TX-done interrupt inside its driver, so a small
//! high-priority task stands in for it: `begin_send` queues the bytes and
//! notifies the task, the task blocks in `uart_wait_tx_done` and then calls
//! [`TxCompletion::notify`], exactly once per submitted transfer.

use core::ffi::c_void;

use esp_idf_svc::sys::{self, uart_port_t, TaskHandle_t};

use super::{Busy, PeripheralId, RxDriver, TxDriver};
use crate::transmit::TxCompletion;

/// `portMAX_DELAY`
const MAX_DELAY: u32 = u32::MAX;

/// Priority of the completion task, above the console task.
const TX_DONE_PRIORITY: u32 = 10;

const TX_DONE_STACK: u32 = 2048;

struct TxDoneParams {
    port: uart_port_t,
    completion: &'static TxCompletion,
}

/// Transmit half of the console UART.
pub struct EspUartTx {
    port: uart_port_t,
    done_task: TaskHandle_t,
}

// SAFETY: the task handle is only used to send notifications, which FreeRTOS
// allows from any task.
unsafe impl Send for EspUartTx {}

impl EspUartTx {
    /// Start the completion task for `port` and return the TX half.
    ///
    /// Returns `None` if FreeRTOS could not create the task.
    pub fn new(port: uart_port_t, completion: &'static TxCompletion) -> Option<Self> {
        // Lives as long as the completion task, i.e. forever.
        static mut PARAMS: Option<TxDoneParams> = None;

        let mut handle: TaskHandle_t = core::ptr::null_mut();

        // SAFETY: called once during start-up, before the completion task
        // exists, so nothing else reads PARAMS yet.
        let created = unsafe {
            PARAMS = Some(TxDoneParams { port, completion });
            let params = core::ptr::addr_of_mut!(PARAMS) as *mut c_void;
            sys::xTaskCreatePinnedToCore(
                Some(tx_done_task),
                b"uart_tx_done\0".as_ptr() as *const _,
                TX_DONE_STACK,
                params,
                TX_DONE_PRIORITY,
                &mut handle,
                1,
            )
        };

        if created == 1 && !handle.is_null() {
            Some(Self { port, done_task: handle })
        } else {
            None
        }
    }
}

impl TxDriver for EspUartTx {
    fn begin_send(&mut self, data: &[u8]) -> Result<(), Busy> {
        // SAFETY: data is valid for the call; the driver copies it into its
        // ring buffer before returning.
        let written = unsafe {
            sys::uart_write_bytes(self.port, data.as_ptr() as *const c_void, data.len())
        };
        if written < 0 {
            return Err(Busy);
        }

        // SAFETY: done_task is the live completion task.
        unsafe {
            sys::xTaskGenericNotify(
                self.done_task,
                0,
                0,
                sys::eNotifyAction_eIncrement,
                core::ptr::null_mut(),
            );
        }
        Ok(())
    }

    fn instance(&self) -> PeripheralId {
        PeripheralId(self.port as u8)
    }
}

/// Stand-in for the TX-complete interrupt.
unsafe extern "C" fn tx_done_task(params: *mut c_void) {
    // SAFETY: `params` points at the PARAMS static written before spawn.
    let Some(params) = (unsafe { &*(params as *const Option<TxDoneParams>) }) else {
        return;
    };

    loop {
        // One notification per issued transfer.
        sys::ulTaskGenericNotifyTake(0, 1, MAX_DELAY);
        sys::uart_wait_tx_done(params.port, MAX_DELAY);
        params.completion.notify(PeripheralId(params.port as u8));
    }
}

/// Receive half of the console UART.
pub struct EspUartRx {
    port: uart_port_t,
}

impl EspUartRx {
    pub fn new(port: uart_port_t) -> Self {
        Self { port }
    }
}

impl RxDriver for EspUartRx {
    fn begin_receive(&mut self) -> Result<(), Busy> {
        // SAFETY: read-only query on the port.
        if unsafe { sys::uart_is_driver_installed(self.port) } {
            Ok(())
        } else {
            Err(Busy)
        }
    }

    fn wait_byte(&mut self) -> u8 {
        let mut byte = 0u8;
        loop {
            // SAFETY: `byte` is a valid one-byte destination.
            let n = unsafe {
                sys::uart_read_bytes(self.port, &mut byte as *mut u8 as *mut c_void, 1, MAX_DELAY)
            };
            if n == 1 {
                return byte;
            }
        }
    }
}
