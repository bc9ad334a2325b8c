//! Hardware Abstraction Layer for the LiPow console.
//!
//! Thin seams around the UART peripheral.
//! Console logic stays in core modules, HAL is just I/O.

pub mod uart;

#[cfg(target_os = "espidf")]
pub mod esp_uart;

pub use uart::{receive_one_byte, Busy, PeripheralId, RxDriver, TxDriver};
