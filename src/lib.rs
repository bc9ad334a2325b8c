//! # LiPow console
//!
//! Line-oriented command console over the charger's debug UART.
//!
//! ## Architecture
//!
//! ```text
//! UART RX ──▶ Console task ──(echo, chunks)──▶ TxChannel ──▶ UART TX
//!                  │                              ▲
//!                  ▼                              │ notify()
//!             Interpreter                   TX-complete ISR
//! ```
//!
//! - [`console::Console`] owns all per-session state: input line, last
//!   command, output chunk.
//! - [`transmit::TxChannel`] serialises access to the UART with a
//!   bounded-wait lock and one in-flight transfer at a time.
//! - [`cli::CommandRegistry`] is the firmware's command interpreter.
//!
//! Failures (channel contention, input overflow) are absorbed where they
//! happen and only show up in [`stats`] and the diagnostic [`logging`] ring.

#![cfg_attr(not(test), no_std)]

pub mod cli;
pub mod config;
pub mod console;
pub mod hal;
pub mod lock;
pub mod log_sink;
pub mod logging;
pub mod stats;
pub mod transmit;

pub use cli::{CommandRegistry, Interpreter};
pub use console::Console;
pub use stats::{ConsoleStats, CONSOLE_STATS};
pub use transmit::{Transmit, TxChannel, TxCompletion, TxError};
