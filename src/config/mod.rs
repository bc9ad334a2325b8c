//! Module: config
//!
//! Purpose: Compile-time configuration for the LiPow console.
//!
//! The console has no persisted state, so every knob is a constant baked
//! into the image. The console sits on UART0 at 115200 baud; time limits are
//! given in milliseconds and converted with the scheduler tick rate.

/// Capacity of the input line and of the last-command buffer.
pub const INPUT_CAPACITY: usize = 50;

/// Maximum size of one interpreter output chunk.
pub const MAX_OUTPUT_SIZE: usize = 512;

/// Longest wait for exclusive use of the transmit channel.
pub const MUTEX_WAIT_MS: u32 = 300;

/// FreeRTOS scheduler tick rate (`configTICK_RATE_HZ`), from sdkconfig.
#[cfg(target_os = "espidf")]
pub const TICK_RATE_HZ: u32 = esp_idf_svc::sys::CONFIG_FREERTOS_HZ as u32;

/// Host tick: 1 ms, matching the simulator's clock.
#[cfg(not(target_os = "espidf"))]
pub const TICK_RATE_HZ: u32 = 1000;

/// Idle poll period of the log drain task.
pub const LOG_DRAIN_IDLE_MS: u32 = 10;

/// Firmware version reported in the banner, `<major>.<minor>`.
pub const FIRMWARE_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION_MAJOR"),
    ".",
    env!("CARGO_PKG_VERSION_MINOR")
);

/// Full build identifier (set by build.rs, includes git hash).
pub const VERSION_STRING: &str = env!("VERSION_STRING");

/// Convert milliseconds to scheduler ticks (`pdMS_TO_TICKS`).
///
/// Rounds down, like the FreeRTOS macro.
pub const fn ms_to_ticks(ms: u32, tick_rate_hz: u32) -> u32 {
    ((ms as u64 * tick_rate_hz as u64) / 1000) as u32
}

/// Ticks for a task delay of `ms` at the scheduler rate, at least one.
pub const fn delay_ticks(ms: u32) -> u32 {
    let ticks = ms_to_ticks(ms, TICK_RATE_HZ);
    if ticks == 0 {
        1
    } else {
        ticks
    }
}

/// Console task configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// UART port number of the console.
    pub uart_port: u8,
    /// Console baud rate.
    pub baud_rate: u32,
    /// GPIO of the console TX line.
    pub tx_pin: i32,
    /// GPIO of the console RX line.
    pub rx_pin: i32,
    /// Bounded wait for the transmit channel, in ticks.
    pub mutex_wait_ticks: u32,
}

impl ConsoleConfig {
    /// Default console configuration.
    pub const fn new() -> Self {
        Self {
            uart_port: 0,
            baud_rate: 115_200,
            tx_pin: 43,
            rx_pin: 44,
            mutex_wait_ticks: ms_to_ticks(MUTEX_WAIT_MS, TICK_RATE_HZ),
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Diagnostic log UART configuration (TX only).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogUartConfig {
    pub baud_rate: u32,
    pub tx_pin: i32,
}

impl LogUartConfig {
    pub const fn new() -> Self {
        Self {
            baud_rate: 115_200,
            tx_pin: 6, // GPIO6, UART1 TX (free on Quad flash boards)
        }
    }
}

impl Default for LogUartConfig {
    fn default() -> Self {
        Self::new()
    }
}
