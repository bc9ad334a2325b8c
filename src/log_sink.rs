//! Diagnostic log output.
//!
//! Drains [`CONSOLE_LOG`](crate::logging::CONSOLE_LOG) to somewhere a
//! developer can read it without disturbing the operator session: a TX-only
//! UART on the chip, stderr in the host simulator.
//!
//! # Hardware Setup
//!
//! ```text
//! ESP32-S3 GPIO6 (UART1 TX) ──────▶ USB-UART RX
//!                                    └─▶ PC Serial Monitor
//! ```

use crate::logging::{LogEntry, LogStream, SliceWriter};

/// Largest formatted line.
pub const LINE_BUF_SIZE: usize = 128;

/// Format an entry as `[ticks] LEVEL: message\n`.
///
/// Returns the number of bytes written into `buf`.
pub fn format_log_entry(entry: &LogEntry, buf: &mut [u8]) -> usize {
    use core::fmt::Write;

    let mut writer = SliceWriter::new(buf);
    let _ = writeln!(
        writer,
        "[{:10}] {}: {}",
        entry.ticks,
        entry.level.as_str(),
        entry.message()
    );
    writer.len()
}

/// Write every pending entry, then a drop report if entries were lost.
///
/// Returns the number of entries written.
pub fn drain_into<const N: usize, F: FnMut(&[u8])>(stream: &LogStream<N>, mut write: F) -> usize {
    let mut line = [0u8; LINE_BUF_SIZE];
    let mut written = 0;

    while let Some(entry) = stream.drain() {
        let len = format_log_entry(&entry, &mut line);
        write(&line[..len]);
        written += 1;
    }

    let dropped = stream.dropped();
    if dropped > 0 {
        let len = crate::logging::format_to_buffer(
            &mut line,
            format_args!("[WARN] log entries dropped: {}\n", dropped),
        );
        write(&line[..len]);
        stream.reset_dropped();
    }

    written
}

#[cfg(target_os = "espidf")]
pub use esp::{init_log_uart, log_drain_task};

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_svc::hal::gpio;
    use esp_idf_svc::hal::peripheral::Peripheral;
    use esp_idf_svc::hal::uart::{self, UartTxDriver};

    use crate::config::{delay_ticks, LogUartConfig, LOG_DRAIN_IDLE_MS};
    use crate::logging::CONSOLE_LOG;

    /// Initialize UART1 TX-only for log output on `config.tx_pin`.
    ///
    /// # Safety
    ///
    /// `config.tx_pin` must be a valid output GPIO that nothing else drives.
    pub unsafe fn init_log_uart<'d>(
        uart: impl Peripheral<P = uart::UART1> + 'd,
        config: &LogUartConfig,
    ) -> Result<UartTxDriver<'d>, esp_idf_svc::sys::EspError> {
        let uart_config =
            uart::config::Config::default().baudrate(esp_idf_svc::hal::units::Hertz(config.baud_rate));
        // SAFETY: guaranteed by the caller.
        let tx_pin = unsafe { gpio::AnyOutputPin::new(config.tx_pin) };

        UartTxDriver::new(
            uart,
            tx_pin,
            Option::<gpio::AnyIOPin>::None, // CTS
            Option::<gpio::AnyIOPin>::None, // RTS
            &uart_config,
        )
    }

    /// Log drain loop (lowest priority task).
    pub fn log_drain_task(uart: &mut UartTxDriver<'_>) -> ! {
        loop {
            let written = super::drain_into(&CONSOLE_LOG, |bytes| {
                let _ = uart.write(bytes);
            });

            if written == 0 {
                // SAFETY: plain FreeRTOS delay from task context.
                unsafe {
                    esp_idf_svc::sys::vTaskDelay(delay_ticks(LOG_DRAIN_IDLE_MS));
                }
            }
        }
    }
}
