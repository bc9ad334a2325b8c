//! LiPow console - entry point
//!
//! On the chip: installs the console UART, the log UART and the TX
//! completion task, then runs the console task forever.
//!
//! On the host: the same console task over stdin/stdout, with a thread
//! playing the TX-complete interrupt. Handy for trying commands without
//! hardware.

#![cfg_attr(target_os = "espidf", no_std)]
#![cfg_attr(target_os = "espidf", no_main)]

#[cfg(target_os = "espidf")]
mod firmware {
    use core::ffi::c_void;

    use esp_idf_svc::hal::gpio::AnyIOPin;
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::hal::uart::{config::Config, UartDriver, UartTxDriver};
    use esp_idf_svc::hal::units::Hertz;
    use esp_idf_svc::sys as esp_idf_sys;

    use lipow_console::cli::builtin::COMMANDS;
    use lipow_console::config::{delay_ticks, ConsoleConfig, LogUartConfig};
    use lipow_console::hal::esp_uart::{EspUartRx, EspUartTx};
    use lipow_console::hal::PeripheralId;
    use lipow_console::lock::FreeRtosMutex;
    use lipow_console::log_sink::{init_log_uart, log_drain_task};
    use lipow_console::logging::CONSOLE_LOG;
    use lipow_console::{console_error, CommandRegistry, Console, TxChannel, TxCompletion, CONSOLE_STATS};

    const CONFIG: ConsoleConfig = ConsoleConfig::new();
    const LOG_CONFIG: LogUartConfig = LogUartConfig::new();

    /// Set by the TX completion task, polled by the transmit channel.
    static TX_DONE: TxCompletion = TxCompletion::new(PeripheralId(CONFIG.uart_port));

    #[no_mangle]
    fn main() {
        // Initialize ESP-IDF
        esp_idf_sys::link_patches();

        if let Err(e) = run() {
            console_error!(CONSOLE_LOG, "console: start-up failed: {}", e);
        }

        // Only reached if start-up failed.
        loop {
            unsafe {
                esp_idf_sys::vTaskDelay(delay_ticks(1000));
            }
        }
    }

    fn run() -> Result<(), esp_idf_sys::EspError> {
        let peripherals = Peripherals::take()?;

        // SAFETY: the configured GPIOs are reserved for the two UARTs and
        // taken nowhere else.
        let (tx_pin, rx_pin) = unsafe { (AnyIOPin::new(CONFIG.tx_pin), AnyIOPin::new(CONFIG.rx_pin)) };

        let uart_config = Config::default().baudrate(Hertz(CONFIG.baud_rate));
        let uart = UartDriver::new(
            peripherals.uart0,
            tx_pin,
            rx_pin,
            Option::<AnyIOPin>::None,
            Option::<AnyIOPin>::None,
            &uart_config,
        )?;
        let port = uart.port();
        if port != CONFIG.uart_port as esp_idf_sys::uart_port_t {
            console_error!(CONSOLE_LOG, "console: configured UART{} but driver is UART{}", CONFIG.uart_port, port);
            return Ok(());
        }

        // SAFETY: as above.
        let mut log_uart = unsafe { init_log_uart(peripherals.uart1, &LOG_CONFIG)? };
        spawn_log_drain(&mut log_uart);

        let Some(tx) = EspUartTx::new(port, &TX_DONE) else {
            console_error!(CONSOLE_LOG, "console: cannot create TX completion task");
            return Ok(());
        };
        let Some(mutex) = FreeRtosMutex::new() else {
            console_error!(CONSOLE_LOG, "console: cannot create TX mutex");
            return Ok(());
        };

        let channel = TxChannel::new(tx, mutex, &TX_DONE, &CONSOLE_STATS, CONFIG.mutex_wait_ticks);
        let mut console = Console::new(&channel, CommandRegistry::new(COMMANDS), &CONSOLE_STATS);

        // Never returns, so `uart` and `log_uart` stay alive for the tasks
        // that use them.
        console.run(&mut EspUartRx::new(port))
    }

    /// Run the log drain at idle priority on core 1.
    fn spawn_log_drain(log_uart: &mut UartTxDriver<'_>) {
        unsafe extern "C" fn task(param: *mut c_void) {
            // SAFETY: points at `log_uart` in `run`, which never returns.
            let uart = unsafe { &mut *(param as *mut UartTxDriver<'static>) };
            log_drain_task(uart)
        }

        // SAFETY: the driver outlives the task (see `run`), and only the
        // drain task touches it after this call.
        unsafe {
            esp_idf_sys::xTaskCreatePinnedToCore(
                Some(task),
                b"log_drain\0".as_ptr() as *const _,
                3072,
                log_uart as *mut UartTxDriver<'_> as *mut c_void,
                1,
                core::ptr::null_mut(),
                1,
            );
        }
    }
}

#[cfg(not(target_os = "espidf"))]
mod host {
    use std::io::{self, Read, Write};
    use std::sync::mpsc::{self, Sender};
    use std::thread;
    use std::time::{Duration, Instant};

    use lipow_console::cli::builtin::COMMANDS;
    use lipow_console::config::ConsoleConfig;
    use lipow_console::hal::{Busy, PeripheralId, RxDriver, TxDriver};
    use lipow_console::lock::{AtomicLock, TickClock};
    use lipow_console::log_sink::drain_into;
    use lipow_console::logging::CONSOLE_LOG;
    use lipow_console::{CommandRegistry, Console, TxChannel, TxCompletion, CONSOLE_STATS};

    const CONFIG: ConsoleConfig = ConsoleConfig::new();

    static TX_DONE: TxCompletion = TxCompletion::new(PeripheralId(CONFIG.uart_port));

    /// 1 tick = 1 ms (`TICK_RATE_HZ` on the host).
    struct MsClock(Instant);

    impl TickClock for MsClock {
        fn ticks(&self) -> u32 {
            self.0.elapsed().as_millis() as u32
        }
    }

    /// stdout as the UART; completion is raised from another thread.
    struct StdoutTx {
        irq: Sender<PeripheralId>,
    }

    impl TxDriver for StdoutTx {
        fn begin_send(&mut self, data: &[u8]) -> Result<(), Busy> {
            let mut out = io::stdout().lock();
            out.write_all(data).map_err(|_| Busy)?;
            out.flush().map_err(|_| Busy)?;
            self.irq.send(self.instance()).map_err(|_| Busy)
        }

        fn instance(&self) -> PeripheralId {
            PeripheralId(CONFIG.uart_port)
        }
    }

    struct StdinRx;

    impl RxDriver for StdinRx {
        fn begin_receive(&mut self) -> Result<(), Busy> {
            Ok(())
        }

        fn wait_byte(&mut self) -> u8 {
            let mut byte = [0u8; 1];
            match io::stdin().read_exact(&mut byte) {
                Ok(()) => byte[0],
                // End of input ends the session.
                Err(_) => std::process::exit(0),
            }
        }
    }

    pub fn run() -> ! {
        let (irq_tx, irq_rx) = mpsc::channel::<PeripheralId>();

        // TX-complete "interrupt"
        thread::spawn(move || {
            for instance in irq_rx {
                TX_DONE.notify(instance);
            }
        });

        // Diagnostics to stderr
        thread::spawn(|| loop {
            drain_into(&CONSOLE_LOG, |bytes| {
                let _ = io::stderr().write_all(bytes);
            });
            thread::sleep(Duration::from_millis(50));
        });

        let channel = TxChannel::new(
            StdoutTx { irq: irq_tx },
            AtomicLock::new(MsClock(Instant::now())),
            &TX_DONE,
            &CONSOLE_STATS,
            CONFIG.mutex_wait_ticks,
        );
        let mut console = Console::new(&channel, CommandRegistry::new(COMMANDS), &CONSOLE_STATS);
        console.run(&mut StdinRx)
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    host::run()
}
