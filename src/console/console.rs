//! Console task state machine

use core::fmt::Write;

use super::LineBuffer;
use crate::cli::{Interpreter, OutputBuffer};
use crate::config::{FIRMWARE_VERSION, INPUT_CAPACITY};
use crate::hal::{receive_one_byte, RxDriver};
use crate::logging::CONSOLE_LOG;
use crate::stats::ConsoleStats;
use crate::transmit::Transmit;
use crate::{console_debug, console_info};

/// ASCII backspace.
pub const BACKSPACE: u8 = 0x08;

/// DEL acts as a backspace.
pub const DEL: u8 = 0x7F;

/// Sent once when the task starts, before the firmware version.
pub const WELCOME: &str =
    "\r\nStarting LiPow.\r\nType Help to view a list of registered commands.\r\n";

/// Sent after the interpreter output of every line.
pub const END_OF_OUTPUT: &str = "\r\n[Press ENTER to execute the previous command again]\r\n>";

/// Separates the echoed input from the output.
pub const NEW_LINE: &str = "\r\n";

/// What happened to a completed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineOutcome {
    /// Interpreter calls made (and chunks sent) for the line.
    pub chunks: usize,
    /// The line was empty and the previous command ran again.
    pub repeated: bool,
}

/// Console state machine
///
/// Feeds bytes from the UART through the line editor and dispatches
/// complete lines to the interpreter. All output, echo included, goes
/// through `tx`.
pub struct Console<'a, T, I, const N: usize = INPUT_CAPACITY> {
    tx: T,
    interpreter: I,
    line: LineBuffer<N>,
    last: LineBuffer<N>,
    output: OutputBuffer,
    stats: &'a ConsoleStats,
}

impl<'a, T: Transmit, I: Interpreter> Console<'a, T, I> {
    /// Create new console with the default line capacity
    pub fn new(tx: T, interpreter: I, stats: &'a ConsoleStats) -> Self {
        Self::with_line_capacity(tx, interpreter, stats)
    }
}

impl<'a, T: Transmit, I: Interpreter, const N: usize> Console<'a, T, I, N> {
    /// Create new console holding lines of up to `N` characters
    pub fn with_line_capacity(tx: T, interpreter: I, stats: &'a ConsoleStats) -> Self {
        Self {
            tx,
            interpreter,
            line: LineBuffer::new(),
            last: LineBuffer::new(),
            output: OutputBuffer::new(),
            stats,
        }
    }

    /// Send the welcome banner and firmware version.
    pub fn start(&mut self) {
        self.output.clear();
        let _ = write!(
            self.output,
            "{}Firmware Version: {}\r\n\r\n>",
            WELCOME, FIRMWARE_VERSION
        );
        let _ = self.tx.transmit(self.output.as_bytes());
        console_info!(CONSOLE_LOG, "console: started, firmware {}", FIRMWARE_VERSION);
    }

    /// Process a single input byte
    ///
    /// Returns `Some` once a line terminator has dispatched a line.
    pub fn process_byte(&mut self, byte: u8) -> Option<LineOutcome> {
        // Echo first, whatever the byte is.
        let _ = self.tx.transmit(&[byte]);

        match byte {
            b'\r' | b'\n' => Some(self.complete_line()),

            BACKSPACE | DEL => {
                self.line.backspace();
                None
            }

            b' '..=b'~' => {
                if !self.line.push(byte) {
                    self.stats.record_rx_overflow();
                }
                None
            }

            _ => None,
        }
    }

    /// Serve the operator forever.
    pub fn run<R: RxDriver + ?Sized>(&mut self, rx: &mut R) -> ! {
        self.start();
        loop {
            let byte = receive_one_byte(rx);
            self.process_byte(byte);
        }
    }

    fn complete_line(&mut self) -> LineOutcome {
        let _ = self.tx.transmit(NEW_LINE.as_bytes());

        let repeated = self.line.is_empty();
        if repeated {
            self.line.copy_from(&self.last);
        }

        // Drain loop: the interpreter may need several calls per line.
        let mut chunks = 0;
        loop {
            self.output.clear();
            let more = self.interpreter.process(self.line.as_str(), &mut self.output);
            let _ = self.tx.transmit(self.output.as_bytes());
            chunks += 1;
            if !more {
                break;
            }
        }

        self.stats.record_dispatch(repeated);
        console_debug!(
            CONSOLE_LOG,
            "console: '{}' -> {} chunk(s){}",
            self.line.as_str(),
            chunks,
            if repeated { " (repeat)" } else { "" }
        );

        self.last.copy_from(&self.line);
        self.line.clear();

        let _ = self.tx.transmit(END_OF_OUTPUT.as_bytes());

        LineOutcome { chunks, repeated }
    }

    /// Characters typed so far on the current line.
    pub fn pending_line(&self) -> &str {
        self.line.as_str()
    }

    /// The most recently dispatched line.
    pub fn last_command(&self) -> &str {
        self.last.as_str()
    }

    /// The transmitter, e.g. to inspect it in tests.
    pub fn transmitter(&self) -> &T {
        &self.tx
    }

    pub fn interpreter(&self) -> &I {
        &self.interpreter
    }
}
