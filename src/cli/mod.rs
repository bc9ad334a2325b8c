//! Command interpreter.
//!
//! The console task only knows the [`Interpreter`] trait. [`CommandRegistry`]
//! is the firmware's implementation: a static command table with a built-in
//! `help`, parameter-count checking and multi-chunk output.

pub mod builtin;
pub mod error;
pub mod output;
pub mod parser;
pub mod registry;

pub use error::CliError;
pub use output::OutputBuffer;
pub use parser::{parameter, parse_line, ParsedLine};
pub use registry::{CommandContext, CommandDefinition, CommandRegistry};

use core::fmt::Write;

/// Turns command lines into output, one chunk per call.
pub trait Interpreter {
    /// Produce the next chunk of output for `line` into `out`.
    ///
    /// Returns `true` if another call with the same line will produce more
    /// output. `out` is bounded; writes past its capacity are cut off.
    fn process(&mut self, line: &str, out: &mut dyn Write) -> bool;
}

impl<I: Interpreter + ?Sized> Interpreter for &mut I {
    fn process(&mut self, line: &str, out: &mut dyn Write) -> bool {
        (**self).process(line, out)
    }
}
