//! Serial console task
//!
//! A single session without heap. Its buffers are fixed arrays owned by
//! [`Console`].

#[allow(clippy::module_inception)]
pub mod console;
pub mod line_buffer;

pub use console::{Console, LineOutcome, BACKSPACE, DEL, END_OF_OUTPUT, NEW_LINE, WELCOME};
pub use line_buffer::LineBuffer;
