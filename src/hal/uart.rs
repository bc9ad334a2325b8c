//! UART driver seams.
//!
//! Both directions follow the same pattern: an *issue* call that may be
//! refused while the peripheral is busy, and a completion reported later.
//! For TX the completion arrives out of band (see `transmit::TxCompletion`);
//! for RX the driver blocks until the requested byte has landed.

use core::fmt;

/// Identity of a UART instance.
///
/// The completion handler compares the instance that finished against the
/// one the console owns, so a shared callback can serve several UARTs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeripheralId(pub u8);

/// The peripheral cannot accept a new request right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Busy;

impl fmt::Display for Busy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("peripheral busy")
    }
}

/// Asynchronous send primitive.
pub trait TxDriver {
    /// Start sending `data`.
    ///
    /// `Ok` means the transfer was issued, not that it finished. The
    /// peripheral reports completion through its interrupt. `data` must stay
    /// untouched until then; the transmit channel guarantees this by waiting
    /// for completion before returning to its caller.
    fn begin_send(&mut self, data: &[u8]) -> Result<(), Busy>;

    /// Instance this driver sends on.
    fn instance(&self) -> PeripheralId;
}

/// Single-byte receive primitive.
pub trait RxDriver {
    /// Request reception of one byte.
    fn begin_receive(&mut self) -> Result<(), Busy>;

    /// Block until the requested byte has arrived.
    fn wait_byte(&mut self) -> u8;
}

/// Receive exactly one byte, retrying the issue call until it is accepted.
pub fn receive_one_byte<R: RxDriver + ?Sized>(rx: &mut R) -> u8 {
    while rx.begin_receive().is_err() {
        core::hint::spin_loop();
    }
    rx.wait_byte()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FlakyRx {
        refusals: u32,
        attempts: u32,
        byte: u8,
    }

    impl RxDriver for FlakyRx {
        fn begin_receive(&mut self) -> Result<(), Busy> {
            self.attempts += 1;
            if self.attempts <= self.refusals {
                Err(Busy)
            } else {
                Ok(())
            }
        }

        fn wait_byte(&mut self) -> u8 {
            assert!(self.attempts > self.refusals, "waited before issue succeeded");
            self.byte
        }
    }

    #[test]
    fn test_receive_retries_until_issued() {
        let mut rx = FlakyRx { refusals: 3, attempts: 0, byte: b'h' };

        assert_eq!(receive_one_byte(&mut rx), b'h');
        assert_eq!(rx.attempts, 4);
    }

    #[test]
    fn test_receive_first_try() {
        let mut rx = FlakyRx { refusals: 0, attempts: 0, byte: b'\r' };

        assert_eq!(receive_one_byte(&mut rx), b'\r');
        assert_eq!(rx.attempts, 1);
    }
}
