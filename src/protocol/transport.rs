//! Transport abstraction: any byte-oriented channel.
//!
//! Concrete implementations:
//! - UART host link (USB-serial bridge on the dev board)
//! - UART half-duplex servo bus
//!
//! The command decoder and the servo bus driver are both generic over
//! `Transport`, so either can run against an in-memory mock in tests.

/// Byte-oriented transport channel.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes into `buf`, waiting at most
    /// `timeout_ms` for the first byte.  `timeout_ms == 0` never blocks.
    /// Returns the number of bytes actually read (0 if none arrived).
    fn read(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize, Self::Error>;

    /// Write `data` to the transport.
    /// Returns the number of bytes actually written.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Discard anything sitting in the receive buffer.
    fn clear_input(&mut self) -> Result<(), Self::Error>;
}

/// A null transport that discards all writes and never reads.
/// Stands in for the servo bus on trigger-only builds.
pub struct NullTransport;

impl Transport for NullTransport {
    type Error = ();

    fn read(&mut self, _buf: &mut [u8], _timeout_ms: u32) -> Result<usize, ()> {
        Ok(0)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        Ok(data.len())
    }

    fn clear_input(&mut self) -> Result<(), ()> {
        Ok(())
    }
}

/// Read exactly one byte without blocking.
///
/// Transport errors are logged and treated as "nothing available": the
/// poll loop must keep running whatever the link does.
pub fn read_byte<T: Transport>(transport: &mut T) -> Option<u8> {
    let mut b = [0u8; 1];
    match transport.read(&mut b, 0) {
        Ok(1) => Some(b[0]),
        Ok(_) => None,
        Err(e) => {
            log::warn!("transport read failed: {:?}", e);
            None
        }
    }
}
