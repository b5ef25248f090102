//! Transport abstraction — any byte-oriented channel to the host.
//!
//! Concrete implementations:
//! - UART (see [`UartTransport`](crate::adapters::uart::UartTransport))
//! - in-memory simulation of the same UART on host builds
//!
//! The command channel and the sensor report are generic over `Transport`,
//! so swapping the link requires zero changes to protocol logic.

/// Byte-oriented transport channel.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Read up to `buf.len()` bytes into `buf`.
    /// Returns 0 if no data is available (non-blocking).
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write `data` to the transport.
    /// Returns the number of bytes actually accepted.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Check if data is available for reading.
    fn available(&self) -> bool;

    /// Free space in the outbound buffer, in bytes.
    fn write_capacity(&self) -> usize;
}

/// A null transport that discards all writes and never reads.
/// Used when the command UART could not be opened.
pub struct NullTransport;

impl Transport for NullTransport {
    type Error = ();

    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, ()> {
        Ok(0)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), ()> {
        Ok(())
    }

    fn available(&self) -> bool {
        false
    }

    fn write_capacity(&self) -> usize {
        usize::MAX
    }
}
