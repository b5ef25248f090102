//! Host link: text commands in, text lines out.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │  Transport (trait) ──▶ CommandChannel ──▶ Command          │
//! │        ▲                     │ ERROR: … lines             │
//! │        └─────────────────────┘                            │
//! │        ▲                                                  │
//! │        └── wait_for_capacity ◀── SensorReport::send       │
//! └───────────────────────────────────────────────────────────┘
//! ```

pub mod command;
pub mod handshake;
pub mod transport;
pub mod wait;

use crate::config::LineEnding;
use crate::error::CommsError;
use transport::Transport;

/// Write `text` followed by `ending`, retrying short writes.
///
/// A write that makes no progress is reported as
/// [`CommsError::WriteFailed`].
pub fn write_line<T: Transport>(
    serial: &mut T,
    text: &str,
    ending: LineEnding,
) -> Result<(), CommsError> {
    write_all(serial, text.as_bytes())?;
    write_all(serial, ending.as_str().as_bytes())?;
    serial.flush().map_err(|e| {
        log::warn!("serial: flush failed: {:?}", e);
        CommsError::WriteFailed
    })
}

fn write_all<T: Transport>(serial: &mut T, mut data: &[u8]) -> Result<(), CommsError> {
    while !data.is_empty() {
        match serial.write(data) {
            Ok(0) => return Err(CommsError::WriteFailed),
            Ok(n) => data = &data[n.min(data.len())..],
            Err(e) => {
                log::warn!("serial: write failed: {:?}", e);
                return Err(CommsError::WriteFailed);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts at most `chunk` bytes per write.
    struct Trickle {
        out: Vec<u8>,
        chunk: usize,
    }

    impl Transport for Trickle {
        type Error = ();
        fn read(&mut self, _buf: &mut [u8]) -> Result<usize, ()> {
            Ok(0)
        }
        fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
            let n = data.len().min(self.chunk);
            self.out.extend_from_slice(&data[..n]);
            Ok(n)
        }
        fn flush(&mut self) -> Result<(), ()> {
            Ok(())
        }
        fn available(&self) -> bool {
            false
        }
        fn write_capacity(&self) -> usize {
            self.chunk
        }
    }

    #[test]
    fn short_writes_are_retried() {
        let mut t = Trickle { out: Vec::new(), chunk: 3 };
        write_line(&mut t, "READY", LineEnding::CrLf).unwrap();
        assert_eq!(t.out, b"READY\r\n");
    }

    #[test]
    fn stalled_transport_fails() {
        let mut t = Trickle { out: Vec::new(), chunk: 0 };
        assert_eq!(write_line(&mut t, "x", LineEnding::Lf), Err(CommsError::WriteFailed));
    }
}
