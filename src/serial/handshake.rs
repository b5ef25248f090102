//! Optional boot-time exchange with a host that waits for the device.
//!
//! ```text
//!   device ── CONNECT ──▶ host
//!   device ◀── any byte ── host
//!            (shutters start)
//!   device ── READY ────▶ host
//! ```

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::config::LineEnding;
use crate::error::CommsError;

use super::transport::Transport;
use super::write_line;

pub const CONNECT: &str = "CONNECT";
pub const READY: &str = "READY";

/// Announce the device and wait up to `timeout_ms` for the host's reply.
///
/// Whatever the host sent is drained so it cannot be mistaken for a
/// command on the first cycle.
pub fn announce<T: Transport>(
    serial: &mut T,
    delay: &mut impl DelayNs,
    ending: LineEnding,
    timeout_ms: u32,
) -> Result<(), CommsError> {
    write_line(serial, CONNECT, ending)?;

    let mut waited_ms = 0;
    while !serial.available() {
        if waited_ms >= timeout_ms {
            warn!("handshake: no reply after {} ms", timeout_ms);
            return Err(CommsError::HandshakeTimeout);
        }
        delay.delay_ms(1);
        waited_ms += 1;
    }

    let mut scratch = [0u8; 16];
    let mut drained = 0;
    while let Ok(n) = serial.read(&mut scratch) {
        if n == 0 {
            break;
        }
        drained += n;
    }
    info!("handshake: host answered ({} bytes)", drained);
    Ok(())
}

/// Tell the host the shutters are initialised.
pub fn ready<T: Transport>(serial: &mut T, ending: LineEnding) -> Result<(), CommsError> {
    write_line(serial, READY, ending)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct Host {
        rx: VecDeque<u8>,
        tx: Vec<u8>,
        /// Reply bytes queued once the device has written something.
        reply: &'static [u8],
    }

    impl Transport for Host {
        type Error = ();
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
            let n = buf.len().min(self.rx.len());
            for slot in buf.iter_mut().take(n) {
                *slot = self.rx.pop_front().unwrap_or(0);
            }
            Ok(n)
        }
        fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
            self.tx.extend_from_slice(data);
            self.rx.extend(self.reply.iter().copied());
            self.reply = &[];
            Ok(data.len())
        }
        fn flush(&mut self) -> Result<(), ()> {
            Ok(())
        }
        fn available(&self) -> bool {
            !self.rx.is_empty()
        }
        fn write_capacity(&self) -> usize {
            usize::MAX
        }
    }

    struct NoDelay;
    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    #[test]
    fn announce_then_ready() {
        let mut host = Host { rx: VecDeque::new(), tx: Vec::new(), reply: b"1" };
        announce(&mut host, &mut NoDelay, LineEnding::CrLf, 100).unwrap();
        assert!(!host.available(), "reply must be drained");
        ready(&mut host, LineEnding::CrLf).unwrap();
        assert_eq!(host.tx, b"CONNECT\r\nREADY\r\n");
    }

    #[test]
    fn silent_host_times_out() {
        let mut host = Host { rx: VecDeque::new(), tx: Vec::new(), reply: b"" };
        assert_eq!(
            announce(&mut host, &mut NoDelay, LineEnding::Lf, 5),
            Err(CommsError::HandshakeTimeout)
        );
    }
}
