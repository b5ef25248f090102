//! Bounded wait for outbound buffer space.
//!
//! A report is only written once the transport can take the whole line,
//! so a half-written `temp;light` pair never reaches the host. The wait is
//! bounded by a poll budget and can be cancelled from another context
//! (e.g. a shutdown hook) through a shared [`CancelFlag`].

use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::delay::DelayNs;

use crate::config::SerialConfig;
use crate::error::CommsError;

use super::transport::Transport;

/// How often, and how many times, to re-check the transmit buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub poll_interval_ms: u32,
    /// `None` waits until space appears or the wait is cancelled.
    pub max_polls: Option<u32>,
}

impl WaitPolicy {
    pub fn from_config(serial: &SerialConfig) -> Self {
        Self {
            poll_interval_ms: serial.tx_poll_interval_ms,
            max_polls: (serial.tx_max_polls != 0).then_some(serial.tx_max_polls),
        }
    }
}

/// Lock-free cancellation request, safe to set from an ISR.
#[derive(Debug, Default)]
pub struct CancelFlag(AtomicBool);

impl CancelFlag {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Block until `serial` reports at least `needed` free bytes.
///
/// Returns the number of polls that found the buffer short (0 when space
/// was available immediately).
pub fn wait_for_capacity<T: Transport>(
    serial: &T,
    needed: usize,
    policy: &WaitPolicy,
    delay: &mut impl DelayNs,
    cancel: &CancelFlag,
) -> Result<u32, CommsError> {
    let mut polls: u32 = 0;
    loop {
        if cancel.is_cancelled() {
            return Err(CommsError::TxCancelled);
        }
        if serial.write_capacity() >= needed {
            return Ok(polls);
        }
        if policy.max_polls.is_some_and(|max| polls >= max) {
            return Err(CommsError::TxTimeout);
        }
        delay.delay_ms(policy.poll_interval_ms);
        polls = polls.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    /// Capacity grows by `step` on every query.
    struct Draining {
        free: Cell<usize>,
        step: usize,
    }

    impl Transport for Draining {
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
            let now = self.free.get();
            self.free.set(now + self.step);
            now
        }
    }

    #[derive(Default)]
    struct CountingDelay {
        calls: u32,
    }

    impl DelayNs for CountingDelay {
        fn delay_ns(&mut self, _ns: u32) {
            self.calls += 1;
        }
    }

    fn policy(max: Option<u32>) -> WaitPolicy {
        WaitPolicy {
            poll_interval_ms: 1,
            max_polls: max,
        }
    }

    #[test]
    fn immediate_space_needs_no_delay() {
        let t = Draining { free: Cell::new(64), step: 0 };
        let mut d = CountingDelay::default();
        assert_eq!(wait_for_capacity(&t, 16, &policy(Some(5)), &mut d, &CancelFlag::new()), Ok(0));
        assert_eq!(d.calls, 0);
    }

    #[test]
    fn waits_until_buffer_drains() {
        let t = Draining { free: Cell::new(0), step: 4 };
        let mut d = CountingDelay::default();
        assert_eq!(wait_for_capacity(&t, 16, &policy(Some(10)), &mut d, &CancelFlag::new()), Ok(4));
        assert_eq!(d.calls, 4);
    }

    #[test]
    fn budget_exhaustion_times_out() {
        let t = Draining { free: Cell::new(0), step: 0 };
        let mut d = CountingDelay::default();
        assert_eq!(
            wait_for_capacity(&t, 1, &policy(Some(3)), &mut d, &CancelFlag::new()),
            Err(CommsError::TxTimeout)
        );
        assert_eq!(d.calls, 3);
    }

    #[test]
    fn cancelled_wait_returns_without_polling() {
        let t = Draining { free: Cell::new(0), step: 0 };
        let mut d = CountingDelay::default();
        let cancel = CancelFlag::new();
        cancel.cancel();
        assert_eq!(
            wait_for_capacity(&t, 1, &policy(None), &mut d, &cancel),
            Err(CommsError::TxCancelled)
        );
        assert_eq!(d.calls, 0);
        cancel.reset();
        assert!(!cancel.is_cancelled());
    }

    #[test]
    fn zero_budget_means_unbounded() {
        let mut serial = crate::config::SystemConfig::default().serial;
        serial.tx_max_polls = 0;
        assert_eq!(WaitPolicy::from_config(&serial).max_polls, None);
    }
}
