//! Fuzz target: `CommandChannel::poll`
//!
//! Streams arbitrary bytes through the command channel until the input is
//! exhausted and asserts that every poll terminates, consumes input, and
//! that every error line written back is well formed.
//!
//! cargo fuzz run fuzz_command_decoder

#![no_main]

use std::collections::VecDeque;

use embedded_hal::delay::DelayNs;
use libfuzzer_sys::fuzz_target;
use shutterctl::config::SystemConfig;
use shutterctl::serial::command::CommandChannel;
use shutterctl::serial::transport::Transport;

struct Feed {
    rx: VecDeque<u8>,
    tx: Vec<u8>,
}

impl Transport for Feed {
    type Error = ();
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
        let n = buf.len().min(self.rx.len());
        for (slot, b) in buf.iter_mut().zip(self.rx.drain(..n)) {
            *slot = b;
        }
        Ok(n)
    }
    fn write(&mut self, data: &[u8]) -> Result<usize, ()> {
        self.tx.extend_from_slice(data);
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

fuzz_target!(|data: &[u8]| {
    let cfg = SystemConfig::default();
    let channel = CommandChannel::new(cfg.commands, &cfg.serial);
    let mut feed = Feed { rx: data.iter().copied().collect(), tx: Vec::new() };

    // Every poll consumes at least one byte while input remains.
    for _ in 0..=data.len() {
        if feed.rx.is_empty() {
            break;
        }
        let before = feed.rx.len();
        let _ = channel.poll(&mut feed, &mut NoDelay);
        assert!(feed.rx.len() < before, "poll made no progress");
    }
    assert!(feed.rx.is_empty());

    let out = String::from_utf8(feed.tx).expect("error lines are ASCII");
    for line in out.lines() {
        assert!(line.starts_with("ERROR: "), "unexpected output: {line}");
    }
});
