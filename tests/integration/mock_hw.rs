//! Mock adapters for integration tests.
//!
//! Surfaces and the indicator share one [`Trace`] so tests can assert on
//! the exact interleaving of shutter and status-signal calls.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use shutterctl::app::events::AppEvent;
use shutterctl::app::ports::{AnalogPort, EventSink, IndicatorPort, SurfacePort, UnitState};
use shutterctl::config::{Rgb, SystemConfig};
use shutterctl::serial::transport::Transport;

// ── Call record ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Begin { shutter: usize, units: u16, channel: u8 },
    SetRange { shutter: usize, start: u16, count: u16, state: UnitState },
    Commit { shutter: usize },
    Attach([u8; 3]),
    Show(Rgb),
}

pub type Trace = Rc<RefCell<Vec<Call>>>;

pub fn trace() -> Trace {
    Rc::new(RefCell::new(Vec::new()))
}

// ── Surface ───────────────────────────────────────────────────

pub struct MockSurface {
    pub index: usize,
    pub trace: Trace,
}

impl SurfacePort for MockSurface {
    fn begin(&mut self, units: u16, channel: u8) {
        self.trace.borrow_mut().push(Call::Begin { shutter: self.index, units, channel });
    }

    fn set_range(&mut self, start: u16, count: u16, state: UnitState) {
        self.trace
            .borrow_mut()
            .push(Call::SetRange { shutter: self.index, start, count, state });
    }

    fn commit(&mut self) {
        self.trace.borrow_mut().push(Call::Commit { shutter: self.index });
    }
}

// ── Indicator ─────────────────────────────────────────────────

pub struct MockIndicator {
    pub trace: Trace,
}

impl IndicatorPort for MockIndicator {
    fn attach(&mut self, channels: [u8; 3]) {
        self.trace.borrow_mut().push(Call::Attach(channels));
    }

    fn set_levels(&mut self, levels: Rgb) {
        self.trace.borrow_mut().push(Call::Show(levels));
    }
}

// ── Analog ────────────────────────────────────────────────────

pub struct FixedAnalog {
    pub temperature_channel: u8,
    pub temperature_raw: u16,
    pub light_raw: u16,
    pub reads: u32,
}

impl FixedAnalog {
    pub fn new(config: &SystemConfig, temperature_raw: u16, light_raw: u16) -> Self {
        Self {
            temperature_channel: config.sensors.temperature_channel,
            temperature_raw,
            light_raw,
            reads: 0,
        }
    }
}

impl AnalogPort for FixedAnalog {
    fn read_raw(&mut self, channel: u8) -> u16 {
        self.reads += 1;
        if channel == self.temperature_channel {
            self.temperature_raw
        } else {
            self.light_raw
        }
    }
}

// ── Host link ─────────────────────────────────────────────────

pub struct MockSerial {
    pub rx: VecDeque<u8>,
    pub tx: Vec<u8>,
    pub capacity: usize,
}

#[allow(dead_code)]
impl MockSerial {
    pub fn new() -> Self {
        Self { rx: VecDeque::new(), tx: Vec::new(), capacity: 128 }
    }

    pub fn send(&mut self, text: &str) {
        self.rx.extend(text.bytes());
    }

    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.tx).into_owned()
    }
}

impl Transport for MockSerial {
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
        self.capacity
    }
}

// ── Delay / sink ──────────────────────────────────────────────

#[derive(Default)]
pub struct NoDelay {
    pub total_ns: u64,
}

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
