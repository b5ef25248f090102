//! Shutter state model.
//!
//! A [`Shutter`] is a fixed number of discrete units, each open or closed.
//! Units close from index 0 upward and open from the top of the closed run
//! downward, so the closed units always form the prefix `[0, closed_units)`
//! of the actuator surface.
//!
//! Requests beyond what remains are clamped, never rejected: a duplicated
//! command on the unacknowledged host link leaves the surface unchanged.

pub mod bank;

use log::{debug, error, warn};

use crate::app::ports::{SurfacePort, UnitState};
use crate::config::ShutterConfig;
use crate::error::ChannelError;
use crate::pins;

pub use bank::ShutterBank;

/// How far an open/close request should travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Travel {
    /// All the way to the end stop.
    Full,
    /// At most this many units.
    Units(u16),
}

impl Travel {
    /// Decode the legacy count form: negative is invalid, `0` means fully.
    pub fn from_count(count: i32) -> Option<Self> {
        match count {
            c if c < 0 => None,
            0 => Some(Self::Full),
            c => Some(Self::Units(c.min(i32::from(u16::MAX)) as u16)),
        }
    }
}

/// One actuator and its unit bookkeeping.
pub struct Shutter<S> {
    surface: S,
    /// `None` when the configured channel was illegal (inert shutter).
    channel: Option<u8>,
    configured_channel: u8,
    capacity: u16,
    closed_units: u16,
    started: bool,
}

impl<S: SurfacePort> Shutter<S> {
    /// Build a shutter, leaving it inert if the channel is illegal.
    ///
    /// An inert shutter still tracks its units so the host sees identical
    /// behaviour; it just never drives the surface.
    pub fn new(config: ShutterConfig, surface: S) -> Self {
        let channel = match pins::validate_gpio(config.channel) {
            Ok(ch) => Some(ch),
            Err(e) => {
                error!("Shutter: {} — shutter left inert", e);
                None
            }
        };
        Self {
            surface,
            channel,
            configured_channel: config.channel,
            capacity: config.capacity,
            closed_units: 0,
            started: false,
        }
    }

    /// Strict constructor: refuse an illegal channel instead of going inert.
    pub fn try_new(config: ShutterConfig, surface: S) -> Result<Self, ChannelError> {
        pins::validate_gpio(config.channel)?;
        Ok(Self::new(config, surface))
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Initialise the surface and show every unit open.
    ///
    /// Runs once; later calls are ignored.
    pub fn start(&mut self) {
        if self.started {
            warn!("Shutter(ch {}): start() called twice, ignored", self.configured_channel);
            return;
        }
        self.started = true;

        if let Some(channel) = self.channel {
            self.surface.begin(self.capacity, channel);
            self.surface.set_range(0, self.capacity, UnitState::Open);
            self.surface.commit();
        }
        debug!("Shutter(ch {}): started, {} units", self.configured_channel, self.capacity);
    }

    fn ensure_started(&mut self) {
        if !self.started {
            self.start();
        }
    }

    // ── Open / close ──────────────────────────────────────────

    /// Open by `travel`. Returns whether the shutter is now fully open.
    pub fn open(&mut self, travel: Travel) -> bool {
        if self.closed_units == 0 {
            return true;
        }
        let units = match travel {
            Travel::Full => self.closed_units,
            Travel::Units(n) => n.min(self.closed_units),
        };
        if units == 0 {
            return false;
        }

        self.ensure_started();
        self.paint(self.closed_units - units, units, UnitState::Open);
        self.closed_units -= units;
        self.closed_units == 0
    }

    /// Close by `travel`. Returns whether the shutter is now fully closed.
    pub fn close(&mut self, travel: Travel) -> bool {
        let remaining = self.capacity - self.closed_units;
        if remaining == 0 {
            return true;
        }
        let units = match travel {
            Travel::Full => remaining,
            Travel::Units(n) => n.min(remaining),
        };
        if units == 0 {
            return false;
        }

        self.ensure_started();
        self.paint(self.closed_units, units, UnitState::Closed);
        self.closed_units += units;
        self.closed_units == self.capacity
    }

    pub fn open_fully(&mut self) -> bool {
        self.open(Travel::Full)
    }

    pub fn close_fully(&mut self) -> bool {
        self.close(Travel::Full)
    }

    /// Count form of [`open`](Self::open): negative fails without mutation,
    /// `0` opens fully.
    pub fn open_count(&mut self, count: i32) -> bool {
        match Travel::from_count(count) {
            Some(travel) => self.open(travel),
            None => false,
        }
    }

    /// Count form of [`close`](Self::close): negative fails without
    /// mutation, `0` closes fully.
    pub fn close_count(&mut self, count: i32) -> bool {
        match Travel::from_count(count) {
            Some(travel) => self.close(travel),
            None => false,
        }
    }

    fn paint(&mut self, start: u16, count: u16, state: UnitState) {
        if self.channel.is_some() {
            self.surface.set_range(start, count, state);
            self.surface.commit();
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn capacity(&self) -> u16 {
        self.capacity
    }

    pub fn closed_units(&self) -> u16 {
        self.closed_units
    }

    pub fn is_fully_open(&self) -> bool {
        self.closed_units == 0
    }

    pub fn is_fully_closed(&self) -> bool {
        self.closed_units == self.capacity
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Whether construction rejected the channel.
    pub fn is_inert(&self) -> bool {
        self.channel.is_none()
    }

    /// The channel as configured, legal or not.
    pub fn configured_channel(&self) -> u8 {
        self.configured_channel
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}
