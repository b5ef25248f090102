//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (LED strips, indicator outputs, ADC, event sinks,
//! storage) implement these traits. The domain consumes them via generics,
//! so shutters, the bank and the dispatch loop never touch hardware directly.
//! The host link has its own port, [`Transport`](crate::serial::transport::Transport).

use crate::config::{Rgb, SystemConfig};

// ───────────────────────────────────────────────────────────────
// Actuator surface (driven adapter: domain → strip / motor)
// ───────────────────────────────────────────────────────────────

/// Visual/physical state of one shutter unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitState {
    Open,
    Closed,
}

/// An addressable output that renders a run of shutter units.
///
/// Writes are staged by [`set_range`](Self::set_range) and only become
/// visible on [`commit`](Self::commit).
pub trait SurfacePort {
    /// One-time initialisation: `units` addressable cells on `channel`.
    fn begin(&mut self, units: u16, channel: u8);

    /// Stage `count` units starting at `start` to `state`.
    fn set_range(&mut self, start: u16, count: u16, state: UnitState);

    /// Push staged writes to the device.
    fn commit(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Indicator outputs (driven adapter: domain → RGB LED)
// ───────────────────────────────────────────────────────────────

/// Three independent output levels behind the status indicator.
pub trait IndicatorPort {
    /// Bind the red/green/blue lanes to their (already validated) GPIOs.
    fn attach(&mut self, channels: [u8; 3]);

    /// Drive all three lanes.
    fn set_levels(&mut self, levels: Rgb);
}

// ───────────────────────────────────────────────────────────────
// Analog inputs (driven adapter: ADC → domain)
// ───────────────────────────────────────────────────────────────

/// Raw analog sampling.
pub trait AnalogPort {
    /// Take one raw sample from ADC `channel`.
    fn read_raw(&mut self, channel: u8) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate before persisting. Invalid ranges are
/// rejected with [`ConfigError::ValidationFailed`], not silently clamped.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`SystemConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&mut self, config: &SystemConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl std::error::Error for ConfigError {}
