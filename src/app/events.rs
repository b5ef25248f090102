//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them; on device they become log lines.
//! Nothing here ever reaches the host link.

use crate::error::CommsError;
use crate::sensors::SensorSample;
use crate::serial::command::ProtocolError;

use super::commands::Command;

/// A component left inert because its channel was out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Shutter { index: usize, channel: u8 },
    Indicator { channels: [u8; 3] },
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Boot finished: shutters initialised and commanded open.
    Started { shutters: usize },

    /// Startup diagnostic for a misconfigured component.
    ComponentInert(Component),

    /// A command was decoded this cycle.
    CommandReceived(Command),

    /// An inbound token was rejected (already reported to the host).
    ProtocolError(ProtocolError),

    ShuttersOpened { fully_open: usize, total: usize },

    ShuttersClosed { fully_closed: usize, total: usize },

    /// A sensor report line was written.
    SampleSent(SensorSample),

    /// A sensor report was abandoned before anything was written.
    SampleDropped(CommsError),
}
