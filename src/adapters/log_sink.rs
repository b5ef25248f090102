//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (console UART / USB-CDC, never the command UART).

use log::{error, info, warn};

use crate::app::events::{AppEvent, Component};
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { shutters } => {
                info!("START | shutters={} | all open", shutters);
            }
            AppEvent::ComponentInert(Component::Shutter { index, channel }) => {
                error!("DIAG | shutter #{} inert (GPIO {} out of range)", index, channel);
            }
            AppEvent::ComponentInert(Component::Indicator { channels }) => {
                error!("DIAG | status indicator inert (GPIOs {:?})", channels);
            }
            AppEvent::CommandReceived(cmd) => {
                info!("CMD | {:?}", cmd);
            }
            AppEvent::ProtocolError(err) => {
                warn!("PROTO | {}", err);
            }
            AppEvent::ShuttersOpened { fully_open, total } => {
                info!("BANK | open_all {}/{} fully open", fully_open, total);
            }
            AppEvent::ShuttersClosed { fully_closed, total } => {
                info!("BANK | close_all {}/{} fully closed", fully_closed, total);
            }
            AppEvent::SampleSent(s) => {
                info!(
                    "INFO | T={:.2}\u{00b0}C | light={:.2}%",
                    s.temperature_c, s.light_percent
                );
            }
            AppEvent::SampleDropped(e) => {
                warn!("INFO | report dropped: {}", e);
            }
        }
    }
}
