//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the shutter bank, the status indicator, the command
//! channel and the sensor report. It exposes a clean, hardware-agnostic
//! API. The host link, ADC, delay and event sink are injected at call
//! sites, making the entire service testable with mock adapters.
//!
//! ```text
//!  Transport ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                │        AppService        │
//! AnalogPort ──▶ │ Channel · Bank · Report  │ ──▶ SurfacePort / IndicatorPort
//!                └──────────────────────────┘
//! ```

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::config::{Rgb, ShutterConfig, SystemConfig};
use crate::drivers::status_led::StatusIndicator;
use crate::sensors::SensorReport;
use crate::serial::command::CommandChannel;
use crate::serial::transport::Transport;
use crate::serial::wait::CancelFlag;
use crate::shutter::ShutterBank;

use super::commands::Command;
use super::events::{AppEvent, Component};
use super::ports::{AnalogPort, EventSink, IndicatorPort, SurfacePort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application context, constructed once at boot.
pub struct AppService<S, L> {
    bank: ShutterBank<S>,
    indicator: StatusIndicator<L>,
    channel: CommandChannel,
    report: SensorReport,
    cancel: CancelFlag,
    booting: Rgb,
    cycle_count: u64,
    started: bool,
}

impl<S: SurfacePort, L: IndicatorPort> AppService<S, L> {
    /// Build every component from configuration.
    ///
    /// Does **not** touch the shutters; call [`start`](Self::start) next.
    pub fn new(
        config: &SystemConfig,
        indicator_port: L,
        make_surface: impl FnMut(usize, &ShutterConfig) -> S,
    ) -> Self {
        let bank = ShutterBank::from_config(&config.shutters, config.colours, make_surface);
        let indicator = StatusIndicator::new(config.indicator, indicator_port);

        Self {
            bank,
            indicator,
            channel: CommandChannel::new(config.commands, &config.serial),
            report: SensorReport::new(config),
            cancel: CancelFlag::new(),
            booting: config.colours.booting,
            cycle_count: 0,
            started: false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Show the booting colour. First thing after construction.
    pub fn signal_booting(&mut self) {
        self.indicator.show(self.booting);
    }

    /// Report inert components, initialise every shutter, then open them
    /// all (the safe initial state).
    pub fn start(&mut self, sink: &mut impl EventSink) {
        if self.started {
            warn!("AppService: start() called twice, ignoring");
            return;
        }

        for (index, shutter) in self.bank.shutters().iter().enumerate() {
            if shutter.is_inert() {
                sink.emit(&AppEvent::ComponentInert(Component::Shutter {
                    index,
                    channel: shutter.configured_channel(),
                }));
            }
        }
        if self.indicator.is_inert() {
            sink.emit(&AppEvent::ComponentInert(Component::Indicator {
                channels: self.indicator.configured_channels(),
            }));
        }

        self.bank.init_all();
        let fully_open = self.bank.open_all(&mut self.indicator);
        sink.emit(&AppEvent::ShuttersOpened {
            fully_open,
            total: self.bank.len(),
        });

        self.started = true;
        sink.emit(&AppEvent::Started {
            shutters: self.bank.len(),
        });
        info!("AppService started with {} shutters", self.bank.len());
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// One poll-decode-dispatch pass. Returns the command that ran.
    ///
    /// Rejected input has already been reported to the host and counts
    /// as [`Command::None`].
    pub fn tick<T: Transport>(
        &mut self,
        serial: &mut T,
        analog: &mut impl AnalogPort,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) -> Command {
        self.cycle_count += 1;

        let cmd = match self.channel.poll(serial, delay) {
            Ok(cmd) => cmd,
            Err(err) => {
                sink.emit(&AppEvent::ProtocolError(err));
                Command::None
            }
        };

        self.dispatch(cmd, serial, analog, delay, sink);
        cmd
    }

    /// Execute one command.
    pub fn dispatch<T: Transport>(
        &mut self,
        cmd: Command,
        serial: &mut T,
        analog: &mut impl AnalogPort,
        delay: &mut impl DelayNs,
        sink: &mut impl EventSink,
    ) {
        if cmd == Command::None {
            return;
        }
        sink.emit(&AppEvent::CommandReceived(cmd));

        match cmd {
            Command::None => {}
            Command::OpenAll => {
                let fully_open = self.bank.open_all(&mut self.indicator);
                sink.emit(&AppEvent::ShuttersOpened {
                    fully_open,
                    total: self.bank.len(),
                });
            }
            Command::CloseAll => {
                let fully_closed = self.bank.close_all(&mut self.indicator);
                sink.emit(&AppEvent::ShuttersClosed {
                    fully_closed,
                    total: self.bank.len(),
                });
            }
            Command::SendInfo => {
                match self.report.send(analog, serial, delay, &self.cancel) {
                    Ok(sample) => sink.emit(&AppEvent::SampleSent(sample)),
                    Err(e) => sink.emit(&AppEvent::SampleDropped(e)),
                }
                // A cancel applies to one report only.
                self.cancel.reset();
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn bank(&self) -> &ShutterBank<S> {
        &self.bank
    }

    pub fn bank_mut(&mut self) -> &mut ShutterBank<S> {
        &mut self.bank
    }

    pub fn indicator(&self) -> &StatusIndicator<L> {
        &self.indicator
    }

    /// Shared flag that aborts a pending sensor-report wait.
    pub fn cancel_flag(&self) -> &CancelFlag {
        &self.cancel
    }

    /// Dispatch cycles executed since startup.
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    pub fn is_started(&self) -> bool {
        self.started
    }
}
