//! The bank: every shutter driven together, bracketed by status signals.
//!
//! ```text
//!  indicator ← busy ─▶ shutter[0] ─▶ shutter[1] ─▶ … ─▶ indicator ← idle
//! ```
//!
//! The indicator is borrowed per call rather than owned; it outlives the
//! bank and is also used by the boot sequence.

use heapless::Vec;
use log::{info, warn};

use crate::app::ports::{IndicatorPort, SurfacePort};
use crate::config::{MAX_SHUTTERS, ShutterConfig, StatusColours};
use crate::drivers::status_led::StatusIndicator;

use super::Shutter;

pub struct ShutterBank<S> {
    shutters: Vec<Shutter<S>, MAX_SHUTTERS>,
    colours: StatusColours,
}

impl<S: SurfacePort> ShutterBank<S> {
    pub fn new(shutters: Vec<Shutter<S>, MAX_SHUTTERS>, colours: StatusColours) -> Self {
        Self { shutters, colours }
    }

    /// Build one shutter per config entry, in order.
    ///
    /// `make_surface` receives the shutter index and its config.
    pub fn from_config(
        configs: &[ShutterConfig],
        colours: StatusColours,
        mut make_surface: impl FnMut(usize, &ShutterConfig) -> S,
    ) -> Self {
        let mut shutters = Vec::new();
        for (index, cfg) in configs.iter().enumerate() {
            let shutter = Shutter::new(*cfg, make_surface(index, cfg));
            if shutters.push(shutter).is_err() {
                warn!(
                    "ShutterBank: more than {} shutters configured, ignoring #{}",
                    MAX_SHUTTERS, index
                );
                break;
            }
        }
        Self::new(shutters, colours)
    }

    /// Start every shutter in index order. Run once at boot.
    pub fn init_all(&mut self) {
        for shutter in &mut self.shutters {
            shutter.start();
        }
        info!("ShutterBank: {} shutters initialised", self.shutters.len());
    }

    /// Busy signal, open every shutter fully, then the idle-open signal.
    ///
    /// Returns how many shutters report fully open.
    pub fn open_all(&mut self, indicator: &mut StatusIndicator<impl IndicatorPort>) -> usize {
        indicator.show(self.colours.busy);
        let mut fully_open = 0;
        for shutter in &mut self.shutters {
            if shutter.open_fully() {
                fully_open += 1;
            }
        }
        indicator.show(self.colours.idle_open);
        fully_open
    }

    /// Busy signal, close every shutter fully, then the idle-closed signal.
    ///
    /// Returns how many shutters report fully closed.
    pub fn close_all(&mut self, indicator: &mut StatusIndicator<impl IndicatorPort>) -> usize {
        indicator.show(self.colours.busy);
        let mut fully_closed = 0;
        for shutter in &mut self.shutters {
            if shutter.close_fully() {
                fully_closed += 1;
            }
        }
        indicator.show(self.colours.idle_closed);
        fully_closed
    }

    pub fn len(&self) -> usize {
        self.shutters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shutters.is_empty()
    }

    pub fn shutters(&self) -> &[Shutter<S>] {
        &self.shutters
    }

    /// Mutable access for partial moves (e.g. maintenance tooling).
    pub fn shutter_mut(&mut self, index: usize) -> Option<&mut Shutter<S>> {
        self.shutters.get_mut(index)
    }
}
