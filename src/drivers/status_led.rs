//! RGB status indicator.
//!
//! Three output lanes (red, green, blue) behind an [`IndicatorPort`]. The
//! indicator has no state machine of its own; the bank and the boot
//! sequence decide what to show.
//!
//! ## Channel validation
//!
//! The three GPIOs are checked at construction exactly like a shutter's.
//! If any lane is illegal the indicator stays inert: `show` still records
//! the requested colour but never reaches the port.

use log::error;

use crate::app::ports::IndicatorPort;
use crate::config::{IndicatorConfig, Rgb};
use crate::pins;

pub struct StatusIndicator<P> {
    port: P,
    configured: [u8; 3],
    active: bool,
    current: Rgb,
}

impl<P: IndicatorPort> StatusIndicator<P> {
    pub fn new(config: IndicatorConfig, mut port: P) -> Self {
        let configured = config.channels();
        let mut active = true;
        for &ch in &configured {
            if let Err(e) = pins::validate_gpio(ch) {
                error!("StatusIndicator: {} — indicator left inert", e);
                active = false;
            }
        }
        if active {
            port.attach(configured);
        }
        Self {
            port,
            configured,
            active,
            current: (0, 0, 0),
        }
    }

    /// Set all three lanes.
    pub fn show(&mut self, colour: Rgb) {
        self.current = colour;
        if self.active {
            self.port.set_levels(colour);
        }
    }

    /// Set the lanes from up to three levels in R, G, B order.
    /// Missing lanes are switched off; extra levels are ignored.
    pub fn show_levels(&mut self, levels: &[u8]) {
        let level = |i: usize| levels.get(i).copied().unwrap_or(0);
        self.show((level(0), level(1), level(2)));
    }

    pub fn off(&mut self) {
        self.show((0, 0, 0));
    }

    /// Last colour requested through [`show`](Self::show).
    pub fn current_colour(&self) -> Rgb {
        self.current
    }

    pub fn is_inert(&self) -> bool {
        !self.active
    }

    pub fn configured_channels(&self) -> [u8; 3] {
        self.configured
    }

    pub fn port(&self) -> &P {
        &self.port
    }
}
