//! WS2812 LED strip standing in for a shutter motor.
//!
//! One pixel per shutter unit: open units show `SurfaceColours::open`,
//! closed units `SurfaceColours::closed`. Writes are staged in a pixel
//! buffer and pushed out on `commit`.
//!
//! - **`target_os = "espidf"`** — RMT TX channel with a bytes encoder,
//!   GRB byte order, MSB first.
//! - **`not(target_os = "espidf")`** — keeps the last committed frame and
//!   a commit counter for host tests.

use log::{info, warn};

use crate::app::ports::{SurfacePort, UnitState};
use crate::config::{MAX_UNITS, Rgb, SurfaceColours};
#[cfg(target_os = "espidf")]
use crate::drivers::hw_init::{self, RmtStrip};

/// Upper bound on a single `rmt_tx_wait_all_done`.
#[cfg(target_os = "espidf")]
const TX_TIMEOUT_MS: i32 = 100;

pub struct LedStrip {
    colours: SurfaceColours,
    pixels: Vec<Rgb>,
    channel: Option<u8>,
    #[cfg(target_os = "espidf")]
    rmt: Option<RmtStrip>,
    #[cfg(not(target_os = "espidf"))]
    committed: Vec<Rgb>,
    #[cfg(not(target_os = "espidf"))]
    commits: u32,
}

impl LedStrip {
    pub fn new(colours: SurfaceColours) -> Self {
        Self {
            colours,
            pixels: Vec::new(),
            channel: None,
            #[cfg(target_os = "espidf")]
            rmt: None,
            #[cfg(not(target_os = "espidf"))]
            committed: Vec::new(),
            #[cfg(not(target_os = "espidf"))]
            commits: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// GPIO passed to `begin`, if it has run.
    pub fn channel(&self) -> Option<u8> {
        self.channel
    }

    /// Frame as of the last commit (simulation only).
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_committed(&self) -> &[Rgb] {
        &self.committed
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_commit_count(&self) -> u32 {
        self.commits
    }

    /// Number of committed pixels showing the closed colour.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_closed_pixels(&self) -> usize {
        self.committed
            .iter()
            .filter(|&&p| p == self.colours.closed)
            .count()
    }

    fn colour_for(&self, state: UnitState) -> Rgb {
        match state {
            UnitState::Open => self.colours.open,
            UnitState::Closed => self.colours.closed,
        }
    }

    #[cfg(target_os = "espidf")]
    fn push_frame(&mut self) {
        let Some(rmt) = self.rmt.as_ref() else {
            return;
        };
        let mut grb = Vec::with_capacity(self.pixels.len() * 3);
        for &(r, g, b) in &self.pixels {
            grb.extend_from_slice(&[g, r, b]);
        }
        let tx_cfg = esp_idf_svc::sys::rmt_transmit_config_t::default();
        // SAFETY: channel/encoder were created by init_rmt_strip and stay
        // valid for the strip's lifetime; `grb` outlives the wait below.
        let ret = unsafe {
            let ret = esp_idf_svc::sys::rmt_transmit(
                rmt.channel,
                rmt.encoder,
                grb.as_ptr() as *const _,
                grb.len(),
                &tx_cfg,
            );
            if ret == esp_idf_svc::sys::ESP_OK as i32 {
                esp_idf_svc::sys::rmt_tx_wait_all_done(rmt.channel, TX_TIMEOUT_MS)
            } else {
                ret
            }
        };
        if ret != esp_idf_svc::sys::ESP_OK as i32 {
            warn!("LedStrip: RMT transmit failed (rc={})", ret);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn push_frame(&mut self) {
        self.committed.clone_from(&self.pixels);
        self.commits += 1;
    }
}

impl SurfacePort for LedStrip {
    fn begin(&mut self, units: u16, channel: u8) {
        if self.channel.is_some() {
            warn!("LedStrip: begin() on GPIO {} called twice", channel);
            return;
        }
        if units > MAX_UNITS {
            warn!("LedStrip: {} units exceed the {} pixel budget", units, MAX_UNITS);
        }
        self.pixels = vec![self.colours.open; units.min(MAX_UNITS) as usize];
        self.channel = Some(channel);

        #[cfg(target_os = "espidf")]
        match hw_init::init_rmt_strip(channel) {
            Ok(rmt) => self.rmt = Some(rmt),
            Err(e) => log::error!("LedStrip: {}", e),
        }

        info!("LedStrip: {} pixels on GPIO {}", units, channel);
    }

    fn set_range(&mut self, start: u16, count: u16, state: UnitState) {
        let colour = self.colour_for(state);
        let start = start as usize;
        let end = start.saturating_add(count as usize).min(self.pixels.len());
        if let Some(run) = self.pixels.get_mut(start..end) {
            run.fill(colour);
        }
    }

    fn commit(&mut self) {
        self.push_frame();
    }
}
