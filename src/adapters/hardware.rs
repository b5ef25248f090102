//! Hardware adapter — bridges the indicator outputs and analog inputs to
//! domain port traits.
//!
//! [`LedcIndicator`] drives the three indicator lanes through LEDC PWM and
//! [`AdcInputs`] samples ADC1 one-shot. On non-espidf targets both keep
//! in-memory state that tests can inspect or inject.

use crate::app::ports::{AnalogPort, IndicatorPort};
use crate::config::Rgb;
#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

// ── IndicatorPort implementation ──────────────────────────────

pub struct LedcIndicator {
    attached: bool,
    #[cfg(not(target_os = "espidf"))]
    levels: Rgb,
    #[cfg(not(target_os = "espidf"))]
    channels: Option<[u8; 3]>,
}

impl Default for LedcIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl LedcIndicator {
    pub fn new() -> Self {
        Self {
            attached: false,
            #[cfg(not(target_os = "espidf"))]
            levels: (0, 0, 0),
            #[cfg(not(target_os = "espidf"))]
            channels: None,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Levels last written to the lanes (simulation only).
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_levels(&self) -> Rgb {
        self.levels
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_channels(&self) -> Option<[u8; 3]> {
        self.channels
    }
}

impl IndicatorPort for LedcIndicator {
    #[cfg(target_os = "espidf")]
    fn attach(&mut self, channels: [u8; 3]) {
        match hw_init::init_ledc_indicator(channels) {
            Ok(()) => self.attached = true,
            Err(e) => log::error!("LedcIndicator: {}", e),
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn attach(&mut self, channels: [u8; 3]) {
        self.channels = Some(channels);
        self.attached = true;
    }

    #[cfg(target_os = "espidf")]
    fn set_levels(&mut self, (r, g, b): Rgb) {
        if !self.attached {
            return;
        }
        hw_init::ledc_set(hw_init::LEDC_CH_LED_R, r);
        hw_init::ledc_set(hw_init::LEDC_CH_LED_G, g);
        hw_init::ledc_set(hw_init::LEDC_CH_LED_B, b);
    }

    #[cfg(not(target_os = "espidf"))]
    fn set_levels(&mut self, levels: Rgb) {
        if self.attached {
            self.levels = levels;
        }
    }
}

// ── AnalogPort implementation ─────────────────────────────────

/// ADC1 one-shot reader. Channels must be configured with
/// [`hw_init::init_adc`](crate::drivers::hw_init::init_adc) first.
pub struct AdcInputs {
    #[cfg(not(target_os = "espidf"))]
    sim_raw: [u16; crate::pins::MAX_ADC1_CHANNEL as usize + 1],
}

impl Default for AdcInputs {
    fn default() -> Self {
        Self::new()
    }
}

impl AdcInputs {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            sim_raw: [0; crate::pins::MAX_ADC1_CHANNEL as usize + 1],
        }
    }

    /// Inject the raw value returned for `channel` (simulation only).
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_raw(&mut self, channel: u8, raw: u16) {
        if let Some(slot) = self.sim_raw.get_mut(channel as usize) {
            *slot = raw;
        }
    }
}

impl AnalogPort for AdcInputs {
    #[cfg(target_os = "espidf")]
    fn read_raw(&mut self, channel: u8) -> u16 {
        hw_init::adc1_read(channel)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_raw(&mut self, channel: u8) -> u16 {
        self.sim_raw.get(channel as usize).copied().unwrap_or(0)
    }
}
