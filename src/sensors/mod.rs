//! Sensor subsystem — conversions and the on-demand [`SensorReport`].
//!
//! The report owns no hardware. The ADC and the host link are passed in at
//! the call site, so the same code runs against real peripherals and host
//! simulations.

pub mod light;
pub mod temperature;

use core::fmt::Write as _;

use embedded_hal::delay::DelayNs;
use heapless::String;
use log::debug;

use crate::app::ports::AnalogPort;
use crate::config::{LightCalibration, LineEnding, SystemConfig, TemperatureCalibration};
use crate::error::CommsError;
use crate::serial::transport::Transport;
use crate::serial::wait::{CancelFlag, WaitPolicy, wait_for_capacity};
use crate::serial::write_line;

/// Longest formatted report line, terminator excluded.
pub const MAX_REPORT_LEN: usize = 32;

/// One temperature/light pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSample {
    pub temperature_c: f32,
    pub light_percent: f32,
}

impl SensorSample {
    /// `temperature;light`, two decimals each.
    pub fn format(&self) -> Result<String<MAX_REPORT_LEN>, CommsError> {
        let mut line = String::new();
        write!(line, "{:.2};{:.2}", self.temperature_c, self.light_percent)
            .map_err(|_| CommsError::WriteFailed)?;
        Ok(line)
    }
}

pub struct SensorReport {
    temperature_channel: u8,
    light_channel: u8,
    temperature: TemperatureCalibration,
    light: LightCalibration,
    min_tx_free: usize,
    policy: WaitPolicy,
    line_ending: LineEnding,
}

impl SensorReport {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            temperature_channel: config.sensors.temperature_channel,
            light_channel: config.sensors.light_channel,
            temperature: config.sensors.temperature,
            light: config.sensors.light,
            min_tx_free: usize::from(config.serial.min_tx_free),
            policy: WaitPolicy::from_config(&config.serial),
            line_ending: config.serial.line_ending,
        }
    }

    pub fn sample_temperature(&self, analog: &mut impl AnalogPort) -> f32 {
        let raw = analog.read_raw(self.temperature_channel);
        temperature::raw_to_celsius(raw, &self.temperature)
    }

    pub fn sample_light(&self, analog: &mut impl AnalogPort) -> f32 {
        let raw = analog.read_raw(self.light_channel);
        light::raw_to_percent(raw, &self.light)
    }

    pub fn sample(&self, analog: &mut impl AnalogPort) -> SensorSample {
        SensorSample {
            temperature_c: self.sample_temperature(analog),
            light_percent: self.sample_light(analog),
        }
    }

    /// Wait for `min_tx_free` bytes of transmit space, then sample and
    /// write one report line.
    ///
    /// Nothing is written if the wait times out or is cancelled.
    pub fn send<T: Transport>(
        &self,
        analog: &mut impl AnalogPort,
        serial: &mut T,
        delay: &mut impl DelayNs,
        cancel: &CancelFlag,
    ) -> Result<SensorSample, CommsError> {
        let polls = wait_for_capacity(serial, self.min_tx_free, &self.policy, delay, cancel)?;
        if polls > 0 {
            debug!("SensorReport: waited {} polls for tx space", polls);
        }

        let sample = self.sample(analog);
        let line = sample.format()?;
        write_line(serial, &line, self.line_ending)?;
        Ok(sample)
    }
}
