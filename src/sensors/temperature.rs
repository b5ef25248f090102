//! Linear analog temperature sensor (TMP36 family).
//!
//! The sensor outputs `offset_mv` at 0 °C and rises by `mv_per_celsius`
//! per degree. The ADC maps 0..`adc_steps` onto 0..`reference_mv`.

use crate::config::TemperatureCalibration;

pub fn raw_to_millivolts(raw: u16, cal: &TemperatureCalibration) -> f32 {
    raw as f32 * cal.reference_mv / cal.adc_steps
}

pub fn millivolts_to_celsius(mv: f32, cal: &TemperatureCalibration) -> f32 {
    (mv - cal.offset_mv) / cal.mv_per_celsius
}

/// Raw ADC reading straight to degrees Celsius.
pub fn raw_to_celsius(raw: u16, cal: &TemperatureCalibration) -> f32 {
    millivolts_to_celsius(raw_to_millivolts(raw, cal), cal)
}
