//! Photoresistor light level, 0–100 %.
//!
//! Clamped at the calibrated dark and bright readings; in between the raw
//! value follows a normalised exponential fitted to the reference divider:
//!
//! ```text
//!   pct = 100 · (e^{k·(raw − dark)} − 1) / (e^{k·(bright − dark)} − 1)
//! ```
//!
//! Other hardware must refit `dark_raw`, `bright_raw` and `curvature`.

use crate::config::LightCalibration;

pub fn raw_to_percent(raw: u16, cal: &LightCalibration) -> f32 {
    if raw <= cal.dark_raw {
        return 0.0;
    }
    if raw >= cal.bright_raw {
        return 100.0;
    }
    let k = cal.curvature;
    let span = f32::from(cal.bright_raw - cal.dark_raw);
    let x = f32::from(raw - cal.dark_raw);
    100.0 * (k * x).exp_m1() / (k * span).exp_m1()
}
