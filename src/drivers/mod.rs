//! Indicator driver and one-shot peripheral initialisation.

pub mod hw_init;
pub mod status_led;
