//! Default peripheral assignments for the reference shutter board.
//!
//! These are only the factory defaults baked into [`SystemConfig`]; the
//! live assignment comes from the stored configuration and is validated by
//! each component at construction.
//!
//! [`SystemConfig`]: crate::config::SystemConfig

use crate::error::ChannelError;

// ---------------------------------------------------------------------------
// Legal GPIO range (ESP32-S3)
// ---------------------------------------------------------------------------

/// Highest GPIO number present on the ESP32-S3.
pub const MAX_GPIO: u8 = 48;

/// Validate that `channel` names an addressable GPIO.
pub fn validate_gpio(channel: u8) -> Result<u8, ChannelError> {
    if channel <= MAX_GPIO {
        Ok(channel)
    } else {
        Err(ChannelError::OutOfRange {
            channel,
            max: MAX_GPIO,
        })
    }
}

// ---------------------------------------------------------------------------
// Shutter LED strips (WS2812, one strip per shutter)
// ---------------------------------------------------------------------------

pub const SHUTTER_0_GPIO: u8 = 4;
pub const SHUTTER_1_GPIO: u8 = 5;
pub const SHUTTER_2_GPIO: u8 = 6;

// ---------------------------------------------------------------------------
// Status indicator (discrete RGB LED on LEDC)
// ---------------------------------------------------------------------------

pub const LED_R_GPIO: u8 = 11;
pub const LED_G_GPIO: u8 = 12;
pub const LED_B_GPIO: u8 = 13;

/// LEDC frequency for the RGB status LED (1 kHz).
pub const LED_PWM_FREQ_HZ: u32 = 1_000;

// ---------------------------------------------------------------------------
// Analog sensors (ADC1 channel numbers, not GPIOs)
// ---------------------------------------------------------------------------

/// Highest ADC1 channel on the ESP32-S3 (GPIO 1-10 → CH0-9).
pub const MAX_ADC1_CHANNEL: u8 = 9;

/// TMP36 temperature sensor — ADC1 channel 2 (GPIO 3).
pub const TEMP_ADC_CHANNEL: u8 = 2;
/// Photoresistor divider — ADC1 channel 8 (GPIO 9).
pub const LIGHT_ADC_CHANNEL: u8 = 8;

// ---------------------------------------------------------------------------
// Command UART (host link)
// ---------------------------------------------------------------------------

/// UART peripheral carrying the command protocol. UART0 stays the console.
pub const COMMAND_UART_NUM: u8 = 1;
pub const UART_TX_GPIO: i32 = 17;
pub const UART_RX_GPIO: i32 = 18;
