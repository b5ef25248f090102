//! System configuration parameters
//!
//! All tunable parameters for the shutter controller. Values can be
//! overridden via NVS (non-volatile storage); see
//! [`NvsConfigStore`](crate::adapters::nvs::NvsConfigStore).

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::pins;

/// Maximum number of shutters a bank can hold (one RMT TX channel each).
pub const MAX_SHUTTERS: usize = 4;

/// Pixel budget of one shutter strip (3 bytes of frame buffer per unit).
pub const MAX_UNITS: u16 = 256;

/// Colour as (R, G, B) tuple, each 0–255.
pub type Rgb = (u8, u8, u8);

/// One shutter: the GPIO driving its strip and how many units it has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShutterConfig {
    /// GPIO of the LED strip standing in for the shutter motor.
    pub channel: u8,
    /// Total number of closable units.
    pub capacity: u16,
}

/// GPIOs of the three status indicator lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    pub red_channel: u8,
    pub green_channel: u8,
    pub blue_channel: u8,
}

impl IndicatorConfig {
    pub fn channels(&self) -> [u8; 3] {
        [self.red_channel, self.green_channel, self.blue_channel]
    }
}

/// Indicator colours shown around bank operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusColours {
    pub booting: Rgb,
    pub busy: Rgb,
    pub idle_open: Rgb,
    pub idle_closed: Rgb,
}

/// How the strip renders open and closed units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceColours {
    pub open: Rgb,
    pub closed: Rgb,
}

/// Wire codes of the recognised commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandCodes {
    pub open_all: u32,
    pub close_all: u32,
    pub send_info: u32,
}

/// Outbound line terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineEnding {
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// Host link parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialConfig {
    /// UART peripheral number carrying the protocol.
    pub uart_port: u8,
    pub baud_rate: u32,
    /// How long an undelimited token may wait for its next byte.
    pub read_timeout_ms: u32,
    pub line_ending: LineEnding,
    /// Free transmit buffer required before a sensor report is written.
    pub min_tx_free: u16,
    /// Interval between transmit-capacity polls.
    pub tx_poll_interval_ms: u32,
    /// Poll budget for the capacity wait (0 = wait indefinitely).
    pub tx_max_polls: u32,
    /// Perform the `CONNECT` / `READY` exchange with the host at boot.
    pub host_handshake: bool,
    pub handshake_timeout_ms: u32,
}

/// Linear analog temperature sensor (TMP36 family).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureCalibration {
    /// ADC full-scale voltage in millivolts.
    pub reference_mv: f32,
    /// Number of ADC steps across full scale.
    pub adc_steps: f32,
    /// Sensor output at 0 °C.
    pub offset_mv: f32,
    pub mv_per_celsius: f32,
}

/// Photoresistor divider fitted to an exponential response.
///
/// Calibrated against the reference divider network; other hardware must
/// refit `dark_raw`, `bright_raw` and `curvature`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightCalibration {
    /// Raw reading at or below which the light level is 0 %.
    pub dark_raw: u16,
    /// Raw reading at or above which the light level is 100 %.
    pub bright_raw: u16,
    /// Exponential curvature per raw count.
    pub curvature: f32,
}

/// Analog inputs (ADC1 channel numbers) and their calibrations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorConfig {
    pub temperature_channel: u8,
    pub light_channel: u8,
    pub temperature: TemperatureCalibration,
    pub light: LightCalibration,
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    pub shutters: Vec<ShutterConfig, MAX_SHUTTERS>,
    pub indicator: IndicatorConfig,
    pub colours: StatusColours,
    pub surface: SurfaceColours,
    pub commands: CommandCodes,
    pub serial: SerialConfig,
    pub sensors: SensorConfig,
    /// Idle delay at the end of each dispatch cycle (milliseconds).
    pub idle_delay_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        let mut shutters = Vec::new();
        for (channel, capacity) in [
            (pins::SHUTTER_0_GPIO, 8),
            (pins::SHUTTER_1_GPIO, 10),
            (pins::SHUTTER_2_GPIO, 16),
        ] {
            // Three entries always fit in MAX_SHUTTERS.
            let _ = shutters.push(ShutterConfig { channel, capacity });
        }

        Self {
            shutters,
            indicator: IndicatorConfig {
                red_channel: pins::LED_R_GPIO,
                green_channel: pins::LED_G_GPIO,
                blue_channel: pins::LED_B_GPIO,
            },
            colours: StatusColours {
                booting: (255, 0, 0),
                busy: (255, 255, 255),
                idle_open: (0, 255, 0),
                idle_closed: (0, 0, 255),
            },
            surface: SurfaceColours {
                open: (0, 0, 0),
                closed: (255, 140, 0),
            },
            commands: CommandCodes {
                open_all: 8,
                close_all: 16,
                send_info: 32,
            },
            serial: SerialConfig {
                uart_port: pins::COMMAND_UART_NUM,
                baud_rate: 9600,
                read_timeout_ms: 50,
                line_ending: LineEnding::Lf,
                min_tx_free: 16,
                tx_poll_interval_ms: 1,
                tx_max_polls: 0,
                host_handshake: false,
                handshake_timeout_ms: 30_000,
            },
            sensors: SensorConfig {
                temperature_channel: pins::TEMP_ADC_CHANNEL,
                light_channel: pins::LIGHT_ADC_CHANNEL,
                temperature: TemperatureCalibration {
                    reference_mv: 3100.0,
                    adc_steps: 4096.0,
                    offset_mv: 500.0,
                    mv_per_celsius: 10.0,
                },
                light: LightCalibration {
                    dark_raw: 40,
                    bright_raw: 4000,
                    curvature: 0.001,
                },
            },
            idle_delay_ms: 10,
        }
    }
}

impl SystemConfig {
    /// Range-check every field.
    ///
    /// Shutter and indicator GPIOs are intentionally not checked here: an
    /// illegal channel leaves only that component inert at construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shutters.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "at least one shutter must be configured",
            ));
        }
        if self.shutters.iter().any(|s| s.capacity == 0) {
            return Err(ConfigError::ValidationFailed(
                "shutter capacity must be at least 1",
            ));
        }
        if self.shutters.iter().any(|s| s.capacity > MAX_UNITS) {
            return Err(ConfigError::ValidationFailed(
                "shutter capacity must be at most 256",
            ));
        }
        for (i, s) in self.shutters.iter().enumerate() {
            if self.shutters[..i].iter().any(|o| o.channel == s.channel) {
                return Err(ConfigError::ValidationFailed(
                    "shutters must use distinct GPIOs",
                ));
            }
        }

        let codes = [
            self.commands.open_all,
            self.commands.close_all,
            self.commands.send_info,
        ];
        if codes.iter().any(|&c| c == 0 || c % 2 != 0) {
            return Err(ConfigError::ValidationFailed(
                "command codes must be positive even integers",
            ));
        }
        if codes[0] == codes[1] || codes[0] == codes[2] || codes[1] == codes[2] {
            return Err(ConfigError::ValidationFailed(
                "command codes must be distinct",
            ));
        }

        let s = &self.serial;
        if !(300..=921_600).contains(&s.baud_rate) {
            return Err(ConfigError::ValidationFailed(
                "baud_rate must be 300–921600",
            ));
        }
        if s.read_timeout_ms > 1000 {
            return Err(ConfigError::ValidationFailed(
                "read_timeout_ms must be 0–1000",
            ));
        }
        if s.min_tx_free == 0 {
            return Err(ConfigError::ValidationFailed(
                "min_tx_free must be at least 1",
            ));
        }
        if s.tx_poll_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "tx_poll_interval_ms must be at least 1",
            ));
        }

        let sensors = &self.sensors;
        if sensors.temperature_channel > pins::MAX_ADC1_CHANNEL
            || sensors.light_channel > pins::MAX_ADC1_CHANNEL
        {
            return Err(ConfigError::ValidationFailed(
                "sensor channels must be ADC1 channels 0–9",
            ));
        }
        if sensors.temperature_channel == sensors.light_channel {
            return Err(ConfigError::ValidationFailed(
                "temperature and light must use different ADC channels",
            ));
        }
        let t = &sensors.temperature;
        if t.reference_mv <= 0.0 || t.adc_steps <= 0.0 || t.mv_per_celsius <= 0.0 {
            return Err(ConfigError::ValidationFailed(
                "temperature calibration must be positive",
            ));
        }
        let l = &sensors.light;
        if l.dark_raw >= l.bright_raw {
            return Err(ConfigError::ValidationFailed(
                "light dark_raw must be below bright_raw",
            ));
        }
        if !(l.curvature.is_finite() && l.curvature > 0.0 && l.curvature <= 0.1) {
            return Err(ConfigError::ValidationFailed(
                "light curvature must be in (0, 0.1]",
            ));
        }

        if self.idle_delay_ms > 10_000 {
            return Err(ConfigError::ValidationFailed(
                "idle_delay_ms must be 0–10000",
            ));
        }
        Ok(())
    }
}
