//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements     | Connects to                 |
//! |-------------|----------------|-----------------------------|
//! | `led_strip` | SurfacePort    | WS2812 strip via RMT        |
//! | `hardware`  | IndicatorPort  | ESP32 LEDC PWM              |
//! |             | AnalogPort     | ESP32 ADC1 one-shot         |
//! | `uart`      | Transport      | ESP-IDF UART driver         |
//! | `delay`     | DelayNs        | esp-idf-hal delay / timer   |
//! | `log_sink`  | EventSink      | Console log output          |
//! | `nvs`       | ConfigPort     | NVS / in-memory store       |

pub mod delay;
pub mod hardware;
pub mod led_strip;
pub mod log_sink;
pub mod nvs;
pub mod uart;
