//! Shutter Controller Firmware — Main Entry Point
//!
//! Single cooperative loop: one poll-decode-dispatch pass per cycle.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  LedStrip × N     LedcIndicator   AdcInputs     UartTransport  │
//! │  (SurfacePort)    (IndicatorPort) (AnalogPort)  (Transport)    │
//! │  LogEventSink     NvsConfigStore  SystemDelay                  │
//! │  (EventSink)      (ConfigPort)    (DelayNs)                    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  CommandChannel · ShutterBank · SensorReport           │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use embedded_hal::delay::DelayNs;
use log::{error, info, warn};

use shutterctl::adapters::delay::SystemDelay;
use shutterctl::adapters::hardware::{AdcInputs, LedcIndicator};
use shutterctl::adapters::led_strip::LedStrip;
use shutterctl::adapters::log_sink::LogEventSink;
use shutterctl::adapters::nvs::NvsConfigStore;
use shutterctl::adapters::uart::UartTransport;
use shutterctl::app::service::AppService;
use shutterctl::config::SystemConfig;
use shutterctl::drivers::hw_init;
use shutterctl::serial::handshake;
use shutterctl::serial::transport::{NullTransport, Transport};

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  shutterctl v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Load config from NVS (or defaults) ─────────────────
    let config = match NvsConfigStore::new() {
        Ok(nvs) => nvs.load_or_default(),
        Err(e) => {
            warn!("NVS init failed ({}), running with defaults", e);
            SystemConfig::default()
        }
    };

    // ── 3. Application context + booting colour ──────────────
    let surface = config.surface;
    let mut app = AppService::new(&config, LedcIndicator::new(), |_, _| {
        LedStrip::new(surface)
    });
    app.signal_booting();

    // ── 4. Host link ──────────────────────────────────────────
    let link = UartTransport::open(&config.serial);

    // ── 5. Analog inputs ──────────────────────────────────────
    let sensor_channels = [
        config.sensors.temperature_channel,
        config.sensors.light_channel,
    ];
    if let Err(e) = hw_init::init_adc(&sensor_channels) {
        error!("ADC init failed: {}; reports will read 0", e);
    }
    let mut analog = AdcInputs::new();

    let mut delay = SystemDelay::new();
    let mut sink = LogEventSink::new();

    // ── 6. Dispatch loop ──────────────────────────────────────
    match link {
        Ok(serial) => run(&config, app, serial, &mut analog, &mut delay, &mut sink),
        Err(e) => {
            // Keep the shutters in their safe state even without a host.
            error!("Command UART unavailable ({}); running without host link", e);
            run(&config, app, NullTransport, &mut analog, &mut delay, &mut sink)
        }
    }
}

fn run<T: Transport>(
    config: &SystemConfig,
    mut app: AppService<LedStrip, LedcIndicator>,
    mut serial: T,
    analog: &mut AdcInputs,
    delay: &mut SystemDelay,
    sink: &mut LogEventSink,
) -> ! {
    let serial_cfg = &config.serial;

    if serial_cfg.host_handshake {
        if let Err(e) = handshake::announce(
            &mut serial,
            delay,
            serial_cfg.line_ending,
            serial_cfg.handshake_timeout_ms,
        ) {
            warn!("Host handshake: {}", e);
        }
    }

    app.start(sink);

    if serial_cfg.host_handshake {
        if let Err(e) = handshake::ready(&mut serial, serial_cfg.line_ending) {
            warn!("Host handshake: {}", e);
        }
    }

    info!("System ready. Entering dispatch loop.");

    loop {
        app.tick(&mut serial, analog, delay, sink);
        delay.delay_ms(config.idle_delay_ms);
    }
}
