//! Delay and uptime adapter.
//!
//! - **`target_os = "espidf"`** — `esp_idf_hal::delay::Delay` (busy-wait
//!   for short spans, FreeRTOS delay for long ones) and
//!   `esp_timer_get_time()` for uptime.
//! - **`not(target_os = "espidf")`** — `std::thread::sleep` and
//!   `std::time::Instant` for host-side simulation.

use embedded_hal::delay::DelayNs;

pub struct SystemDelay {
    #[cfg(target_os = "espidf")]
    inner: esp_idf_hal::delay::Delay,
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for SystemDelay {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemDelay {
    pub fn new() -> Self {
        Self {
            #[cfg(target_os = "espidf")]
            inner: esp_idf_hal::delay::Delay::new_default(),
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Milliseconds since boot (monotonic).
    #[cfg(target_os = "espidf")]
    pub fn uptime_ms(&self) -> u64 {
        // SAFETY: esp_timer_get_time is a read of the monotonic timer.
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64 / 1_000
    }

    /// Milliseconds since construction (monotonic).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl DelayNs for SystemDelay {
    #[cfg(target_os = "espidf")]
    fn delay_ns(&mut self, ns: u32) {
        self.inner.delay_ns(ns);
    }

    #[cfg(not(target_os = "espidf"))]
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }

    #[cfg(target_os = "espidf")]
    fn delay_ms(&mut self, ms: u32) {
        self.inner.delay_ms(ms);
    }
}
