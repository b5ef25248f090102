//! UART transport for the host command link.
//!
//! - **`target_os = "espidf"`** — ESP-IDF UART driver (installed by
//!   [`hw_init::init_uart`](crate::drivers::hw_init::init_uart)); reads
//!   never block, writes go into the driver's TX ring.
//! - **`not(target_os = "espidf")`** — in-memory RX queue and TX buffer
//!   with a configurable free-space figure, for host tests.

#[cfg(not(target_os = "espidf"))]
use std::collections::VecDeque;

use crate::config::SerialConfig;
use crate::drivers::hw_init;
use crate::error;
use crate::serial::transport::Transport;

/// Transport error: the raw `esp_err_t` (always 0 on the host).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UartError(pub i32);

pub struct UartTransport {
    #[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
    port: u8,
    #[cfg(not(target_os = "espidf"))]
    rx: VecDeque<u8>,
    #[cfg(not(target_os = "espidf"))]
    tx: Vec<u8>,
    #[cfg(not(target_os = "espidf"))]
    tx_capacity: usize,
}

impl UartTransport {
    /// Install the driver and configure the port from `serial`.
    #[cfg(target_os = "espidf")]
    pub fn open(serial: &SerialConfig) -> error::Result<Self> {
        hw_init::init_uart(serial.uart_port, serial.baud_rate)
            .inspect_err(|e| log::error!("UartTransport: {}", e))?;
        Ok(Self { port: serial.uart_port })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn open(serial: &SerialConfig) -> error::Result<Self> {
        log::info!(
            "UartTransport(sim): UART{} at {} baud",
            serial.uart_port,
            serial.baud_rate
        );
        Ok(Self {
            port: serial.uart_port,
            rx: VecDeque::new(),
            tx: Vec::new(),
            tx_capacity: hw_init::UART_TX_BUF as usize,
        })
    }

    /// Queue bytes as if the host had sent them.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_push_rx(&mut self, data: &[u8]) {
        self.rx.extend(data.iter().copied());
    }

    /// Take everything written so far.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_take_tx(&mut self) -> Vec<u8> {
        core::mem::take(&mut self.tx)
    }

    /// Override the reported free TX space.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_set_tx_capacity(&mut self, bytes: usize) {
        self.tx_capacity = bytes;
    }
}

#[cfg(target_os = "espidf")]
impl Transport for UartTransport {
    type Error = UartError;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, UartError> {
        // SAFETY: driver installed in open(); zero-tick timeout never blocks.
        let n = unsafe {
            esp_idf_svc::sys::uart_read_bytes(
                self.port as esp_idf_svc::sys::uart_port_t,
                buf.as_mut_ptr() as *mut _,
                buf.len() as u32,
                0,
            )
        };
        if n < 0 { Err(UartError(n)) } else { Ok(n as usize) }
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, UartError> {
        // SAFETY: driver installed in open(); copies into the TX ring.
        let n = unsafe {
            esp_idf_svc::sys::uart_write_bytes(
                self.port as esp_idf_svc::sys::uart_port_t,
                data.as_ptr() as *const _,
                data.len(),
            )
        };
        if n < 0 { Err(UartError(n)) } else { Ok(n as usize) }
    }

    fn flush(&mut self) -> Result<(), UartError> {
        // Output leaves through the driver's TX ring; nothing to force.
        Ok(())
    }

    fn available(&self) -> bool {
        let mut len: usize = 0;
        // SAFETY: read-only query on an installed driver.
        let ret = unsafe {
            esp_idf_svc::sys::uart_get_buffered_data_len(
                self.port as esp_idf_svc::sys::uart_port_t,
                &mut len,
            )
        };
        ret == esp_idf_svc::sys::ESP_OK as i32 && len > 0
    }

    fn write_capacity(&self) -> usize {
        let mut free: usize = 0;
        // SAFETY: read-only query on an installed driver.
        let ret = unsafe {
            esp_idf_svc::sys::uart_get_tx_buffer_free_size(
                self.port as esp_idf_svc::sys::uart_port_t,
                &mut free,
            )
        };
        if ret == esp_idf_svc::sys::ESP_OK as i32 { free } else { 0 }
    }
}

#[cfg(not(target_os = "espidf"))]
impl Transport for UartTransport {
    type Error = UartError;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, UartError> {
        let n = buf.len().min(self.rx.len());
        for (slot, byte) in buf.iter_mut().zip(self.rx.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, UartError> {
        self.tx.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), UartError> {
        Ok(())
    }

    fn available(&self) -> bool {
        !self.rx.is_empty()
    }

    fn write_capacity(&self) -> usize {
        self.tx_capacity
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;
    use crate::config::SystemConfig;

    #[test]
    fn open_returns_firmware_result() {
        let opened: error::Result<UartTransport> = UartTransport::open(&SystemConfig::default().serial);
        assert!(opened.is_ok());
    }

    #[test]
    fn loops_bytes_through_sim_buffers() {
        let mut uart = UartTransport::open(&SystemConfig::default().serial).unwrap();
        uart.sim_push_rx(b"16\n");
        assert!(uart.available());
        let mut buf = [0u8; 8];
        assert_eq!(uart.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], b"16\n");
        assert!(!uart.available());

        uart.write(b"READY").unwrap();
        assert_eq!(uart.sim_take_tx(), b"READY");
        assert!(uart.sim_take_tx().is_empty());
    }
}
