//! Shutter bank firmware library.
//!
//! Exposes the domain, protocol and adapter modules for integration
//! testing and for the firmware binary. All ESP-IDF-specific code is
//! guarded by `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

#[cfg(all(target_os = "espidf", not(feature = "espidf")))]
compile_error!("building for ESP-IDF requires the `espidf` feature");

pub mod app;
pub mod config;
pub mod error;
pub mod pins;
pub mod sensors;
pub mod serial;
pub mod shutter;

pub mod adapters;
pub mod drivers;
