//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the dispatch rules for the shutter controller:
//! boot sequence, one poll-decode-dispatch pass per cycle, and the events
//! that describe what happened. All interaction with hardware happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
