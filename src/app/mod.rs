//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the rules of the command interpreter: decoding
//! results are turned into trigger transitions, watchdog refreshes, and
//! axis moves.  All interaction with hardware happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
