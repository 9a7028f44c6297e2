//! Turret firmware library.
//!
//! Exposes the pure-logic modules for integration testing and the
//! firmware binary. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod output;
pub mod protocol;
pub mod safety;

// Hardware-facing modules; each carries its own host fallback.
pub mod adapters;
pub mod drivers;
pub mod pins;
