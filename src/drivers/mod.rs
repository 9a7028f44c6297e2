//! Actuator drivers and the hardware task watchdog.

pub mod sts_bus;
pub mod trigger;
pub mod watchdog;
