//! Trigger line driver.
//!
//! A single push-pull GPIO, HIGH = firing.  Generic over the
//! `embedded-hal` 1.0 traits so the same driver runs on an
//! `esp_idf_hal::gpio::PinDriver` in firmware and on a mock pin in tests.
//!
//! ## Safety contract
//!
//! The driver is a dumb actuator: it never decides when to fire.  A pin
//! error is logged and the cached level is still updated, so the next
//! command re-drives the line.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::error;

use crate::app::ports::TriggerPort;

pub struct TriggerDriver<P: OutputPin, D: DelayNs> {
    pin: P,
    delay: D,
    high: bool,
}

impl<P: OutputPin, D: DelayNs> TriggerDriver<P, D> {
    /// Take ownership of the pin and drive it LOW immediately.
    pub fn new(pin: P, delay: D) -> Self {
        let mut driver = Self {
            pin,
            delay,
            high: true,
        };
        driver.set_level(false);
        driver
    }

    /// Give the pin and delay back (e.g. to inspect a mock in tests).
    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }
}

impl<P: OutputPin, D: DelayNs> TriggerPort for TriggerDriver<P, D> {
    fn set_level(&mut self, high: bool) {
        let res = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        if let Err(e) = res {
            error!("trigger: failed to drive {}: {:?}", if high { "HIGH" } else { "LOW" }, e);
        }
        self.high = high;
    }

    fn level(&self) -> bool {
        self.high
    }

    fn hold(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
