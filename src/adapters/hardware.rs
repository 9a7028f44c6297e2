//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the trigger driver and, on turret builds, the servo bus,
//! exposing them through [`TriggerPort`] and [`ServoBusPort`] so the
//! service can take both as a single `&mut`.  Trigger-only boards pass
//! `None` for the bus: every probe then fails and every write reports
//! [`ServoError::WriteFailed`].

use log::warn;

use crate::app::ports::{ServoBusPort, TriggerPort};
use crate::error::ServoError;

/// Concrete adapter that combines all actuators behind port traits.
pub struct HardwareAdapter<Trig, Bus> {
    trigger: Trig,
    servos: Option<Bus>,
}

impl<Trig: TriggerPort, Bus: ServoBusPort> HardwareAdapter<Trig, Bus> {
    pub fn new(trigger: Trig, servos: Option<Bus>) -> Self {
        Self { trigger, servos }
    }

    pub fn has_servo_bus(&self) -> bool {
        self.servos.is_some()
    }

    pub fn trigger(&self) -> &Trig {
        &self.trigger
    }

    pub fn servos_mut(&mut self) -> Option<&mut Bus> {
        self.servos.as_mut()
    }

    fn bus(&mut self) -> Result<&mut Bus, ServoError> {
        self.servos.as_mut().ok_or(ServoError::WriteFailed)
    }
}

// ── TriggerPort implementation ────────────────────────────────

impl<Trig: TriggerPort, Bus> TriggerPort for HardwareAdapter<Trig, Bus> {
    fn set_level(&mut self, high: bool) {
        self.trigger.set_level(high);
    }

    fn level(&self) -> bool {
        self.trigger.level()
    }

    fn hold(&mut self, ms: u32) {
        self.trigger.hold(ms);
    }
}

// ── ServoBusPort implementation ───────────────────────────────

impl<Trig: TriggerPort, Bus: ServoBusPort> ServoBusPort for HardwareAdapter<Trig, Bus> {
    fn ping(&mut self, id: u8) -> bool {
        match self.servos.as_mut() {
            Some(bus) => bus.ping(id),
            None => false,
        }
    }

    fn set_position_mode(&mut self, id: u8) -> Result<(), ServoError> {
        self.bus()?.set_position_mode(id)
    }

    fn enable_torque(&mut self, id: u8) -> Result<(), ServoError> {
        self.bus()?.enable_torque(id)
    }

    fn write_position(&mut self, id: u8, position: u16) -> Result<(), ServoError> {
        self.bus()
            .inspect_err(|_| warn!("position for servo {} dropped: no servo bus", id))?
            .write_position(id, position)
    }
}
