//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (trigger pin, servo bus, event sinks) implement these
//! traits.  The [`AppService`](super::service::AppService) consumes them via
//! generics, so the domain core never touches hardware directly.  The
//! inbound byte stream uses [`Transport`](crate::protocol::transport::Transport).

use crate::error::ServoError;

// ───────────────────────────────────────────────────────────────
// Trigger port (driven adapter: domain → GPIO)
// ───────────────────────────────────────────────────────────────

/// The single digital output line.
pub trait TriggerPort {
    /// Drive the line HIGH (`true`) or LOW (`false`).
    fn set_level(&mut self, high: bool);

    /// Last level driven onto the line.
    fn level(&self) -> bool;

    /// Busy-wait for `ms` milliseconds with the line untouched.
    ///
    /// Only the blocking pulse variant calls this.
    fn hold(&mut self, ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Servo bus port (driven adapter: domain → actuator driver)
// ───────────────────────────────────────────────────────────────

/// Primitives the axis mapper needs from a position-controlled servo driver.
pub trait ServoBusPort {
    /// Returns `true` if a servo with this id answers on the bus.
    fn ping(&mut self, id: u8) -> bool;

    /// Switch the servo to closed-loop position control.
    fn set_position_mode(&mut self, id: u8) -> Result<(), ServoError>;

    /// Energise the servo so it holds and tracks its goal position.
    fn enable_torque(&mut self, id: u8) -> Result<(), ServoError>;

    /// Command a goal position in raw servo units.
    fn write_position(&mut self, id: u8, position: u16) -> Result<(), ServoError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → operator channel)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log,
/// test recorder, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
