//! Outbound operator-channel events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  The channel is one-way and
//! purely observational: nothing in the core reads an event back.

use crate::app::commands::Axis;
use crate::config::DecoderMode;
use crate::error::{MalformedCommand, OutOfRangeAngle, ServoError};
use crate::output::OutputState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The service finished startup and is about to enter the poll loop.
    Started { decoder: DecoderMode },

    /// An axis servo answered its probe and was switched to position mode.
    AxisReady { axis: Axis, servo_id: u8 },

    /// An axis servo did not answer; the axis stays uninitialized.
    AxisUnresponsive { axis: Axis, servo_id: u8 },

    /// A line could not be decoded. No state was changed.
    DecodeFailed(MalformedCommand),

    /// A requested angle was corrected to the nearest axis bound.
    AngleClamped(OutOfRangeAngle),

    /// A position was sent to an axis servo.
    AxisCommanded { axis: Axis, angle_deg: i32, position: u16 },

    /// Writing a position to a servo failed.
    ServoWriteFailed { axis: Axis, error: ServoError },

    /// The trigger output changed state.
    OutputChanged { from: OutputState, to: OutputState },

    /// No traffic for longer than the link timeout; output forced off.
    LinkLost { silent_ms: u32 },
}
