//! Commands decoded from the host serial link.
//!
//! A [`Command`] is produced fresh on each decoder poll and consumed by the
//! [`AppService`](super::service::AppService) in the same iteration.
//! Nothing here is persisted.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Logical motion axis, each backed by one bus servo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Pan.
    X,
    /// Tilt.
    Y,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    /// Case-insensitive axis letter lookup.
    pub fn from_letter(b: u8) -> Option<Self> {
        match b.to_ascii_lowercase() {
            b'x' => Some(Self::X),
            b'y' => Some(Self::Y),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "X"),
            Self::Y => write!(f, "Y"),
        }
    }
}

/// One decoded host command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Drive the trigger line LOW.
    DigitalOff,
    /// Drive the trigger line HIGH until told otherwise.
    DigitalOn,
    /// Drive the trigger line HIGH for the configured pulse duration.
    DigitalPulse,
    /// Liveness only: refreshes the link watchdog, no output change.
    Heartbeat,
    /// Move an axis to a signed angle in degrees (clamped later).
    AxisMove { axis: Axis, angle_deg: i32 },
    /// A byte that is not part of the protocol. Still counts as traffic.
    Unknown,
}

impl Command {
    /// Single-byte protocol table: `'0'..='3'`, everything else is `None`.
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'0' => Some(Self::DigitalOff),
            b'1' => Some(Self::DigitalOn),
            b'2' => Some(Self::DigitalPulse),
            b'3' => Some(Self::Heartbeat),
            _ => None,
        }
    }
}
