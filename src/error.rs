//! Unified error types for the turret firmware.
//!
//! Every subsystem has its own small `Copy` enum and converts into the
//! top-level [`Error`].  None of these are fatal inside the control loop:
//! the service reports them through the event sink and keeps polling.

use core::fmt;

use crate::app::commands::Axis;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An inbound line or token could not be decoded.
    Malformed(MalformedCommand),
    /// A requested angle was outside the axis domain and was clamped.
    OutOfRange(OutOfRangeAngle),
    /// A servo did not answer the startup probe.
    ActuatorUnresponsive { axis: Axis, servo_id: u8 },
    /// A servo bus transaction failed.
    Servo(ServoError),
    /// Configuration failed validation.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(e) => write!(f, "malformed command: {e}"),
            Self::OutOfRange(e) => write!(f, "out of range: {e}"),
            Self::ActuatorUnresponsive { axis, servo_id } => {
                write!(f, "axis {axis} servo {servo_id} not responding")
            }
            Self::Servo(e) => write!(f, "servo bus: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Decode failures
// ---------------------------------------------------------------------------

/// Why a line-protocol command was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedCommand {
    /// No space or tab between the axis letter and the angle (`"x"`, `"x45"`).
    /// A blank remainder (`"x "`) trims down to this case as well.
    MissingSeparator,
    /// Angle is not a base-10 integer (`"x abc"`, `"x 4.5"`).
    InvalidAngle,
    /// Axis token is not `x`/`y` (carries the first byte of the token).
    UnknownAxis(u8),
    /// Line exceeded the receive buffer before its terminator.
    LineTooLong,
}

impl fmt::Display for MalformedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSeparator => write!(f, "missing separator"),
            Self::InvalidAngle => write!(f, "angle is not an integer"),
            Self::UnknownAxis(b) if b.is_ascii_graphic() => {
                write!(f, "unknown axis '{}'", *b as char)
            }
            Self::UnknownAxis(b) => write!(f, "unknown axis 0x{b:02X}"),
            Self::LineTooLong => write!(f, "line too long"),
        }
    }
}

impl From<MalformedCommand> for Error {
    fn from(e: MalformedCommand) -> Self {
        Self::Malformed(e)
    }
}

// ---------------------------------------------------------------------------
// Clamp record
// ---------------------------------------------------------------------------

/// A requested angle and the bound it was clamped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfRangeAngle {
    pub axis: Axis,
    pub requested_deg: i32,
    pub clamped_deg: i32,
}

impl fmt::Display for OutOfRangeAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "axis {} angle {} clamped to {}",
            self.axis, self.requested_deg, self.clamped_deg
        )
    }
}

impl From<OutOfRangeAngle> for Error {
    fn from(e: OutOfRangeAngle) -> Self {
        Self::OutOfRange(e)
    }
}

// ---------------------------------------------------------------------------
// Servo bus errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServoError {
    /// The transport refused or truncated the outgoing packet.
    WriteFailed,
    /// No (or a short) status packet arrived before the reply timeout.
    Timeout,
    /// Status packet checksum did not match.
    Checksum,
    /// Status packet came from a different id or had a bad header.
    BadReply,
    /// The servo answered with a non-zero error byte.
    Status(u8),
}

impl fmt::Display for ServoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteFailed => write!(f, "write failed"),
            Self::Timeout => write!(f, "reply timeout"),
            Self::Checksum => write!(f, "reply checksum mismatch"),
            Self::BadReply => write!(f, "malformed reply"),
            Self::Status(bits) => write!(f, "servo status 0b{bits:08b}"),
        }
    }
}

impl From<ServoError> for Error {
    fn from(e: ServoError) -> Self {
        Self::Servo(e)
    }
}

impl core::error::Error for Error {}
impl core::error::Error for MalformedCommand {}
impl core::error::Error for OutOfRangeAngle {}
impl core::error::Error for ServoError {}

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
