//! System configuration parameters
//!
//! All tunable parameters for the turret firmware.  The configuration is
//! fixed at startup; [`SystemConfig::validate`] runs before the service is
//! built so a bad combination never reaches the poll loop.

use serde::{Deserialize, Serialize};

use crate::control::axis::AxisConfig;
use crate::error::{Error, Result};

/// How inbound bytes are framed into commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecoderMode {
    /// One byte per poll, each byte is a command.
    SingleByte,
    /// Drain everything pending, apply only the last command byte.
    BurstDrain,
    /// Newline-terminated text lines with axis moves.
    Line,
}

/// How a `'2'` pulse is timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PulseMode {
    /// Deadline checked every poll; input keeps draining during the pulse.
    Deadline,
    /// LOW → HIGH → delay → LOW inside the poll.  Single-byte decoder only.
    Blocking,
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Command link ---
    pub decoder: DecoderMode,
    /// Host link baud rate.
    pub command_baud: u32,

    // --- Trigger ---
    pub pulse: PulseMode,
    /// HIGH time of a `'2'` pulse (milliseconds).
    pub pulse_duration_ms: u32,

    // --- Safety ---
    /// Silence on the host link after which the trigger is forced off.
    pub link_timeout_ms: u32,
    /// Hardware task watchdog: reset if one loop iteration stalls this long.
    pub loop_stall_timeout_ms: u32,

    // --- Servos ---
    /// Probe and drive the bus servos.  Off for trigger-only boards.
    pub servo_bus_enabled: bool,
    pub servo_baud: u32,
    /// How long to wait for a servo status packet (milliseconds).
    pub servo_reply_timeout_ms: u32,
    /// Position units per full turn (4095 for a 12-bit STS servo).
    pub servo_scale: u16,
    pub axis_x: AxisConfig,
    pub axis_y: AxisConfig,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self::turret()
    }
}

impl SystemConfig {
    /// Pan/tilt turret: line protocol, non-blocking pulse, both axes.
    pub fn turret() -> Self {
        Self {
            decoder: DecoderMode::Line,
            command_baud: 9_600,

            pulse: PulseMode::Deadline,
            pulse_duration_ms: 100,

            link_timeout_ms: 500,
            loop_stall_timeout_ms: 5_000,

            servo_bus_enabled: true,
            servo_baud: 1_000_000,
            servo_reply_timeout_ms: 10,
            servo_scale: 4095,
            // Pan servo is mounted upside down.
            axis_x: AxisConfig::new(-90, 90, 1, true),
            axis_y: AxisConfig::new(-20, 90, 2, false),
        }
    }

    /// Trigger only, one byte per poll, blocking pulse.
    pub fn trigger_basic() -> Self {
        Self {
            decoder: DecoderMode::SingleByte,
            pulse: PulseMode::Blocking,
            servo_bus_enabled: false,
            ..Self::turret()
        }
    }

    /// Trigger only, hardened against pasted floods: burst drain,
    /// deadline pulse, longer link timeout.
    pub fn trigger_flood_safe() -> Self {
        Self {
            decoder: DecoderMode::BurstDrain,
            pulse: PulseMode::Deadline,
            link_timeout_ms: 800,
            servo_bus_enabled: false,
            ..Self::turret()
        }
    }

    /// Reject combinations the control loop cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.pulse_duration_ms == 0 {
            return Err(Error::Config("pulse_duration_ms must be non-zero"));
        }
        if self.link_timeout_ms == 0 {
            return Err(Error::Config("link_timeout_ms must be non-zero"));
        }
        if self.pulse == PulseMode::Blocking && self.decoder != DecoderMode::SingleByte {
            return Err(Error::Config(
                "blocking pulse would stall input draining; use PulseMode::Deadline",
            ));
        }
        if self.command_baud == 0 || self.servo_baud == 0 {
            return Err(Error::Config("baud rates must be non-zero"));
        }
        if self.servo_scale == 0 {
            return Err(Error::Config("servo_scale must be non-zero"));
        }
        self.axis_x.validate()?;
        self.axis_y.validate()?;
        if self.axis_x.servo_id == self.axis_y.servo_id {
            return Err(Error::Config("axes must use distinct servo ids"));
        }
        Ok(())
    }
}
