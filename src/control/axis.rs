//! Axis position mapper.
//!
//! Converts a signed angle in degrees into raw servo position units:
//!
//! ```text
//! position = round((±angle + 180) * scale / 360)
//! ```
//!
//! The sign is negative for servos mounted upside down (`inverted`).
//! Angles outside the axis domain are clamped to the nearest bound and the
//! clamp is returned alongside the result so the caller can report it.
//! The mapping is total: it never fails.

use serde::{Deserialize, Serialize};

use crate::app::commands::Axis;
use crate::config::SystemConfig;
use crate::error::{Error, OutOfRangeAngle, Result};

/// Mechanical limits and wiring of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisConfig {
    pub min_deg: i32,
    pub max_deg: i32,
    /// Bus id of the servo driving this axis.
    pub servo_id: u8,
    /// Servo mounted reversed: positive angles decrease position.
    pub inverted: bool,
}

impl AxisConfig {
    pub const fn new(min_deg: i32, max_deg: i32, servo_id: u8, inverted: bool) -> Self {
        Self {
            min_deg,
            max_deg,
            servo_id,
            inverted,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_deg >= self.max_deg {
            return Err(Error::Config("axis min_deg must be below max_deg"));
        }
        if self.min_deg < -180 || self.max_deg > 180 {
            return Err(Error::Config("axis domain must lie within [-180, 180]"));
        }
        Ok(())
    }

    /// Clamp into `[min_deg, max_deg]`.
    pub fn clamp(&self, angle_deg: i32) -> i32 {
        angle_deg.clamp(self.min_deg, self.max_deg)
    }
}

/// Outcome of mapping one requested angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisTarget {
    pub axis: Axis,
    /// Angle actually used, after clamping.
    pub angle_deg: i32,
    pub position: u16,
    /// Present when the request was outside the domain.
    pub clamped: Option<OutOfRangeAngle>,
}

/// Both axes plus the shared full-turn scale.  Immutable after startup.
#[derive(Debug, Clone, Copy)]
pub struct AxisMapper {
    scale: u16,
    axes: [AxisConfig; 2],
}

impl AxisMapper {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            scale: config.servo_scale,
            axes: [config.axis_x, config.axis_y],
        }
    }

    pub fn config(&self, axis: Axis) -> &AxisConfig {
        &self.axes[axis.index()]
    }

    /// Clamp and convert `angle_deg` for `axis`.
    pub fn map(&self, axis: Axis, angle_deg: i32) -> AxisTarget {
        let cfg = self.config(axis);
        let used = cfg.clamp(angle_deg);
        let clamped = (used != angle_deg).then_some(OutOfRangeAngle {
            axis,
            requested_deg: angle_deg,
            clamped_deg: used,
        });
        AxisTarget {
            axis,
            angle_deg: used,
            position: degrees_to_units(used, cfg.inverted, self.scale),
            clamped,
        }
    }
}

/// Clamp `angle_deg` into the axis domain and convert it to servo units.
pub fn angle_to_position(cfg: &AxisConfig, scale: u16, angle_deg: i32) -> u16 {
    degrees_to_units(cfg.clamp(angle_deg), cfg.inverted, scale)
}

/// `round((±angle + 180) * scale / 360)` in integer arithmetic, half-up.
///
/// `angle_deg` must already lie in `[-180, 180]`.
pub fn degrees_to_units(angle_deg: i32, inverted: bool, scale: u16) -> u16 {
    let signed = if inverted { -angle_deg } else { angle_deg };
    let offset = (signed + 180).clamp(0, 360) as u32;
    ((2 * offset * u32::from(scale) + 360) / 720) as u16
}
