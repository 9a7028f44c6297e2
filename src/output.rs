//! Trigger output state machine.
//!
//! ```text
//!            '1'              '2'
//!   ┌─────┐ ────▶ ┌────┐ ────────────▶ ┌──────────────────┐
//!   │ Off │       │ On │               │ Pulsing { until }│──┐ '2' restarts
//!   └─────┘ ◀──── └────┘ ◀──────────── └──────────────────┘◀─┘
//!      ▲     '0'          '1'                 │
//!      └──────────────────────────────────────┘
//!          '0', deadline reached, link lost
//! ```
//!
//! The pin is always the image of the state: `On` and `Pulsing` drive
//! HIGH, `Off` drives LOW.  Pulse expiry is a deadline compared on every
//! poll, so the decoder keeps draining input while the line is high.

use heapless::Vec;

use crate::app::commands::Command;
use crate::app::ports::TriggerPort;
use crate::config::PulseMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputState {
    Off,
    On,
    /// HIGH until the millisecond timestamp `until_ms` (wrapping clock).
    Pulsing { until_ms: u32 },
}

impl OutputState {
    /// Pin level this state demands.
    pub fn is_high(&self) -> bool {
        !matches!(self, Self::Off)
    }
}

/// A state change, reported to the operator channel by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: OutputState,
    pub to: OutputState,
}

/// Transitions caused by one command.  A blocking pulse yields two:
/// into `Pulsing` and back to `Off`.
pub type Transitions = Vec<Transition, 2>;

/// Wrap-safe `now >= deadline` for a `u32` millisecond clock.
///
/// Correct as long as the two instants are less than ~24.8 days apart.
pub fn deadline_reached(now_ms: u32, deadline_ms: u32) -> bool {
    (now_ms.wrapping_sub(deadline_ms) as i32) >= 0
}

pub struct OutputFsm {
    state: OutputState,
    mode: PulseMode,
    pulse_ms: u32,
}

impl OutputFsm {
    pub fn new(mode: PulseMode, pulse_ms: u32) -> Self {
        Self {
            state: OutputState::Off,
            mode,
            pulse_ms,
        }
    }

    pub fn state(&self) -> OutputState {
        self.state
    }

    /// Drive the pin to the boot state (LOW).
    pub fn init(&mut self, pin: &mut impl TriggerPort) {
        self.state = OutputState::Off;
        pin.set_level(false);
    }

    /// Apply one decoded command.
    pub fn apply(&mut self, cmd: &Command, now_ms: u32, pin: &mut impl TriggerPort) -> Transitions {
        let mut changes = Transitions::new();
        let next = match cmd {
            Command::DigitalOff => OutputState::Off,
            Command::DigitalOn => OutputState::On,
            Command::DigitalPulse => match self.mode {
                PulseMode::Deadline => OutputState::Pulsing {
                    until_ms: now_ms.wrapping_add(self.pulse_ms),
                },
                PulseMode::Blocking => {
                    if let Some(t) = self.pulse_blocking(now_ms, pin) {
                        // Capacity is two and this is the first push.
                        let _ = changes.push(t);
                    }
                    OutputState::Off
                }
            },
            Command::Heartbeat | Command::AxisMove { .. } | Command::Unknown => return changes,
        };
        if let Some(t) = self.enter(next, pin) {
            let _ = changes.push(t);
        }
        changes
    }

    /// End an expired pulse.  Call every poll, with or without input.
    pub fn tick(&mut self, now_ms: u32, pin: &mut impl TriggerPort) -> Option<Transition> {
        match self.state {
            OutputState::Pulsing { until_ms } if deadline_reached(now_ms, until_ms) => {
                self.enter(OutputState::Off, pin)
            }
            _ => None,
        }
    }

    /// Safe state, cancelling any pulse in flight.
    pub fn force_off(&mut self, pin: &mut impl TriggerPort) -> Option<Transition> {
        self.enter(OutputState::Off, pin)
    }

    fn enter(&mut self, next: OutputState, pin: &mut impl TriggerPort) -> Option<Transition> {
        // Always re-driven. A restarted pulse never dips LOW.
        pin.set_level(next.is_high());
        let from = self.state;
        self.state = next;
        (from != next).then_some(Transition { from, to: next })
    }

    /// LOW, HIGH, hold.  The caller's `enter(Off)` writes the final LOW.
    fn pulse_blocking(&mut self, now_ms: u32, pin: &mut impl TriggerPort) -> Option<Transition> {
        pin.set_level(false);
        let started = self.enter(
            OutputState::Pulsing {
                until_ms: now_ms.wrapping_add(self.pulse_ms),
            },
            pin,
        );
        pin.hold(self.pulse_ms);
        started
    }
}
