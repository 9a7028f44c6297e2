//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the decoder, the trigger output state, the link
//! watchdog, and the axis mapper.  It exposes a hardware-agnostic API;
//! all I/O flows through port traits injected at call sites, so the whole
//! service runs against mock adapters on the host.
//!
//! ```text
//!   Transport ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                 │          AppService          │
//! TriggerPort ◀── │ Decoder · Output · Watchdog  │
//! ServoBusPort ◀──│ AxisMapper                   │
//!                 └──────────────────────────────┘
//! ```

use log::{debug, info, warn};

use crate::config::SystemConfig;
use crate::control::axis::AxisMapper;
use crate::error::Result;
use crate::output::{OutputFsm, OutputState, Transition};
use crate::protocol::decoder::CommandDecoder;
use crate::protocol::transport::Transport;
use crate::safety::LinkWatchdog;

use super::commands::{Axis, Command};
use super::events::AppEvent;
use super::ports::{EventSink, ServoBusPort, TriggerPort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

pub struct AppService {
    config: SystemConfig,
    decoder: CommandDecoder,
    output: OutputFsm,
    watchdog: LinkWatchdog,
    axes: AxisMapper,
    /// Per-axis result of the startup probe, indexed by [`Axis::index`].
    axis_ready: [bool; 2],
    poll_count: u64,
    bytes_received: u64,
}

impl AppService {
    /// Construct the service from a validated configuration.
    ///
    /// Does **not** touch hardware; call [`start`](Self::start) next.
    pub fn new(config: SystemConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            decoder: CommandDecoder::new(config.decoder),
            output: OutputFsm::new(config.pulse, config.pulse_duration_ms),
            watchdog: LinkWatchdog::new(config.link_timeout_ms),
            axes: AxisMapper::new(&config),
            axis_ready: [false; 2],
            poll_count: 0,
            bytes_received: 0,
            config,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive the trigger LOW and bring up the axis servos.
    ///
    /// An axis whose servo does not answer is left uninitialized; startup
    /// carries on regardless.
    pub fn start(
        &mut self,
        hw: &mut (impl TriggerPort + ServoBusPort),
        sink: &mut impl EventSink,
    ) {
        self.output.init(hw);

        if self.config.servo_bus_enabled {
            for axis in Axis::ALL {
                self.init_axis(axis, hw, sink);
            }
        } else {
            debug!("servo bus disabled, skipping axis init");
        }

        sink.emit(&AppEvent::Started {
            decoder: self.decoder.mode(),
        });
        info!(
            "AppService started: decoder={:?} pulse={:?}/{} ms link_timeout={} ms",
            self.config.decoder,
            self.config.pulse,
            self.config.pulse_duration_ms,
            self.watchdog.timeout_ms(),
        );
    }

    fn init_axis(&mut self, axis: Axis, bus: &mut impl ServoBusPort, sink: &mut impl EventSink) {
        let servo_id = self.axes.config(axis).servo_id;
        if !bus.ping(servo_id) {
            sink.emit(&AppEvent::AxisUnresponsive { axis, servo_id });
            return;
        }
        let configured = bus
            .set_position_mode(servo_id)
            .and_then(|()| bus.enable_torque(servo_id));
        match configured {
            Ok(()) => {
                self.axis_ready[axis.index()] = true;
                sink.emit(&AppEvent::AxisReady { axis, servo_id });
            }
            Err(error) => {
                warn!("axis {} servo {} setup failed: {}", axis, servo_id, error);
                sink.emit(&AppEvent::AxisUnresponsive { axis, servo_id });
            }
        }
    }

    // ── Per-poll orchestration ────────────────────────────────

    /// Run one loop iteration: decode → apply → pulse deadline → watchdog.
    ///
    /// The `hw` parameter satisfies **both** [`TriggerPort`] and
    /// [`ServoBusPort`]; this avoids a double mutable borrow while keeping
    /// the port boundary explicit.
    pub fn poll(
        &mut self,
        now_ms: u32,
        link: &mut impl Transport,
        hw: &mut (impl TriggerPort + ServoBusPort),
        sink: &mut impl EventSink,
    ) {
        self.poll_count += 1;

        // 1. Decode at most one command
        let decoded = self.decoder.poll(link);
        if decoded.received() {
            self.bytes_received += decoded.bytes as u64;
            self.watchdog.feed(now_ms);
        }

        // 2. Apply it
        match decoded.outcome {
            Some(Ok(cmd)) => self.handle_command(cmd, now_ms, hw, sink),
            Some(Err(e)) => sink.emit(&AppEvent::DecodeFailed(e)),
            None => {}
        }

        // 3. Pulse deadline, whether or not anything arrived
        let expired = self.output.tick(now_ms, hw);
        Self::report(expired, sink);

        // 4. Disconnect watchdog
        if let Some(silent_ms) = self.watchdog.check(now_ms) {
            let forced = self.output.force_off(hw);
            sink.emit(&AppEvent::LinkLost { silent_ms });
            Self::report(forced, sink);
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Apply one decoded command.
    pub fn handle_command(
        &mut self,
        cmd: Command,
        now_ms: u32,
        hw: &mut (impl TriggerPort + ServoBusPort),
        sink: &mut impl EventSink,
    ) {
        match cmd {
            Command::DigitalOff | Command::DigitalOn | Command::DigitalPulse => {
                for change in self.output.apply(&cmd, now_ms, hw) {
                    Self::report(Some(change), sink);
                }
            }
            Command::AxisMove { axis, angle_deg } => self.move_axis(axis, angle_deg, hw, sink),
            // Refreshing the watchdog already happened in the decoder step.
            Command::Heartbeat | Command::Unknown => {}
        }
    }

    fn move_axis(
        &mut self,
        axis: Axis,
        angle_deg: i32,
        bus: &mut impl ServoBusPort,
        sink: &mut impl EventSink,
    ) {
        let target = self.axes.map(axis, angle_deg);
        if let Some(clamp) = target.clamped {
            sink.emit(&AppEvent::AngleClamped(clamp));
        }
        if !self.axis_ready[axis.index()] {
            debug!("axis {} not initialized, sending anyway", axis);
        }

        let servo_id = self.axes.config(axis).servo_id;
        match bus.write_position(servo_id, target.position) {
            Ok(()) => sink.emit(&AppEvent::AxisCommanded {
                axis,
                angle_deg: target.angle_deg,
                position: target.position,
            }),
            Err(error) => sink.emit(&AppEvent::ServoWriteFailed { axis, error }),
        }
    }

    fn report(change: Option<Transition>, sink: &mut impl EventSink) {
        if let Some(Transition { from, to }) = change {
            sink.emit(&AppEvent::OutputChanged { from, to });
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn output_state(&self) -> OutputState {
        self.output.state()
    }

    /// Whether `axis` answered its startup probe and accepted position mode.
    pub fn axis_ready(&self, axis: Axis) -> bool {
        self.axis_ready[axis.index()]
    }

    /// True while the watchdog is tracking a live host.
    pub fn link_armed(&self) -> bool {
        self.watchdog.is_armed()
    }

    /// Loop iterations executed since startup.
    pub fn poll_count(&self) -> u64 {
        self.poll_count
    }

    /// Total bytes taken off the command link.
    pub fn bytes_received(&self) -> u64 {
        self.bytes_received
    }
}
