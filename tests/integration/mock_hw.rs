//! Mock hardware adapter for integration tests.
//!
//! Records every port call so tests can assert on the full command
//! history without touching real GPIO or UART registers.

use std::collections::HashSet;

use turret::adapters::uart::UartTransport;
use turret::app::events::AppEvent;
use turret::app::ports::{EventSink, ServoBusPort, TriggerPort};
use turret::app::service::AppService;
use turret::config::SystemConfig;
use turret::error::ServoError;

// ── Port call record ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwCall {
    Level(bool),
    Hold(u32),
    Ping(u8),
    PositionMode(u8),
    Torque(u8),
    Position { id: u8, position: u16 },
}

// ── MockHardware ──────────────────────────────────────────────

#[derive(Default)]
pub struct MockHardware {
    pub calls: Vec<HwCall>,
    /// Servo ids that answer a ping.
    pub online: HashSet<u8>,
    /// When set, every position write fails with this error.
    pub write_error: Option<ServoError>,
    high: bool,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_servos(ids: &[u8]) -> Self {
        Self {
            online: ids.iter().copied().collect(),
            ..Self::default()
        }
    }

    pub fn is_high(&self) -> bool {
        self.high
    }

    /// Every position write attempted, in order.
    pub fn positions(&self) -> Vec<(u8, u16)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HwCall::Position { id, position } => Some((*id, *position)),
                _ => None,
            })
            .collect()
    }

    pub fn levels(&self) -> Vec<bool> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HwCall::Level(h) => Some(*h),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl TriggerPort for MockHardware {
    fn set_level(&mut self, high: bool) {
        self.high = high;
        self.calls.push(HwCall::Level(high));
    }

    fn level(&self) -> bool {
        self.high
    }

    fn hold(&mut self, ms: u32) {
        self.calls.push(HwCall::Hold(ms));
    }
}

impl ServoBusPort for MockHardware {
    fn ping(&mut self, id: u8) -> bool {
        self.calls.push(HwCall::Ping(id));
        self.online.contains(&id)
    }

    fn set_position_mode(&mut self, id: u8) -> Result<(), ServoError> {
        self.calls.push(HwCall::PositionMode(id));
        Ok(())
    }

    fn enable_torque(&mut self, id: u8) -> Result<(), ServoError> {
        self.calls.push(HwCall::Torque(id));
        Ok(())
    }

    fn write_position(&mut self, id: u8, position: u16) -> Result<(), ServoError> {
        self.calls.push(HwCall::Position { id, position });
        match self.write_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}

// ── Rig: service + mocks wired together ───────────────────────

pub struct Rig {
    pub app: AppService,
    pub link: UartTransport,
    pub hw: MockHardware,
    pub sink: RecordingSink,
}

#[allow(dead_code)]
impl Rig {
    /// Build and start a service with `hw` as its hardware.
    pub fn start(config: SystemConfig, mut hw: MockHardware) -> Self {
        let mut app = AppService::new(config).expect("valid config");
        let mut sink = RecordingSink::new();
        app.start(&mut hw, &mut sink);
        Self {
            app,
            link: UartTransport::loopback(),
            hw,
            sink,
        }
    }

    pub fn send(&mut self, bytes: &[u8]) {
        self.link.inject(bytes);
    }

    pub fn poll(&mut self, now_ms: u32) {
        self.app
            .poll(now_ms, &mut self.link, &mut self.hw, &mut self.sink);
    }

    /// Queue `bytes` and run one poll at `now_ms`.
    pub fn send_and_poll(&mut self, bytes: &[u8], now_ms: u32) {
        self.send(bytes);
        self.poll(now_ms);
    }
}
