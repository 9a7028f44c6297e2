//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing each application event as one
//! tagged line to the ESP-IDF logger (UART / USB-CDC in production).
//! Tags group events by subsystem so a serial capture can be grepped:
//! `CMD` decoding, `AXIS` servos, `LINK` host link, `OUT` trigger.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { decoder } => {
                info!("START | decoder={:?}", decoder);
            }
            AppEvent::AxisReady { axis, servo_id } => {
                info!("AXIS | {} ready (servo {})", axis, servo_id);
            }
            AppEvent::AxisUnresponsive { axis, servo_id } => {
                warn!("AXIS | {} servo {} not responding, left uninitialized", axis, servo_id);
            }
            AppEvent::DecodeFailed(e) => {
                warn!("CMD | rejected: {}", e);
            }
            AppEvent::AngleClamped(c) => {
                info!("AXIS | {}", c);
            }
            AppEvent::AxisCommanded {
                axis,
                angle_deg,
                position,
            } => {
                info!("AXIS | {} -> {} deg (pos {})", axis, angle_deg, position);
            }
            AppEvent::ServoWriteFailed { axis, error } => {
                warn!("AXIS | {} write failed: {}", axis, error);
            }
            AppEvent::OutputChanged { from, to } => {
                info!("OUT | {:?} -> {:?}", from, to);
            }
            AppEvent::LinkLost { silent_ms } => {
                info!("LINK | silent {} ms, output forced off", silent_ms);
            }
        }
    }
}
