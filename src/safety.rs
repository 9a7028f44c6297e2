//! Link supervisor (disconnect watchdog).
//!
//! The supervisor runs **every poll after the decoder** and decides
//! whether the host is still there.  It never looks at what was received,
//! only *that* something was received.
//!
//! ## Lifecycle
//!
//! 1. Boot: no byte seen yet, the supervisor is disarmed and never trips.
//! 2. Any byte (command, heartbeat, noise) arms it and stamps `last_rx`.
//! 3. If `now - last_rx` exceeds the timeout, it trips once: the service
//!    forces the trigger `Off` and the supervisor disarms again.
//! 4. The next byte re-arms it.
//!
//! Elapsed time uses wrapping `u32` subtraction, so the 49.7-day rollover
//! of the millisecond counter neither causes nor hides a trip.

use log::warn;

pub struct LinkWatchdog {
    timeout_ms: u32,
    /// Time of the most recent byte; `None` until one arrives.
    last_rx_ms: Option<u32>,
}

impl LinkWatchdog {
    pub fn new(timeout_ms: u32) -> Self {
        Self {
            timeout_ms,
            last_rx_ms: None,
        }
    }

    /// Record traffic at `now_ms`.
    pub fn feed(&mut self, now_ms: u32) {
        self.last_rx_ms = Some(now_ms);
    }

    /// Evaluate the timeout.
    ///
    /// Returns `Some(silent_ms)` exactly once per silence that exceeds the
    /// timeout, and disarms.
    pub fn check(&mut self, now_ms: u32) -> Option<u32> {
        let last = self.last_rx_ms?;
        let silent_ms = now_ms.wrapping_sub(last);
        if silent_ms > self.timeout_ms {
            warn!("link silent for {} ms (limit {} ms)", silent_ms, self.timeout_ms);
            self.last_rx_ms = None;
            return Some(silent_ms);
        }
        None
    }

    /// True once a byte has arrived since boot or the last trip.
    pub fn is_armed(&self) -> bool {
        self.last_rx_ms.is_some()
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }
}
