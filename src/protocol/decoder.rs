//! Command decoder: turns pending link bytes into at most one command per poll.
//!
//! Three framings share one entry point, selected by [`DecoderMode`]:
//!
//! | Mode         | Reads per poll            | Effective command            |
//! |--------------|---------------------------|------------------------------|
//! | `SingleByte` | one byte                  | that byte (or `Unknown`)     |
//! | `BurstDrain` | everything pending        | last recognised byte only    |
//! | `Line`       | up to one `'\n'`          | the parsed line              |
//!
//! Burst draining collapses `"1" "0" "2"` into `'2'`.  Commands are levels,
//! not toggles, so only the newest one matters.

use crate::app::commands::Command;
use crate::config::DecoderMode;
use crate::error::MalformedCommand;

use super::line::LineAccumulator;
use super::transport::{Transport, read_byte};

/// Line mode: upper bound on bytes consumed in one poll while looking for
/// a terminator.
pub const MAX_BYTES_PER_POLL: usize = 256;

/// Burst mode: hard stop for the drain loop, well above the UART RX ring,
/// so only a link that never runs dry can reach it.
pub const BURST_DRAIN_LIMIT: usize = 8 * 1024;

const DRAIN_CHUNK: usize = 16;

/// Result of one decoder poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodePoll {
    /// Bytes taken off the link this poll.  Non-zero means the host is alive.
    pub bytes: usize,
    /// The effective command, or the reason a completed line was rejected.
    pub outcome: Option<Result<Command, MalformedCommand>>,
}

impl DecodePoll {
    pub const IDLE: Self = Self {
        bytes: 0,
        outcome: None,
    };

    pub fn received(&self) -> bool {
        self.bytes > 0
    }
}

pub struct CommandDecoder {
    mode: DecoderMode,
    line: LineAccumulator,
}

impl CommandDecoder {
    pub fn new(mode: DecoderMode) -> Self {
        Self {
            mode,
            line: LineAccumulator::new(),
        }
    }

    pub fn mode(&self) -> DecoderMode {
        self.mode
    }

    /// Consume pending bytes from `link` according to the configured mode.
    pub fn poll<T: Transport>(&mut self, link: &mut T) -> DecodePoll {
        match self.mode {
            DecoderMode::SingleByte => Self::poll_single(link),
            DecoderMode::BurstDrain => Self::poll_burst(link),
            DecoderMode::Line => self.poll_line(link),
        }
    }

    fn poll_single<T: Transport>(link: &mut T) -> DecodePoll {
        match read_byte(link) {
            Some(b) => DecodePoll {
                bytes: 1,
                outcome: Some(Ok(Command::from_byte(b).unwrap_or(Command::Unknown))),
            },
            None => DecodePoll::IDLE,
        }
    }

    fn poll_burst<T: Transport>(link: &mut T) -> DecodePoll {
        let mut chunk = [0u8; DRAIN_CHUNK];
        let mut bytes = 0;
        let mut last = None;

        // Drain until the link is empty; only the newest command applies.
        while bytes < BURST_DRAIN_LIMIT {
            let n = match link.read(&mut chunk, 0) {
                Ok(n) => n,
                Err(e) => {
                    log::warn!("decoder: link read failed: {:?}", e);
                    break;
                }
            };
            if n == 0 {
                break;
            }
            bytes += n;
            if let Some(cmd) = chunk[..n].iter().rev().find_map(|&b| Command::from_byte(b)) {
                last = Some(cmd);
            }
        }

        if bytes == 0 {
            return DecodePoll::IDLE;
        }
        if bytes >= BURST_DRAIN_LIMIT {
            log::warn!("decoder: drain limit hit, link never ran dry");
        }
        if bytes > 1 {
            log::debug!("decoder: drained {} bytes, keeping {:?}", bytes, last);
        }
        DecodePoll {
            bytes,
            outcome: Some(Ok(last.unwrap_or(Command::Unknown))),
        }
    }

    fn poll_line<T: Transport>(&mut self, link: &mut T) -> DecodePoll {
        let mut bytes = 0;
        while bytes < MAX_BYTES_PER_POLL {
            let Some(b) = read_byte(link) else { break };
            bytes += 1;
            if let Some(outcome) = self.line.push(b) {
                // One line per poll; the rest stays queued in the UART.
                return DecodePoll {
                    bytes,
                    outcome: Some(outcome),
                };
            }
        }
        DecodePoll {
            bytes,
            outcome: None,
        }
    }
}
