//! Newline-terminated text protocol.
//!
//! Grammar (after trimming ASCII whitespace, `'\r'` included):
//! ```text
//! line  := digit | axis SEP angle
//! digit := "0" | "1" | "2" | "3"
//! axis  := "x" | "X" | "y" | "Y"
//! SEP   := first ' ' or '\t'
//! angle := optional sign, base-10 integer (surrounding blanks ignored)
//! ```
//!
//! The accumulator handles partial reads gracefully: bytes may arrive
//! one at a time across many polls.  Lines that overflow the fixed buffer
//! are dropped up to the next terminator and reported once.

use heapless::Vec;

use crate::app::commands::{Axis, Command};
use crate::error::MalformedCommand;

/// Longest accepted line, terminator excluded.  `"y -180"` needs six.
pub const LINE_CAPACITY: usize = 32;

const TERMINATOR: u8 = b'\n';

/// Accumulator state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineState {
    /// Appending bytes to the buffer.
    Collecting,
    /// Buffer overflowed; skipping to the next terminator.
    Discarding,
}

/// Streaming line accumulator.
pub struct LineAccumulator {
    state: LineState,
    buf: Vec<u8, LINE_CAPACITY>,
}

impl Default for LineAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl LineAccumulator {
    pub fn new() -> Self {
        Self {
            state: LineState::Collecting,
            buf: Vec::new(),
        }
    }

    /// Feed one byte.
    ///
    /// Returns `Some` when a terminator completes a non-empty line: the
    /// decoded command, or the reason it was rejected.  Empty lines are
    /// swallowed.
    pub fn push(&mut self, byte: u8) -> Option<Result<Command, MalformedCommand>> {
        if byte == TERMINATOR {
            let overflowed = self.state == LineState::Discarding;
            self.state = LineState::Collecting;
            let result = if overflowed {
                Some(Err(MalformedCommand::LineTooLong))
            } else {
                parse_line(&self.buf)
            };
            self.buf.clear();
            return result;
        }

        if self.state == LineState::Collecting && self.buf.push(byte).is_err() {
            self.state = LineState::Discarding;
            self.buf.clear();
        }
        None
    }

    /// Bytes buffered for the line in progress.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Drop any partial line.
    pub fn reset(&mut self) {
        self.state = LineState::Collecting;
        self.buf.clear();
    }
}

/// Decode one line (terminator already stripped).
///
/// Returns `None` for blank lines.
pub fn parse_line(raw: &[u8]) -> Option<Result<Command, MalformedCommand>> {
    let line = raw.trim_ascii();
    if line.is_empty() {
        return None;
    }

    // Digital commands win over any axis parsing.
    if let [b] = line {
        if let Some(cmd) = Command::from_byte(*b) {
            return Some(Ok(cmd));
        }
    }

    Some(parse_axis_move(line))
}

fn parse_axis_move(line: &[u8]) -> Result<Command, MalformedCommand> {
    let sep = line
        .iter()
        .position(|&b| b == b' ' || b == b'\t')
        .ok_or(MalformedCommand::MissingSeparator)?;

    let (head, rest) = (&line[..sep], &line[sep + 1..]);

    let axis = match head {
        [letter] => Axis::from_letter(*letter),
        _ => None,
    }
    .ok_or(MalformedCommand::UnknownAxis(head[0]))?;

    // `line` is trimmed, so anything after the separator is non-blank.
    let angle_deg = core::str::from_utf8(rest.trim_ascii())
        .ok()
        .and_then(|s| s.parse::<i32>().ok())
        .ok_or(MalformedCommand::InvalidAngle)?;

    Ok(Command::AxisMove { axis, angle_deg })
}
