//! Fuzz target: line-protocol decoding
//!
//! Drives arbitrary byte sequences through the streaming line accumulator
//! and the full `CommandDecoder` in line mode, asserting that neither
//! panics, that every completed line carries a terminator, and that the
//! decoder drains the link within its per-poll budget.
//!
//! cargo fuzz run fuzz_line_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use turret::adapters::uart::UartTransport;
use turret::app::commands::Command;
use turret::config::DecoderMode;
use turret::protocol::decoder::{CommandDecoder, MAX_BYTES_PER_POLL};
use turret::protocol::line::LineAccumulator;

fuzz_target!(|data: &[u8]| {
    // Byte-at-a-time accumulation.
    let mut acc = LineAccumulator::new();
    for &b in data {
        if let Some(result) = acc.push(b) {
            assert_eq!(b, b'\n', "line completed without a terminator");
            // Unrecognised lines are reported as malformed, never `Unknown`.
            assert!(!matches!(result, Ok(Command::Unknown)));
        }
    }

    // Whole-stream decoding through the transport.
    let mut link = UartTransport::loopback();
    link.inject(data);
    let mut decoder = CommandDecoder::new(DecoderMode::Line);
    let mut consumed = 0;
    loop {
        let poll = decoder.poll(&mut link);
        assert!(poll.bytes <= MAX_BYTES_PER_POLL);
        if !poll.received() {
            break;
        }
        consumed += poll.bytes;
    }
    assert_eq!(consumed, data.len());
});
