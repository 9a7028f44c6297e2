//! Integration tests for the decode → output pipeline.
//!
//! Drives the full [`AppService`](turret::app::service::AppService) poll
//! loop through the loopback UART and asserts on the trigger line.

use crate::mock_hw::{HwCall, MockHardware, Rig};

use turret::app::events::AppEvent;
use turret::config::SystemConfig;
use turret::output::OutputState;

fn turret() -> Rig {
    Rig::start(SystemConfig::turret(), MockHardware::with_servos(&[1, 2]))
}

#[test]
fn start_drives_trigger_low() {
    let rig = Rig::start(SystemConfig::trigger_basic(), MockHardware::new());
    assert_eq!(rig.hw.calls, vec![HwCall::Level(false)]);
    assert!(matches!(rig.sink.events[..], [AppEvent::Started { .. }]));
}

#[test]
fn line_commands_switch_the_output() {
    let mut rig = turret();
    rig.send_and_poll(b"1\n", 0);
    assert!(rig.hw.is_high());
    assert_eq!(rig.app.output_state(), OutputState::On);

    rig.send_and_poll(b"0\r\n", 10);
    assert!(!rig.hw.is_high());
    assert_eq!(rig.app.output_state(), OutputState::Off);
}

#[test]
fn pulse_goes_low_at_the_deadline() {
    let mut rig = turret();
    rig.send_and_poll(b"2\n", 1_000);
    assert!(rig.hw.is_high());

    rig.poll(1_050);
    rig.poll(1_099);
    assert!(rig.hw.is_high(), "pulse ended early");

    rig.poll(1_100);
    assert!(!rig.hw.is_high());
    assert_eq!(
        rig.sink.events.last(),
        Some(&AppEvent::OutputChanged {
            from: OutputState::Pulsing { until_ms: 1_100 },
            to: OutputState::Off,
        })
    );
}

#[test]
fn late_poll_still_ends_the_pulse() {
    let mut rig = turret();
    rig.send_and_poll(b"2\n", 0);
    // Loop stalled well past the deadline but under the link timeout.
    rig.poll(400);
    assert!(!rig.hw.is_high());
}

#[test]
fn new_command_supersedes_pulse() {
    let mut rig = turret();
    rig.send_and_poll(b"2\n", 0);
    rig.send_and_poll(b"1\n", 50);
    rig.poll(200);
    assert!(rig.hw.is_high());
    assert_eq!(rig.app.output_state(), OutputState::On);
}

#[test]
fn input_keeps_draining_during_a_pulse() {
    let mut rig = turret();
    rig.send_and_poll(b"2\n", 0);
    rig.send_and_poll(b"3\n", 40);
    assert!(rig.hw.is_high());
    assert_eq!(rig.link.pending(), 0);
    rig.poll(100);
    assert!(!rig.hw.is_high());
}

#[test]
fn burst_applies_only_the_last_command() {
    let mut rig = Rig::start(SystemConfig::trigger_flood_safe(), MockHardware::new());
    rig.hw.clear();

    rig.send_and_poll(b"102", 0);
    // Never saw the '1' or '0': one HIGH write for the pulse.
    assert_eq!(rig.hw.levels(), vec![true]);
    assert_eq!(rig.app.output_state(), OutputState::Pulsing { until_ms: 100 });

    rig.poll(100);
    assert_eq!(rig.hw.levels(), vec![true, false]);
}

#[test]
fn oversized_burst_ending_in_off_never_fires() {
    let mut rig = Rig::start(SystemConfig::trigger_flood_safe(), MockHardware::new());
    rig.hw.clear();

    let mut flood = vec![b'1'; 300];
    flood.push(b'0');
    rig.send_and_poll(&flood, 0);
    assert_eq!(rig.link.pending(), 0);
    assert!(!rig.hw.is_high());
    assert_eq!(rig.app.output_state(), OutputState::Off);

    rig.poll(1);
    assert!(rig.hw.levels().iter().all(|&high| !high));
    assert_eq!(rig.app.bytes_received(), 301);
}

#[test]
fn burst_of_noise_changes_nothing() {
    let mut rig = Rig::start(SystemConfig::trigger_flood_safe(), MockHardware::new());
    rig.send_and_poll(b"1", 0);
    rig.send_and_poll(b"zzz\r\n", 10);
    assert!(rig.hw.is_high());
    assert!(rig.app.link_armed());
}

#[test]
fn single_byte_mode_takes_one_byte_per_poll() {
    let mut rig = Rig::start(SystemConfig::trigger_basic(), MockHardware::new());
    rig.send(b"10");
    rig.poll(0);
    assert!(rig.hw.is_high());
    rig.poll(1);
    assert!(!rig.hw.is_high());
    assert_eq!(rig.app.bytes_received(), 2);
}

#[test]
fn blocking_pulse_holds_inside_the_poll() {
    let mut rig = Rig::start(SystemConfig::trigger_basic(), MockHardware::new());
    rig.hw.clear();
    rig.sink.clear();
    rig.send_and_poll(b"2", 0);
    assert_eq!(
        rig.hw.calls,
        vec![
            HwCall::Level(false),
            HwCall::Level(true),
            HwCall::Hold(100),
            HwCall::Level(false),
        ]
    );
    assert!(!rig.hw.is_high());
    assert_eq!(rig.app.output_state(), OutputState::Off);

    let pulsing = OutputState::Pulsing { until_ms: 100 };
    assert_eq!(
        rig.sink.events,
        vec![
            AppEvent::OutputChanged { from: OutputState::Off, to: pulsing },
            AppEvent::OutputChanged { from: pulsing, to: OutputState::Off },
        ]
    );
}

#[test]
fn pin_always_matches_state() {
    let mut rig = turret();
    let script: &[(&[u8], u32)] = &[
        (b"1\n", 0),
        (b"2\n", 10),
        (b"", 60),
        (b"2\n", 90),
        (b"", 150),
        (b"", 190),
        (b"0\n", 200),
        (b"1\n2\n", 210),
        (b"", 220),
        (b"", 400),
    ];
    for &(bytes, t) in script {
        rig.send_and_poll(bytes, t);
        assert_eq!(rig.hw.is_high(), rig.app.output_state().is_high(), "t={t}");
    }
}
