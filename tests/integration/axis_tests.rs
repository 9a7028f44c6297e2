//! Axis initialization and line-protocol motion through the poll loop.

use crate::mock_hw::{HwCall, MockHardware, Rig};

use turret::app::commands::Axis;
use turret::app::events::AppEvent;
use turret::config::SystemConfig;
use turret::error::{MalformedCommand, OutOfRangeAngle, ServoError};

fn turret() -> Rig {
    Rig::start(SystemConfig::turret(), MockHardware::with_servos(&[1, 2]))
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn responsive_servos_are_put_in_position_mode() {
    let rig = turret();
    assert_eq!(
        rig.hw.calls,
        vec![
            HwCall::Level(false),
            HwCall::Ping(1),
            HwCall::PositionMode(1),
            HwCall::Torque(1),
            HwCall::Ping(2),
            HwCall::PositionMode(2),
            HwCall::Torque(2),
        ]
    );
    assert!(rig.app.axis_ready(Axis::X));
    assert!(rig.app.axis_ready(Axis::Y));
    assert_eq!(
        rig.sink.events[..2],
        [
            AppEvent::AxisReady { axis: Axis::X, servo_id: 1 },
            AppEvent::AxisReady { axis: Axis::Y, servo_id: 2 },
        ]
    );
}

#[test]
fn missing_servo_is_reported_and_startup_continues() {
    let mut rig = Rig::start(SystemConfig::turret(), MockHardware::with_servos(&[2]));
    assert!(!rig.app.axis_ready(Axis::X));
    assert!(rig.app.axis_ready(Axis::Y));
    assert!(rig.sink.events.contains(&AppEvent::AxisUnresponsive {
        axis: Axis::X,
        servo_id: 1,
    }));
    assert!(!rig.hw.calls.contains(&HwCall::PositionMode(1)));

    // Moves for the dead axis are still attempted, with no re-probe.
    rig.hw.clear();
    rig.send_and_poll(b"x 0\n", 0);
    assert_eq!(rig.hw.calls, vec![HwCall::Position { id: 1, position: 2048 }]);
}

// ── Motion ────────────────────────────────────────────────────

#[test]
fn centre_commands_hit_half_scale() {
    let mut rig = turret();
    rig.send_and_poll(b"x 0\n", 0);
    rig.send_and_poll(b"y 0\n", 10);
    assert_eq!(rig.hw.positions(), vec![(1, 2048), (2, 2048)]);
    assert_eq!(
        rig.sink.events.last(),
        Some(&AppEvent::AxisCommanded {
            axis: Axis::Y,
            angle_deg: 0,
            position: 2048,
        })
    );
}

#[test]
fn axis_letter_is_case_insensitive() {
    let mut rig = turret();
    rig.send_and_poll(b"Y -10\n", 0);
    rig.send_and_poll(b"y -10\n", 10);
    let p = rig.hw.positions();
    assert_eq!(p.len(), 2);
    assert_eq!(p[0], p[1]);
}

#[test]
fn out_of_range_is_clamped_and_reported() {
    let mut rig = turret();
    rig.send_and_poll(b"x -200\n", 0);
    rig.send_and_poll(b"x -90\n", 10);
    let p = rig.hw.positions();
    assert_eq!(p[0], p[1]);
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::AngleClamped(_))),
        1
    );
    assert!(rig.sink.events.contains(&AppEvent::AngleClamped(OutOfRangeAngle {
        axis: Axis::X,
        requested_deg: -200,
        clamped_deg: -90,
    })));
}

#[test]
fn bare_axis_letter_writes_nothing() {
    let mut rig = turret();
    rig.sink.clear();
    rig.send_and_poll(b"x\n", 0);
    assert!(rig.hw.positions().is_empty());
    assert_eq!(
        rig.sink.events,
        vec![AppEvent::DecodeFailed(MalformedCommand::MissingSeparator)]
    );
}

#[test]
fn malformed_lines_are_rejected_without_side_effects() {
    let mut rig = turret();
    rig.sink.clear();
    rig.hw.clear();
    for line in [&b"x 4.5\n"[..], b"z 10\n", b"x45\n", b"x abc\n"] {
        rig.send_and_poll(line, 0);
    }
    assert!(rig.hw.calls.is_empty());
    assert_eq!(
        rig.sink.events,
        vec![
            AppEvent::DecodeFailed(MalformedCommand::InvalidAngle),
            AppEvent::DecodeFailed(MalformedCommand::UnknownAxis(b'z')),
            AppEvent::DecodeFailed(MalformedCommand::MissingSeparator),
            AppEvent::DecodeFailed(MalformedCommand::InvalidAngle),
        ]
    );
}

#[test]
fn overlong_line_is_reported_once() {
    let mut rig = turret();
    rig.sink.clear();
    let mut line = vec![b'x', b' '];
    line.extend(std::iter::repeat_n(b'1', 60));
    line.push(b'\n');
    rig.send_and_poll(&line, 0);
    assert_eq!(
        rig.sink.events,
        vec![AppEvent::DecodeFailed(MalformedCommand::LineTooLong)]
    );
    rig.send_and_poll(b"y 0\n", 10);
    assert_eq!(rig.hw.positions(), vec![(2, 2048)]);
}

#[test]
fn line_split_across_polls_is_reassembled() {
    let mut rig = turret();
    rig.send_and_poll(b"x 4", 0);
    assert!(rig.hw.positions().is_empty());
    rig.send_and_poll(b"5\n", 5);
    assert_eq!(rig.hw.positions().len(), 1);
    assert!(matches!(
        rig.sink.events.last(),
        Some(AppEvent::AxisCommanded { axis: Axis::X, angle_deg: 45, .. })
    ));
}

#[test]
fn one_line_per_poll_and_none_dropped() {
    let mut rig = turret();
    rig.send_and_poll(b"x 10\ny 20\n1\n", 0);
    assert_eq!(rig.hw.positions().len(), 1);
    rig.poll(1);
    assert_eq!(rig.hw.positions().len(), 2);
    assert!(!rig.hw.is_high());
    rig.poll(2);
    assert!(rig.hw.is_high());
}

#[test]
fn failed_write_is_reported_and_ignored() {
    let mut hw = MockHardware::with_servos(&[1, 2]);
    hw.write_error = Some(ServoError::Timeout);
    let mut rig = Rig::start(SystemConfig::turret(), hw);
    rig.send_and_poll(b"y 30\n", 0);
    assert_eq!(
        rig.sink.events.last(),
        Some(&AppEvent::ServoWriteFailed {
            axis: Axis::Y,
            error: ServoError::Timeout,
        })
    );
    rig.send_and_poll(b"1\n", 10);
    assert!(rig.hw.is_high());
}

#[test]
fn axis_moves_leave_the_trigger_alone() {
    let mut rig = turret();
    rig.send_and_poll(b"1\n", 0);
    rig.send_and_poll(b"x 30\n", 10);
    assert!(rig.hw.is_high());
    assert_eq!(rig.hw.levels(), vec![false, true]);
}
