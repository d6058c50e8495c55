//! State machine transition tests

mod test_helpers;

use pan_tilt_avoider::{
    config::Config,
    controller::{ControllerState, Transition},
    pose::Pose,
};
use test_helpers::{
    controller_with, default_controller, face_left_above, face_right_below, ms, tick_until_scanning,
};

#[test]
fn test_timeout_enters_scanning_on_200th_tick() {
    let mut controller = default_controller();

    for tick in 1..200u64 {
        let report = controller.tick(ms(tick * 16));
        assert_eq!(report.state, ControllerState::Searching, "left searching on tick {tick}");
    }
    assert_eq!(controller.no_detection_streak(), 199);

    let report = controller.tick(ms(200 * 16));
    assert_eq!(report.state, ControllerState::Scanning);
    assert_eq!(
        report.transition,
        Some(Transition {
            from: ControllerState::Searching,
            to: ControllerState::Scanning
        })
    );
    assert_eq!(controller.scan_started_at(), ms(3200));
}

#[test]
fn test_custom_timeout_is_honoured() {
    let mut config = Config::default();
    config.control.no_face_timeout_ticks = 3;
    let mut controller = controller_with(config);

    controller.tick(ms(0));
    controller.tick(ms(10));
    assert_eq!(controller.state(), ControllerState::Searching);
    controller.tick(ms(20));
    assert_eq!(controller.state(), ControllerState::Scanning);
}

#[test]
fn test_detection_resets_streak() {
    let mut controller = default_controller();
    for tick in 0..150u64 {
        controller.tick(ms(tick * 16));
    }
    assert_eq!(controller.no_detection_streak(), 150);

    controller.on_detection(&[face_right_below()]);
    controller.tick(ms(150 * 16));
    assert_eq!(controller.no_detection_streak(), 0);
    assert_eq!(controller.state(), ControllerState::Avoiding);
}

#[test]
fn test_hold_then_return_to_searching() {
    let mut config = Config::default();
    // Target reachable in one smoothing step
    config.control.smoothing = 1.0;
    let mut controller = controller_with(config);

    controller.on_detection(&[face_left_above()]);
    controller.tick(ms(0));
    assert_eq!(controller.state(), ControllerState::Avoiding);
    let target = controller.target();

    // First in-threshold tick starts the hold timer
    let report = controller.tick(ms(10));
    assert_eq!(report.pose, target);
    assert_eq!(controller.target_reached_at(), Some(ms(10)));

    // Held for less than 1000 ms: still avoiding
    let mut now = 20;
    while now < 1010 {
        let report = controller.tick(ms(now));
        assert_eq!(report.state, ControllerState::Avoiding, "left avoiding early at {now} ms");
        now += 10;
    }

    // Exactly 1000 ms after reaching the target
    let report = controller.tick(ms(1010));
    assert_eq!(report.state, ControllerState::Searching);
    assert_eq!(controller.no_detection_streak(), 0);
    assert_eq!(controller.target_reached_at(), None);
}

#[test]
fn test_hold_requires_default_smoothing_to_converge() {
    let mut controller = default_controller();
    controller.on_detection(&[face_right_below()]);
    controller.tick(ms(0));

    let mut now = 0;
    while controller.state() == ControllerState::Avoiding {
        now += 33;
        controller.tick(ms(now));
        assert!(now < 5000, "never returned to searching");
    }
    // Two smoothing ticks to converge, then at least one second of hold
    assert!(now >= 1000 + 66);
    assert!(controller.pose().is_within(&controller.target(), 2.0));
}

#[test]
fn test_detection_ignored_while_avoiding() {
    let mut config = Config::default();
    config.control.smoothing = 0.1;
    let mut controller = controller_with(config);

    controller.on_detection(&[face_left_above()]);
    controller.tick(ms(0));
    let target = controller.target();

    controller.on_detection(&[face_right_below()]);
    let report = controller.tick(ms(16));
    assert_eq!(report.state, ControllerState::Avoiding);
    assert_eq!(report.target, target);
    assert_eq!(report.transition, None);

    // The ignored detection is gone, not deferred
    let report = controller.tick(ms(32));
    assert_eq!(report.target, target);
}

#[test]
fn test_same_detection_acts_in_searching_and_scanning() {
    // Searching -> avoiding
    let mut controller = default_controller();
    let before = controller.target();
    controller.on_detection(&[face_right_below()]);
    let report = controller.tick(ms(0));
    assert_eq!(report.state, ControllerState::Avoiding);
    assert_ne!(report.target, before);

    // Scanning -> searching
    let mut controller = default_controller();
    let entered = tick_until_scanning(&mut controller, 0, 16);
    controller.on_detection(&[face_right_below()]);
    let report = controller.tick(ms(entered + 16));
    assert_eq!(report.state, ControllerState::Searching);
    assert_eq!(controller.no_detection_streak(), 0);
}

#[test]
fn test_scan_restart_replays_targets() {
    let mut controller = default_controller();

    let first_entry = tick_until_scanning(&mut controller, 0, 16);
    let first: Vec<Pose> = (1..=40u64)
        .map(|k| controller.tick(ms(first_entry + k * 16)).target)
        .collect();

    controller.on_detection(&[face_left_above()]);
    controller.tick(ms(first_entry + 41 * 16));
    assert_eq!(controller.state(), ControllerState::Searching);

    let second_entry = tick_until_scanning(&mut controller, first_entry + 42 * 16, 16);
    assert!(second_entry > first_entry);
    assert_eq!(controller.scan_started_at(), ms(second_entry));

    let second: Vec<Pose> = (1..=40u64)
        .map(|k| controller.tick(ms(second_entry + k * 16)).target)
        .collect();

    assert_eq!(first, second);
}

#[test]
fn test_scan_vertical_clamps_to_upper_limit() {
    let mut controller = default_controller();
    let entered = tick_until_scanning(&mut controller, 0, 16);

    let mut report = controller.tick(ms(entered + 16));
    for k in 2..50u64 {
        report = controller.tick(ms(entered + k * 16));
    }
    assert_eq!(report.target.vertical, 45.0);
    assert_eq!(report.pose.vertical, 35.0);
}

#[test]
fn test_scan_moves_at_half_rate() {
    let mut controller = default_controller();
    let entered = tick_until_scanning(&mut controller, 0, 16);
    let before = controller.pose();

    let report = controller.tick(ms(entered + 16));
    let expected = before.horizontal + 0.45 * (report.target.horizontal - before.horizontal);
    assert!((report.pose.horizontal - expected).abs() < 1e-9);
}

#[test]
fn test_extreme_override_through_controller() {
    let mut config = Config::default();
    config.initial_pose = Pose::new(130.0, 20.0);
    let mut controller = controller_with(config);

    // Left of centre alone would pick H_MAX, where the camera already is
    controller.on_detection(&[face_left_above()]);
    let report = controller.tick(ms(0));
    assert_eq!(report.target.horizontal, 50.0);
}
