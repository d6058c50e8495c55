//! Command throttle and actuator link tests

mod test_helpers;

use pan_tilt_avoider::{
    app::AvoiderApp,
    pose::Pose,
    throttle::{ActuatorCommand, CommandThrottle},
    transport::{ActuatorLink, LinkEvent, MemoryLink},
};
use test_helpers::{default_controller, face_left_above, ms};

/// Count commands emitted over `window_ms` when ticking every `step_ms`
fn count_sends(step_ms: u64, start_ms: u64, window_ms: u64) -> usize {
    let mut throttle = CommandThrottle::new(ms(50));
    let pose = Pose::new(90.0, 30.0);
    let mut now = 0;
    let mut count = 0;
    while now < start_ms + window_ms {
        let sent = throttle.maybe_send(&pose, ms(now), true).is_some();
        if sent && now >= start_ms {
            count += 1;
        }
        now += step_ms;
    }
    count
}

#[test]
fn test_rate_bound_over_one_second() {
    for step in [1, 2, 5, 7, 10, 16, 25, 33, 49] {
        for start in [0, 13, 500] {
            let count = count_sends(step, start, 1000);
            assert!(count <= 20, "{count} commands in 1000 ms at {step} ms ticks");
            assert!(count > 0);
        }
    }
}

#[test]
fn test_slow_ticks_send_every_tick() {
    // Ticks slower than the interval are never throttled
    assert_eq!(count_sends(60, 0, 600), 10);
}

#[test]
fn test_command_examples() {
    let cases = [
        (Pose::new(130.0, 35.0), "H130V35\n"),
        (Pose::new(50.0, 0.0), "H50V0\n"),
        (Pose::new(89.9999, 29.5), "H89V29\n"),
    ];
    for (pose, expected) in cases {
        assert_eq!(ActuatorCommand::from_pose(&pose).to_string(), expected);
    }
}

#[test]
fn test_app_writes_throttled_commands_to_link() {
    let mut app = AvoiderApp::from_parts(default_controller(), Box::new(MemoryLink::connected()), None, ms(10));

    for tick in 0..100u64 {
        app.step(ms(tick * 10));
    }

    // Sends at 0, 60, 120, ... 960
    assert_eq!(app.summary().commands_sent, 17);
    assert_eq!(app.summary().ticks, 100);
}

#[test]
fn test_disconnected_link_keeps_controller_running() {
    let mut app = AvoiderApp::from_parts(default_controller(), Box::new(MemoryLink::default()), None, ms(10));

    for tick in 0..250u64 {
        let report = app.step(ms(tick * 10));
        assert!(report.command.is_none());
    }
    assert_eq!(app.summary().commands_sent, 0);
    assert_eq!(app.summary().ticks, 250);
    // Timed out into scanning regardless of the link
    assert_eq!(app.summary().transitions, 1);
}

#[test]
fn test_write_failure_is_swallowed() {
    let mut link = MemoryLink::connected();
    link.fail_writes(true);
    let mut throttle = CommandThrottle::new(ms(50));

    assert!(throttle.send_to(&mut link, &Pose::new(90.0, 30.0), ms(0)).is_none());
    assert!(!link.is_connected());

    // Nothing is retried while the link is down
    assert!(throttle.send_to(&mut link, &Pose::new(90.0, 30.0), ms(100)).is_none());
    assert!(link.written().is_empty());

    link.fail_writes(false);
    link.handle_event(LinkEvent::Opened);
    let command = throttle.send_to(&mut link, &Pose::new(91.5, 30.0), ms(200));
    assert_eq!(command.map(|c| c.to_string()), Some("H91V30\n".to_string()));
    assert_eq!(link.written(), ["H91V30\n".to_string()]);
}

#[test]
fn test_reconnect_sends_fresh_pose_not_backlog() {
    let mut controller = default_controller();
    let mut link = MemoryLink::default();
    let mut throttle = CommandThrottle::new(ms(50));

    controller.on_detection(&[face_left_above()]);
    for tick in 0..20u64 {
        let report = controller.tick(ms(tick * 10));
        throttle.send_to(&mut link, &report.pose, ms(tick * 10));
    }
    assert!(link.written().is_empty());

    link.handle_event(LinkEvent::Opened);
    let report = controller.tick(ms(200));
    throttle.send_to(&mut link, &report.pose, ms(200));
    assert_eq!(link.written().len(), 1);
    assert_eq!(link.written()[0], ActuatorCommand::from_pose(&report.pose).to_string());
}
