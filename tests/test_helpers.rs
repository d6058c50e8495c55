//! Helper functions and utilities for tests
#![allow(dead_code)]

use pan_tilt_avoider::{
    config::Config,
    controller::{Controller, ControllerState},
    detection::BoundingBox,
};
use std::time::Duration;

/// Milliseconds as a `Duration`
pub fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// Seeded controller with default configuration
pub fn default_controller() -> Controller {
    Controller::with_seed(Config::default(), 42).expect("default config is valid")
}

/// Seeded controller with a custom configuration
pub fn controller_with(config: Config) -> Controller {
    Controller::with_seed(config, 42).expect("test config is valid")
}

/// Box centred at (`cx`, `cy`)
pub fn face_centered_at(cx: f64, cy: f64) -> BoundingBox {
    BoundingBox::new(cx - 20.0, cy - 20.0, 40.0, 40.0)
}

/// Face one pixel left of and above the centre of a 640x480 frame
pub fn face_left_above() -> BoundingBox {
    face_centered_at(319.0, 239.0)
}

/// Face one pixel right of and below the centre of a 640x480 frame
pub fn face_right_below() -> BoundingBox {
    face_centered_at(321.0, 241.0)
}

/// Tick without detections until the controller scans; returns the time of the entering tick
pub fn tick_until_scanning(controller: &mut Controller, start_ms: u64, step_ms: u64) -> u64 {
    let mut now = start_ms;
    loop {
        controller.tick(ms(now));
        if controller.state() == ControllerState::Scanning {
            return now;
        }
        now += step_ms;
        assert!(now - start_ms < 1_000_000, "controller never started scanning");
    }
}
