//! Face-avoiding pan/tilt camera controller.
//!
//! This library steers a two-axis servo mount away from detected faces:
//! - A deterministic avoidance policy picks the far corner from each face
//! - An exponential smoother moves the mount toward its target every tick
//! - A sinusoidal scan sweep takes over after a stretch without faces
//! - A command throttle bounds how often positions go out to the servos
//!
//! The control loop consists of:
//! 1. Detection delivery into a single-slot buffer
//! 2. One state machine tick per frame (searching, avoiding, scanning)
//! 3. Clamping of the resulting pose to the axis limits
//! 4. Throttled `H<int>V<int>\n` commands to the actuator link
//!
//! # Examples
//!
//! ## Driving the controller
//!
//! ```no_run
//! use pan_tilt_avoider::{config::Config, controller::Controller, detection::BoundingBox};
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut controller = Controller::new(Config::default())?;
//!
//! // A face left of centre arrives from the detector
//! controller.on_detection(&[BoundingBox::new(120.0, 200.0, 80.0, 80.0)]);
//!
//! let report = controller.tick(Duration::from_millis(0));
//! println!("State: {} target H:{} V:{}", report.state, report.target.horizontal, report.target.vertical);
//! # Ok(())
//! # }
//! ```
//!
//! ## Sending commands
//!
//! ```no_run
//! use pan_tilt_avoider::{
//!     config::Config,
//!     controller::Controller,
//!     throttle::CommandThrottle,
//!     transport::{ActuatorLink, DeviceLink},
//! };
//! use std::time::{Duration, Instant};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let mut link = DeviceLink::new("/dev/ttyACM0", config.link.retry_interval());
//! let mut throttle = CommandThrottle::new(config.link.send_interval());
//! let mut controller = Controller::new(config)?;
//!
//! let start = Instant::now();
//! loop {
//!     let now = start.elapsed();
//!     link.poll(now);
//!     let report = controller.tick(now);
//!     throttle.send_to(&mut link, &report.pose, now);
//!     std::thread::sleep(Duration::from_millis(33));
//! }
//! # }
//! ```

/// Actuator pose and axis limits
pub mod pose;

/// Angle interpolation toward a target
pub mod smoothing;

/// Face avoidance policy
pub mod avoidance;

/// Idle scan sweep generator
pub mod scan;

/// Control state machine
pub mod controller;

/// Actuator command rate limiting and encoding
pub mod throttle;

/// Actuator link abstraction and implementations
pub mod transport;

/// Face detection input types and sources
pub mod detection;

/// Numeric conversion helpers
pub mod utils;

/// Error types and result handling
pub mod error;

/// Main application module
pub mod app;

/// Default values for the tunables
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
