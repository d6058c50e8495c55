//! Control state machine.
//!
//! [`Controller`] owns every piece of mutable control state: the actual pose,
//! the target pose, the current [`ControllerState`], the no-detection streak,
//! the hold and scan timers and the pending detection. The only mutating
//! operations are [`Controller::on_detection`] and [`Controller::tick`].
//!
//! Time is passed in by the caller as a monotonic offset from start, read once
//! per tick.

use crate::avoidance::{compute_avoidance_target, ExtremeMargins};
use crate::config::Config;
use crate::detection::{BoundingBox, DetectionSlot};
use crate::pose::Pose;
use crate::scan::compute_scan_target;
use crate::Result;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::time::Duration;

/// Controller mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerState {
    /// Waiting for a face
    Searching,
    /// Moving to, then holding, an avoidance target
    Avoiding,
    /// Idle sinusoidal sweep
    Scanning,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self::Searching
    }
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Searching => "searching",
            Self::Avoiding => "avoiding",
            Self::Scanning => "scanning",
        };
        f.write_str(name)
    }
}

/// State change that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: ControllerState,
    pub to: ControllerState,
}

/// Outcome of one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// State after the tick
    pub state: ControllerState,
    /// Clamped pose to hand to the actuator
    pub pose: Pose,
    /// Current goal
    pub target: Pose,
    /// Set when the tick changed state
    pub transition: Option<Transition>,
}

/// Face-avoiding pan/tilt state machine
pub struct Controller {
    config: Config,
    state: ControllerState,
    pose: Pose,
    target: Pose,
    no_detection_streak: u32,
    target_reached_at: Option<Duration>,
    scan_started_at: Duration,
    detection: DetectionSlot,
    rng: StdRng,
}

impl Controller {
    /// Create a controller, rejecting invalid configuration
    pub fn new(config: Config) -> Result<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a controller with a seeded random source for the random move
    pub fn with_seed(config: Config, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: Config, rng: StdRng) -> Result<Self> {
        config.validate()?;
        let pose = config.axes.clamp(config.initial_pose);
        info!(
            "Controller ready at H:{:.1} V:{:.1}, scanning after {} idle ticks",
            pose.horizontal, pose.vertical, config.control.no_face_timeout_ticks
        );
        Ok(Self {
            config,
            state: ControllerState::Searching,
            pose,
            target: pose,
            no_detection_streak: 0,
            target_reached_at: None,
            scan_started_at: Duration::ZERO,
            detection: DetectionSlot::new(),
            rng,
        })
    }

    /// Deliver a detection batch; only its first box is kept
    ///
    /// Replaces any detection not yet consumed by a tick.
    pub fn on_detection(&mut self, faces: &[BoundingBox]) {
        self.detection.publish(faces);
    }

    /// Advance the state machine by one tick at time `now`
    pub fn tick(&mut self, now: Duration) -> TickReport {
        let from = self.state;
        let detection = self.detection.take();

        match self.state {
            ControllerState::Searching => self.tick_searching(now, detection),
            ControllerState::Avoiding => {
                if detection.is_some() {
                    debug!("Ignoring detection while avoiding");
                }
                self.tick_avoiding(now);
            }
            ControllerState::Scanning => self.tick_scanning(now, detection),
        }

        self.pose = self.config.axes.clamp(self.pose);

        let transition = (from != self.state).then(|| {
            info!("State {} -> {}", from, self.state);
            Transition { from, to: self.state }
        });

        TickReport {
            state: self.state,
            pose: self.pose,
            target: self.target,
            transition,
        }
    }

    fn tick_searching(&mut self, now: Duration, detection: Option<BoundingBox>) {
        if let Some(face) = detection {
            self.target = compute_avoidance_target(
                &face,
                &self.config.frame,
                &self.pose,
                &self.config.axes,
                ExtremeMargins::from(&self.config.control),
            );
            self.no_detection_streak = 0;
            self.enter(ControllerState::Avoiding);
            return;
        }

        self.no_detection_streak = self.no_detection_streak.saturating_add(1);

        if self.roll_random_move() {
            let axes = self.config.axes;
            self.target = Pose::new(
                self.rng.gen_range(axes.horizontal_min..=axes.horizontal_max),
                self.rng.gen_range(axes.vertical_min..=axes.vertical_max),
            );
            debug!(
                "Random move to H:{:.1} V:{:.1}",
                self.target.horizontal, self.target.vertical
            );
            self.enter(ControllerState::Avoiding);
        } else if self.no_detection_streak >= self.config.control.no_face_timeout_ticks {
            info!("No faces detected for a while - switching to scanning mode");
            self.scan_started_at = now;
            self.enter(ControllerState::Scanning);
        }
    }

    fn tick_avoiding(&mut self, now: Duration) {
        let control = &self.config.control;
        self.pose = self.config.axes.clamp(self.pose.approach(self.target, control.smoothing));

        if !self.pose.is_within(&self.target, control.target_reached_threshold) {
            self.target_reached_at = None;
            return;
        }

        match self.target_reached_at {
            None => self.target_reached_at = Some(now),
            Some(reached_at) if now.saturating_sub(reached_at) >= control.hold_duration() => {
                self.no_detection_streak = 0;
                self.enter(ControllerState::Searching);
            }
            Some(_) => {}
        }
    }

    fn tick_scanning(&mut self, now: Duration, detection: Option<BoundingBox>) {
        let elapsed = now.saturating_sub(self.scan_started_at);
        self.target = compute_scan_target(elapsed, &self.config.scan, &self.config.axes);
        self.pose = self
            .config
            .axes
            .clamp(self.pose.approach(self.target, self.config.control.scan_rate()));

        if detection.is_some() {
            self.no_detection_streak = 0;
            self.enter(ControllerState::Searching);
        }
    }

    fn roll_random_move(&mut self) -> bool {
        let chance = self.config.control.random_move_chance;
        chance > 0.0 && self.rng.gen_bool(chance)
    }

    fn enter(&mut self, next: ControllerState) {
        self.target_reached_at = None;
        self.state = next;
    }

    #[must_use]
    pub const fn state(&self) -> ControllerState {
        self.state
    }

    #[must_use]
    pub const fn pose(&self) -> Pose {
        self.pose
    }

    #[must_use]
    pub const fn target(&self) -> Pose {
        self.target
    }

    #[must_use]
    pub const fn no_detection_streak(&self) -> u32 {
        self.no_detection_streak
    }

    #[must_use]
    pub const fn target_reached_at(&self) -> Option<Duration> {
        self.target_reached_at
    }

    #[must_use]
    pub const fn scan_started_at(&self) -> Duration {
        self.scan_started_at
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }
}
