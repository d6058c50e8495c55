//! Main application module: the fixed-rate control loop.

use crate::{
    config::Config,
    controller::{Controller, ControllerState, TickReport},
    detection::{DetectionSource, ScriptedDetections},
    error::Result,
    throttle::{ActuatorCommand, CommandThrottle},
    transport::{ActuatorLink, DeviceLink, LogLink},
};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Where actuator commands go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// Explicit device path
    Device(PathBuf),
    /// Best matching port in a directory, rescanned on every reconnect
    AutoDiscover(PathBuf),
    /// Log commands instead of sending them
    DryRun,
}

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Controller tunables
    pub config: Config,
    /// Actuator link selection
    pub link: LinkTarget,
    /// Detection timeline to replay
    pub script: Option<PathBuf>,
    /// Stop after this long; run until interrupted when absent
    pub duration: Option<Duration>,
}

/// Result of a single loop iteration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    pub tick: TickReport,
    pub command: Option<ActuatorCommand>,
}

/// Counters reported when the loop ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub commands_sent: u64,
    pub transitions: u64,
}

/// Control loop wiring detections, controller, throttle and link together
pub struct AvoiderApp {
    controller: Controller,
    throttle: CommandThrottle,
    link: Box<dyn ActuatorLink>,
    source: Option<Box<dyn DetectionSource>>,
    tick_interval: Duration,
    duration: Option<Duration>,
    summary: RunSummary,
}

impl AvoiderApp {
    /// Create the application from configuration
    pub fn new(app_config: AppConfig) -> Result<Self> {
        info!("Initializing pan/tilt avoider");
        app_config.config.validate()?;

        let retry_interval = app_config.config.link.retry_interval();
        let link: Box<dyn ActuatorLink> = match &app_config.link {
            LinkTarget::Device(path) => Box::new(DeviceLink::new(path, retry_interval)),
            LinkTarget::AutoDiscover(dir) => Box::new(DeviceLink::discover(dir, retry_interval)),
            LinkTarget::DryRun => {
                info!("Dry run: commands are logged, not sent");
                Box::new(LogLink::new())
            }
        };

        let source: Option<Box<dyn DetectionSource>> = match &app_config.script {
            Some(path) => Some(Box::new(ScriptedDetections::from_file(path)?)),
            None => {
                warn!("No detection source configured, the controller will only scan");
                None
            }
        };

        let tick_interval = app_config.config.display.tick_interval();
        let controller = Controller::new(app_config.config)?;

        Ok(Self::from_parts(controller, link, source, tick_interval).with_duration(app_config.duration))
    }

    /// Assemble from already-built parts
    #[must_use]
    pub fn from_parts(
        controller: Controller,
        link: Box<dyn ActuatorLink>,
        source: Option<Box<dyn DetectionSource>>,
        tick_interval: Duration,
    ) -> Self {
        let throttle = CommandThrottle::new(controller.config().link.send_interval());
        Self {
            controller,
            throttle,
            link,
            source,
            tick_interval,
            duration: None,
            summary: RunSummary::default(),
        }
    }

    /// Stop the loop after `duration`
    #[must_use]
    pub fn with_duration(mut self, duration: Option<Duration>) -> Self {
        self.duration = duration;
        self
    }

    /// Run one control tick at `now`
    pub fn step(&mut self, now: Duration) -> StepReport {
        self.link.poll(now);

        if let Some(batch) = self.source.as_mut().and_then(|source| source.poll(now)) {
            self.controller.on_detection(&batch);
        }

        let tick = self.controller.tick(now);
        let command = self.throttle.send_to(self.link.as_mut(), &tick.pose, now);

        self.summary.ticks += 1;
        if tick.transition.is_some() {
            self.summary.transitions += 1;
        }
        if command.is_some() {
            self.summary.commands_sent += 1;
        }

        StepReport { tick, command }
    }

    /// Run the main loop until the configured duration has passed
    pub fn run(&mut self) -> Result<RunSummary> {
        info!(
            "Starting control loop at {:.1} ticks/s on {}",
            1.0 / self.tick_interval.as_secs_f64(),
            self.link.name()
        );

        let start = Instant::now();
        let mut next_tick = start;
        let mut last_status = Duration::ZERO;

        loop {
            let now = start.elapsed();
            if self.duration.is_some_and(|limit| now >= limit) {
                break;
            }

            let report = self.step(now);

            if now.saturating_sub(last_status) >= Duration::from_secs(1) {
                last_status = now;
                debug!(
                    "State: {} H:{:.1} V:{:.1} (target H:{:.1} V:{:.1}) link {}",
                    report.tick.state,
                    report.tick.pose.horizontal,
                    report.tick.pose.vertical,
                    report.tick.target.horizontal,
                    report.tick.target.vertical,
                    if self.link.is_connected() { "connected" } else { "disconnected" }
                );
            }

            next_tick += self.tick_interval;
            let now = Instant::now();
            if next_tick > now {
                std::thread::sleep(next_tick - now);
            } else {
                // Fell behind; don't try to catch up with a burst of ticks
                next_tick = now;
            }
        }

        info!(
            "Control loop stopped after {} ticks, {} commands, {} transitions",
            self.summary.ticks, self.summary.commands_sent, self.summary.transitions
        );
        Ok(self.summary)
    }

    #[must_use]
    pub const fn controller(&self) -> &Controller {
        &self.controller
    }

    #[must_use]
    pub fn state(&self) -> ControllerState {
        self.controller.state()
    }

    #[must_use]
    pub const fn summary(&self) -> RunSummary {
        self.summary
    }
}
