//! Configuration management for the pan/tilt controller

use crate::constants::{
    DEFAULT_FRAME_HEIGHT, DEFAULT_FRAME_WIDTH, DEFAULT_HOLD_DURATION_MS, DEFAULT_HORIZONTAL_EXTREME_MARGIN,
    DEFAULT_NO_FACE_TIMEOUT_TICKS, DEFAULT_RANDOM_MOVE_CHANCE, DEFAULT_RETRY_INTERVAL_MS, DEFAULT_SCAN_RATE_FACTOR,
    DEFAULT_SCAN_SPEED, DEFAULT_SCAN_VERTICAL_TARGET, DEFAULT_SEND_INTERVAL_MS, DEFAULT_SMOOTHING,
    DEFAULT_TARGET_FPS, DEFAULT_TARGET_REACHED_THRESHOLD, DEFAULT_VERTICAL_EXTREME_MARGIN, HORIZONTAL_MAX,
    HORIZONTAL_MIN, INITIAL_HORIZONTAL, INITIAL_VERTICAL, VERTICAL_MAX, VERTICAL_MIN,
};
use crate::pose::{AxisLimits, Pose};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Actuator angle limits
    pub axes: AxisLimits,

    /// Pose at start-up
    pub initial_pose: Pose,

    /// Frame geometry the detections refer to
    pub frame: FrameConfig,

    /// State machine tunables
    pub control: ControlConfig,

    /// Idle scan sweep
    pub scan: ScanConfig,

    /// Actuator link settings
    pub link: LinkConfig,

    /// Loop rate
    pub display: DisplayConfig,
}

/// Frame size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    pub width: f64,
    pub height: f64,
}

/// Control state machine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Interpolation factor per tick while avoiding (0.0-1.0]
    pub smoothing: f64,

    /// Multiplier applied to `smoothing` while scanning
    pub scan_rate_factor: f64,

    /// Ticks without a detection before scanning
    pub no_face_timeout_ticks: u32,

    /// How long a reached target is held, in milliseconds
    pub hold_duration_ms: u64,

    /// Per-axis distance below which the target counts as reached
    pub target_reached_threshold: f64,

    /// Vertical distance from an extreme that triggers the override
    pub vertical_extreme_margin: f64,

    /// Horizontal distance from an extreme that triggers the override
    pub horizontal_extreme_margin: f64,

    /// Probability of a random move on an idle tick (0.0-1.0)
    pub random_move_chance: f64,
}

/// Scan sweep configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Phase speed in radians per millisecond
    pub speed: f64,

    /// Vertical target while scanning
    pub vertical_target: f64,
}

/// Actuator link configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Minimum spacing between commands, in milliseconds
    pub send_interval_ms: u64,

    /// Delay before reopening a failed device, in milliseconds
    pub retry_interval_ms: u64,

    /// Device path; auto-discovered when absent
    pub device: Option<PathBuf>,
}

/// Loop timing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Target tick rate
    pub target_fps: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            axes: AxisLimits::default(),
            initial_pose: Pose::new(INITIAL_HORIZONTAL, INITIAL_VERTICAL),
            frame: FrameConfig::default(),
            control: ControlConfig::default(),
            scan: ScanConfig::default(),
            link: LinkConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Default for AxisLimits {
    fn default() -> Self {
        Self {
            horizontal_min: HORIZONTAL_MIN,
            horizontal_max: HORIZONTAL_MAX,
            vertical_min: VERTICAL_MIN,
            vertical_max: VERTICAL_MAX,
        }
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_FRAME_WIDTH,
            height: DEFAULT_FRAME_HEIGHT,
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            smoothing: DEFAULT_SMOOTHING,
            scan_rate_factor: DEFAULT_SCAN_RATE_FACTOR,
            no_face_timeout_ticks: DEFAULT_NO_FACE_TIMEOUT_TICKS,
            hold_duration_ms: DEFAULT_HOLD_DURATION_MS,
            target_reached_threshold: DEFAULT_TARGET_REACHED_THRESHOLD,
            vertical_extreme_margin: DEFAULT_VERTICAL_EXTREME_MARGIN,
            horizontal_extreme_margin: DEFAULT_HORIZONTAL_EXTREME_MARGIN,
            random_move_chance: DEFAULT_RANDOM_MOVE_CHANCE,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SCAN_SPEED,
            vertical_target: DEFAULT_SCAN_VERTICAL_TARGET,
        }
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            send_interval_ms: DEFAULT_SEND_INTERVAL_MS,
            retry_interval_ms: DEFAULT_RETRY_INTERVAL_MS,
            device: None,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            target_fps: DEFAULT_TARGET_FPS,
        }
    }
}

impl ControlConfig {
    #[must_use]
    pub const fn hold_duration(&self) -> Duration {
        Duration::from_millis(self.hold_duration_ms)
    }

    /// Smoothing rate used while scanning
    #[must_use]
    pub fn scan_rate(&self) -> f64 {
        self.smoothing * self.scan_rate_factor
    }
}

impl LinkConfig {
    #[must_use]
    pub const fn send_interval(&self) -> Duration {
        Duration::from_millis(self.send_interval_ms)
    }

    #[must_use]
    pub const fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }
}

impl DisplayConfig {
    /// Time between ticks
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.target_fps.max(1)))
    }
}

fn require_finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::ConfigError(format!("{name} must be a finite number, got {value}")))
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let axes = &self.axes;
        for (name, value) in [
            ("axes.horizontal_min", axes.horizontal_min),
            ("axes.horizontal_max", axes.horizontal_max),
            ("axes.vertical_min", axes.vertical_min),
            ("axes.vertical_max", axes.vertical_max),
            ("initial_pose.horizontal", self.initial_pose.horizontal),
            ("initial_pose.vertical", self.initial_pose.vertical),
            ("frame.width", self.frame.width),
            ("frame.height", self.frame.height),
            ("control.smoothing", self.control.smoothing),
            ("control.scan_rate_factor", self.control.scan_rate_factor),
            ("control.target_reached_threshold", self.control.target_reached_threshold),
            ("control.vertical_extreme_margin", self.control.vertical_extreme_margin),
            ("control.horizontal_extreme_margin", self.control.horizontal_extreme_margin),
            ("control.random_move_chance", self.control.random_move_chance),
            ("scan.speed", self.scan.speed),
            ("scan.vertical_target", self.scan.vertical_target),
        ] {
            require_finite(name, value)?;
        }

        // Validate axis limits
        if axes.horizontal_min >= axes.horizontal_max {
            return Err(Error::ConfigError(format!(
                "Horizontal min ({}) must be below horizontal max ({})",
                axes.horizontal_min, axes.horizontal_max
            )));
        }
        if axes.vertical_min >= axes.vertical_max {
            return Err(Error::ConfigError(format!(
                "Vertical min ({}) must be below vertical max ({})",
                axes.vertical_min, axes.vertical_max
            )));
        }

        // Validate frame
        if self.frame.width <= 0.0 || self.frame.height <= 0.0 {
            return Err(Error::ConfigError("Frame dimensions must be positive".to_string()));
        }

        // Validate control parameters
        let control = &self.control;
        if !(control.smoothing > 0.0 && control.smoothing <= 1.0) {
            return Err(Error::ConfigError("Smoothing must be in (0, 1]".to_string()));
        }
        if !(control.scan_rate_factor > 0.0 && control.scan_rate_factor <= 1.0) {
            return Err(Error::ConfigError("Scan rate factor must be in (0, 1]".to_string()));
        }
        if control.no_face_timeout_ticks == 0 {
            return Err(Error::ConfigError(
                "No-face timeout must be at least one tick".to_string(),
            ));
        }
        if control.target_reached_threshold <= 0.0 {
            return Err(Error::ConfigError(
                "Target reached threshold must be positive".to_string(),
            ));
        }
        if control.vertical_extreme_margin < 0.0 || control.horizontal_extreme_margin < 0.0 {
            return Err(Error::ConfigError("Extreme margins must be non-negative".to_string()));
        }
        if !(0.0..=1.0).contains(&control.random_move_chance) {
            return Err(Error::ConfigError(
                "Random move chance must be between 0.0 and 1.0".to_string(),
            ));
        }

        // Validate timing
        if self.scan.speed <= 0.0 {
            return Err(Error::ConfigError("Scan speed must be positive".to_string()));
        }
        if self.display.target_fps == 0 {
            return Err(Error::ConfigError("Target FPS must be greater than 0".to_string()));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Pan/tilt face avoider configuration

# Servo angle limits
axes:
  horizontal_min: 50.0
  horizontal_max: 130.0
  vertical_min: 0.0
  vertical_max: 35.0

# Start-up pose
initial_pose:
  horizontal: 90.0
  vertical: 30.0

# Frame the detector reports boxes in
frame:
  width: 640.0
  height: 480.0

# State machine
control:
  smoothing: 0.9
  scan_rate_factor: 0.5
  no_face_timeout_ticks: 200
  hold_duration_ms: 1000
  target_reached_threshold: 2.0
  vertical_extreme_margin: 10.0
  horizontal_extreme_margin: 20.0
  random_move_chance: 0.0

# Idle sweep
scan:
  speed: 0.0005
  vertical_target: 45.0

# Actuator link
link:
  send_interval_ms: 50
  retry_interval_ms: 5000
  device: null

# Loop rate
display:
  target_fps: 30
"#;
