//! Reference defaults for the controller tunables

/// Leftmost horizontal angle
pub const HORIZONTAL_MIN: f64 = 50.0;
/// Rightmost horizontal angle
pub const HORIZONTAL_MAX: f64 = 130.0;
/// Lowest vertical angle (looking down)
pub const VERTICAL_MIN: f64 = 0.0;
/// Highest vertical angle (looking up)
pub const VERTICAL_MAX: f64 = 35.0;

/// Start-up pose
pub const INITIAL_HORIZONTAL: f64 = 90.0;
pub const INITIAL_VERTICAL: f64 = 30.0;

/// Frame size assumed by the avoidance policy
pub const DEFAULT_FRAME_WIDTH: f64 = 640.0;
pub const DEFAULT_FRAME_HEIGHT: f64 = 480.0;

/// Interpolation factor per tick (higher = faster)
pub const DEFAULT_SMOOTHING: f64 = 0.9;

/// Fraction of the smoothing rate used while scanning
pub const DEFAULT_SCAN_RATE_FACTOR: f64 = 0.5;

/// Ticks without a face before scanning starts
pub const DEFAULT_NO_FACE_TIMEOUT_TICKS: u32 = 200;

/// Time to hold a reached target before searching again
pub const DEFAULT_HOLD_DURATION_MS: u64 = 1000;

/// Distance below which a target counts as reached
pub const DEFAULT_TARGET_REACHED_THRESHOLD: f64 = 2.0;

/// Margins used by the extreme-pose override
pub const DEFAULT_VERTICAL_EXTREME_MARGIN: f64 = 10.0;
pub const DEFAULT_HORIZONTAL_EXTREME_MARGIN: f64 = 20.0;

/// Probability (0..=1) of a random move on an idle tick
pub const DEFAULT_RANDOM_MOVE_CHANCE: f64 = 0.0;

/// Scan phase speed in radians per millisecond
pub const DEFAULT_SCAN_SPEED: f64 = 0.0005;

/// Vertical scan target, above `VERTICAL_MAX` so it clamps to it
pub const DEFAULT_SCAN_VERTICAL_TARGET: f64 = 45.0;

/// Minimum spacing between actuator commands
pub const DEFAULT_SEND_INTERVAL_MS: u64 = 50;

/// Delay before the device link tries to reopen
pub const DEFAULT_RETRY_INTERVAL_MS: u64 = 5000;

/// Control loop rate
pub const DEFAULT_TARGET_FPS: u32 = 30;
