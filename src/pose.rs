//! Actuator pose and axis limits.

use crate::smoothing::smooth;
use serde::{Deserialize, Serialize};

/// Horizontal/vertical angle pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Pan angle
    pub horizontal: f64,
    /// Tilt angle
    pub vertical: f64,
}

impl Pose {
    #[must_use]
    pub const fn new(horizontal: f64, vertical: f64) -> Self {
        Self { horizontal, vertical }
    }

    /// Move both axes toward `target` by `rate`
    #[must_use]
    pub fn approach(self, target: Self, rate: f64) -> Self {
        Self {
            horizontal: smooth(self.horizontal, target.horizontal, rate),
            vertical: smooth(self.vertical, target.vertical, rate),
        }
    }

    /// True when both axes are strictly closer than `threshold` to `other`
    #[must_use]
    pub fn is_within(&self, other: &Self, threshold: f64) -> bool {
        (self.horizontal - other.horizontal).abs() < threshold && (self.vertical - other.vertical).abs() < threshold
    }
}

/// Inclusive bounds for both axes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisLimits {
    pub horizontal_min: f64,
    pub horizontal_max: f64,
    pub vertical_min: f64,
    pub vertical_max: f64,
}

impl AxisLimits {
    /// Clamp a pose into the limits
    #[must_use]
    pub fn clamp(&self, pose: Pose) -> Pose {
        Pose {
            horizontal: pose.horizontal.clamp(self.horizontal_min, self.horizontal_max),
            vertical: pose.vertical.clamp(self.vertical_min, self.vertical_max),
        }
    }

    #[must_use]
    pub fn contains(&self, pose: &Pose) -> bool {
        (self.horizontal_min..=self.horizontal_max).contains(&pose.horizontal)
            && (self.vertical_min..=self.vertical_max).contains(&pose.vertical)
    }

    /// Centre of the horizontal range
    #[must_use]
    pub fn horizontal_mid(&self) -> f64 {
        (self.horizontal_min + self.horizontal_max) / 2.0
    }

    /// Half-width of the horizontal range
    #[must_use]
    pub fn horizontal_half_range(&self) -> f64 {
        (self.horizontal_max - self.horizontal_min) / 2.0
    }
}
