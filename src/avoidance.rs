//! Face avoidance policy.
//!
//! Maps a face position to the far corner of the actuator range: a face left
//! of centre sends the camera fully right, a face above centre sends it fully
//! down. This is a binary flee, not a proportional tracker.
//!
//! A face near the frame centre can map to whichever extreme the camera
//! already occupies. The extreme-pose override flips such targets to the
//! opposite extreme so the camera keeps moving while a face is visible.

use crate::config::{ControlConfig, FrameConfig};
use crate::detection::BoundingBox;
use crate::pose::{AxisLimits, Pose};
use log::debug;

/// Distance from each extreme that triggers the override
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtremeMargins {
    pub horizontal: f64,
    pub vertical: f64,
}

impl From<&ControlConfig> for ExtremeMargins {
    fn from(control: &ControlConfig) -> Self {
        Self {
            horizontal: control.horizontal_extreme_margin,
            vertical: control.vertical_extreme_margin,
        }
    }
}

/// Compute the pose to flee to from a detected face
///
/// Degenerate boxes are accepted: a zero-size box centres on its corner and
/// NaN coordinates fall through to the "right/below" branch, so the result is
/// always a valid extreme.
#[must_use]
pub fn compute_avoidance_target(
    face: &BoundingBox,
    frame: &FrameConfig,
    current: &Pose,
    limits: &AxisLimits,
    margins: ExtremeMargins,
) -> Pose {
    let (face_x, face_y) = face.center();
    let center_x = frame.width / 2.0;
    let center_y = frame.height / 2.0;

    let mut horizontal = if face_x < center_x {
        limits.horizontal_max
    } else {
        limits.horizontal_min
    };

    let mut vertical = if face_y < center_y {
        limits.vertical_min
    } else {
        limits.vertical_max
    };

    if current.vertical >= limits.vertical_max - margins.vertical {
        vertical = limits.vertical_min;
    } else if current.vertical <= limits.vertical_min + margins.vertical {
        vertical = limits.vertical_max;
    }

    if current.horizontal >= limits.horizontal_max - margins.horizontal {
        horizontal = limits.horizontal_min;
    } else if current.horizontal <= limits.horizontal_min + margins.horizontal {
        horizontal = limits.horizontal_max;
    }

    debug!("Avoiding to H:{horizontal} V:{vertical}");
    Pose::new(horizontal, vertical)
}
