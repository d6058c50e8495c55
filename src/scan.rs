//! Idle scan sweep.

use crate::config::ScanConfig;
use crate::pose::{AxisLimits, Pose};
use std::time::Duration;

/// Target pose after `elapsed` time in the scanning state
///
/// Horizontal follows a sine over the full horizontal range, vertical is
/// pinned to the configured scan elevation.
#[must_use]
pub fn compute_scan_target(elapsed: Duration, scan: &ScanConfig, limits: &AxisLimits) -> Pose {
    let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
    let phase = elapsed_ms * scan.speed;
    Pose::new(
        limits.horizontal_mid() + limits.horizontal_half_range() * phase.sin(),
        scan.vertical_target,
    )
}

/// Restartable sequence of scan targets sampled at a fixed step
pub struct ScanGenerator {
    scan: ScanConfig,
    limits: AxisLimits,
    step: Duration,
    elapsed: Duration,
}

impl ScanGenerator {
    #[must_use]
    pub const fn new(scan: ScanConfig, limits: AxisLimits, step: Duration) -> Self {
        Self {
            scan,
            limits,
            step,
            elapsed: Duration::ZERO,
        }
    }

    /// Reset phase to zero
    pub fn restart(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}

impl Iterator for ScanGenerator {
    type Item = Pose;

    fn next(&mut self) -> Option<Pose> {
        let target = compute_scan_target(self.elapsed, &self.scan, &self.limits);
        self.elapsed += self.step;
        Some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_starts_at_mid() {
        let target = compute_scan_target(Duration::ZERO, &ScanConfig::default(), &AxisLimits::default());
        assert_eq!(target, Pose::new(90.0, 45.0));
    }

    #[test]
    fn test_quarter_period_reaches_max() {
        let scan = ScanConfig::default();
        // sin reaches 1 at phase pi/2
        let quarter_ms = PI / 2.0 / scan.speed;
        let target = compute_scan_target(Duration::from_secs_f64(quarter_ms / 1000.0), &scan, &AxisLimits::default());
        assert!((target.horizontal - 130.0).abs() < 1e-6);
    }

    #[test]
    fn test_stays_in_horizontal_range() {
        let limits = AxisLimits::default();
        let generator = ScanGenerator::new(ScanConfig::default(), limits, Duration::from_millis(97));
        for target in generator.take(500) {
            assert!(target.horizontal >= limits.horizontal_min - 1e-9);
            assert!(target.horizontal <= limits.horizontal_max + 1e-9);
        }
    }

    #[test]
    fn test_restart_replays_sequence() {
        let mut generator = ScanGenerator::new(ScanConfig::default(), AxisLimits::default(), Duration::from_millis(33));
        let first: Vec<Pose> = generator.by_ref().take(20).collect();
        generator.restart();
        let second: Vec<Pose> = generator.take(20).collect();
        assert_eq!(first, second);
    }
}
