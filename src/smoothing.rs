//! Exponential approach of an angle toward its target.

/// Linear interpolation of `current` toward `target` by `rate`
///
/// `rate` is expected in `(0, 1]`; `1.0` jumps straight to the target.
/// The result is not clamped, callers clamp to the axis limits.
#[must_use]
pub fn smooth(current: f64, target: f64, rate: f64) -> f64 {
    current + rate * (target - current)
}
