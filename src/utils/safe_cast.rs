//! Float to integer conversions for actuator angles

use crate::{Error, Result};

/// Convert f64 to i32, truncating toward zero, with bounds checking
///
/// # Errors
///
/// Returns an error if the value is not finite or outside i32 range
#[allow(clippy::cast_possible_truncation)] // Truncation after bounds check is safe
pub fn f64_to_i32(value: f64) -> Result<i32> {
    if value.is_finite() && value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX) {
        Ok(value as i32)
    } else {
        Err(Error::InvalidInput(format!(
            "Value {value} cannot be safely converted to i32"
        )))
    }
}

/// Truncate f64 to i32, saturating at the i32 range
///
/// NaN maps to 0. Angles are clamped long before they get here, so the
/// saturating cases only matter for misconfigured limits.
#[must_use]
pub fn f64_to_i32_trunc(value: f64) -> i32 {
    f64_to_i32(value).unwrap_or(if value.is_nan() {
        0
    } else if value > 0.0 {
        i32::MAX
    } else {
        i32::MIN
    })
}
