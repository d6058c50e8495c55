//! Numeric helpers shared across the controller.

pub mod safe_cast;
