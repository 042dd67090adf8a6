//! Fixed-precision rounding helpers.
//!
//! All reported statistics are kept at two decimal places. The helpers
//! operate on the value scaled by 100 so the result is stable regardless of
//! binary representation noise in the last digits.

const SCALE: f64 = 100.0;

/// Round to 2 decimals, half-up on the scaled value.
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * SCALE + 0.5).floor() / SCALE
}

/// Truncate to 2 decimals by flooring the scaled value.
///
/// Negative values floor away from zero (`-2.345` becomes `-2.35`).
#[inline]
pub fn floor2(value: f64) -> f64 {
    (value * SCALE).floor() / SCALE
}
