//! Directional clamped-momentum accumulator and alert classification.

use pricewatch_core::math::floor2;
use pricewatch_core::types::AlertCase;

/// RSI readings at or below this value are in the weak zone.
pub const WEAK_ZONE: f64 = 30.0;

/// Result of running the accumulator over an RSI series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendReading {
    /// Accumulated rise, never negative, truncated to 2 decimals
    pub rise: f64,
    /// Accumulated fall, never positive, truncated to 2 decimals
    pub fall: f64,
    /// Sign of the last step: 1, -1, or 0 for a single-value series
    pub direction: i8,
}

impl TrendReading {
    /// The accumulator matching the direction of the last step.
    pub fn delta(&self) -> f64 {
        if self.direction >= 0 {
            self.rise
        } else {
            self.fall
        }
    }
}

/// Run the clamped dual accumulator over consecutive RSI values.
///
/// The rise accumulator is clamped to `[0, inf)` and the fall accumulator to
/// `(-inf, 0]` after every step, so a reversal erodes the opposite run
/// instead of resetting it.
pub fn accumulate(series: &[f64]) -> TrendReading {
    let mut rise = 0.0_f64;
    let mut fall = 0.0_f64;
    let mut direction = 0_i8;

    for pair in series.windows(2) {
        let change = pair[1] - pair[0];
        rise = (rise + change).max(0.0);
        fall = (fall + change).min(0.0);
        direction = if change >= 0.0 { 1 } else { -1 };
    }

    TrendReading {
        rise: floor2(rise),
        fall: floor2(fall),
        direction,
    }
}

/// Classify an RSI series against the thresholds.
///
/// Returns the case and the reported delta, or `None` when neither
/// threshold is crossed.
pub fn classify(series: &[f64], increment_threshold: f64, decrement_threshold: f64) -> Option<(AlertCase, f64)> {
    let delta = accumulate(series).delta();
    let weak = series.iter().any(|v| *v <= WEAK_ZONE);

    if delta >= increment_threshold {
        let case = if weak { AlertCase::JumpFromWeak } else { AlertCase::Jump };
        Some((case, delta))
    } else if delta <= -decrement_threshold {
        let case = if weak { AlertCase::DropToWeak } else { AlertCase::Drop };
        Some((case, delta))
    } else {
        None
    }
}
