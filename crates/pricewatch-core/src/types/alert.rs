//! Alert classification types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Discrete trend case produced by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertCase {
    /// Oscillator rose past the increment threshold
    Jump,
    /// Same as `Jump`, with a weak-zone reading in the window
    JumpFromWeak,
    /// Oscillator fell past the decrement threshold
    Drop,
    /// Same as `Drop`, with a weak-zone reading in the window
    DropToWeak,
}

impl AlertCase {
    /// Get all alert cases.
    pub fn all() -> &'static [AlertCase] {
        &[
            AlertCase::Jump,
            AlertCase::JumpFromWeak,
            AlertCase::Drop,
            AlertCase::DropToWeak,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertCase::Jump => "JUMP",
            AlertCase::JumpFromWeak => "JUMP_FROM_WEAK",
            AlertCase::Drop => "DROP",
            AlertCase::DropToWeak => "DROP_TO_WEAK",
        }
    }
}

impl fmt::Display for AlertCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertCase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AlertCase::all()
            .iter()
            .copied()
            .find(|case| case.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Invalid alert case: {}", s))
    }
}

/// A classified alert for one symbol from a single evaluation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationCandidate {
    pub symbol: String,
    pub alert_case: AlertCase,
    /// Accumulated oscillator change, truncated to 2 decimals
    pub oscillator_delta: f64,
    /// Live price used as the last close
    pub latest_price: f64,
    /// Oscillator values of the classification window, oldest first
    pub recent_oscillator_series: Vec<f64>,
}

impl EvaluationCandidate {
    /// The most recent oscillator value of the window.
    pub fn latest_oscillator(&self) -> f64 {
        self.recent_oscillator_series.last().copied().unwrap_or(0.0)
    }
}
