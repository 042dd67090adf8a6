//! Evaluator settings.

use pricewatch_core::types::{AlertCase, Timeframe};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Trend evaluation configuration.
///
/// The increment and decrement thresholds have no defaults; a configuration
/// without them fails to deserialize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// Minimum positive accumulated RSI change for a jump
    pub increment_threshold: f64,
    /// Minimum magnitude of negative accumulated RSI change for a drop
    pub decrement_threshold: f64,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Candle table the history is read from
    #[serde(default)]
    pub timeframe: Timeframe,
    /// Candles fetched per symbol (K); older candles only warm up the RSI
    #[serde(default = "default_candle_lookback")]
    pub candle_lookback: usize,
    /// RSI values the accumulator runs over
    #[serde(default = "default_classification_window")]
    pub classification_window: usize,
    /// Cases that produce notifications
    #[serde(default = "default_enabled_cases")]
    pub enabled_cases: Vec<AlertCase>,
    /// Quiet period per (symbol, case) after an alert
    #[serde(default = "default_cooldown_minutes")]
    pub cooldown_minutes: u64,
}

fn default_interval_secs() -> u64 {
    60
}

fn default_candle_lookback() -> usize {
    64
}

fn default_classification_window() -> usize {
    9
}

fn default_enabled_cases() -> Vec<AlertCase> {
    AlertCase::all().to_vec()
}

fn default_cooldown_minutes() -> u64 {
    5
}

impl EvaluatorConfig {
    /// Configuration with the given thresholds and defaults elsewhere.
    pub fn new(increment_threshold: f64, decrement_threshold: f64) -> Self {
        Self {
            increment_threshold,
            decrement_threshold,
            interval_secs: default_interval_secs(),
            timeframe: Timeframe::default(),
            candle_lookback: default_candle_lookback(),
            classification_window: default_classification_window(),
            enabled_cases: default_enabled_cases(),
            cooldown_minutes: default_cooldown_minutes(),
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn cooldown(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.cooldown_minutes as i64)
    }

    pub fn is_enabled(&self, case: AlertCase) -> bool {
        self.enabled_cases.contains(&case)
    }
}
