//! Momentum indicators.

use pricewatch_core::traits::StreamingIndicator;
use serde::{Deserialize, Serialize};

/// Default RSI smoothing period.
pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Committed smoothing state of an [`Rsi`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RsiState {
    /// Smoothed average gain, never negative
    pub average_gain: f64,
    /// Smoothed average loss, never negative
    pub average_loss: f64,
    /// Last committed input, None before the first update
    pub previous_value: Option<f64>,
    /// Number of committed updates
    pub sample_count: usize,
}

impl RsiState {
    /// Whether at least one value has been committed.
    #[inline]
    pub fn initialized(&self) -> bool {
        self.previous_value.is_some()
    }
}

/// Relative Strength Index (RSI) with Wilder's smoothing.
///
/// Averages start at zero and are smoothed from the first price change:
/// `avg = (avg * (period - 1) + x) / period`. A value is available once one
/// change has been folded in; a zero average loss reads as 100.
#[derive(Debug, Clone, Copy)]
pub struct Rsi {
    period: usize,
    state: RsiState,
}

impl Rsi {
    /// Create a new RSI indicator.
    ///
    /// Common periods are 14 (default) or 9.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self {
            period,
            state: RsiState::default(),
        }
    }

    /// Get the committed smoothing state.
    pub fn state(&self) -> &RsiState {
        &self.state
    }

    fn value_of(state: &RsiState) -> f64 {
        if state.average_loss == 0.0 {
            100.0
        } else {
            100.0 - (100.0 / (1.0 + state.average_gain / state.average_loss))
        }
    }

    fn advance(&self, state: &mut RsiState, value: f64) {
        if let Some(previous) = state.previous_value {
            let period = self.period as f64;
            let change = value - previous;
            state.average_gain = (state.average_gain * (period - 1.0) + change.max(0.0)) / period;
            state.average_loss = (state.average_loss * (period - 1.0) + (-change).max(0.0)) / period;
        }
        state.previous_value = Some(value);
        state.sample_count += 1;
    }

    fn ready(state: &RsiState) -> bool {
        state.sample_count >= 2
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(DEFAULT_RSI_PERIOD)
    }
}

impl StreamingIndicator for Rsi {
    type Output = f64;

    fn update(&mut self, value: f64) -> Option<f64> {
        let mut state = self.state;
        self.advance(&mut state, value);
        self.state = state;
        self.current()
    }

    fn preview(&self, value: f64) -> Option<f64> {
        let mut trial = self.state;
        self.advance(&mut trial, value);
        Self::ready(&trial).then(|| Self::value_of(&trial))
    }

    fn current(&self) -> Option<f64> {
        Self::ready(&self.state).then(|| Self::value_of(&self.state))
    }

    fn reset(&mut self) {
        self.state = RsiState::default();
    }

    fn is_ready(&self) -> bool {
        Self::ready(&self.state)
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "RSI"
    }
}
