//! Candle (OHLCV) records as persisted in the price store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A closed fixed-interval candle for one symbol.
/// Prices are f64 for fast indicator calculations; the store keeps them as
/// REAL columns, so round-trips are bit exact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Symbol identifier
    pub symbol: String,
    /// Open time, Unix milliseconds
    pub open_time: i64,
    /// Close time, Unix milliseconds
    pub close_time: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Base asset volume
    pub volume: f64,
}

impl Candle {
    /// Create a new candle.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        symbol: impl Into<String>,
        open_time: i64,
        close_time: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            open_time,
            close_time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Replace the close price, widening high/low if needed.
    pub fn with_live_close(mut self, price: f64) -> Self {
        self.close = price;
        self.high = self.high.max(price);
        self.low = self.low.min(price);
        self
    }

    /// Get the open time as a DateTime.
    pub fn open_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.open_time)
    }

    /// Calculate the candle's range (high - low).
    #[inline]
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}
