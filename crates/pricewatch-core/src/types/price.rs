//! Live price records.

use serde::{Deserialize, Serialize};

/// One decoded ticker update from the market stream.
///
/// Produced once per inbound event and folded into the symbol statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEvent {
    /// Symbol, e.g. `XRPUSDT`
    pub symbol: String,
    /// Last traded (close) price
    pub price: f64,
    /// Exchange time of the price, Unix milliseconds
    pub event_time: i64,
    /// Local receipt time, Unix milliseconds
    pub receipt_time: i64,
}

impl PriceEvent {
    /// Whether the symbol is quoted in the given currency (suffix match).
    #[inline]
    pub fn is_quoted_in(&self, quote: &str) -> bool {
        self.symbol.ends_with(quote)
    }
}

/// Latest known price of a symbol, as kept in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentPrice {
    pub symbol: String,
    /// Unix milliseconds
    pub time: i64,
    pub price: f64,
}

impl From<&PriceEvent> for CurrentPrice {
    fn from(event: &PriceEvent) -> Self {
        Self {
            symbol: event.symbol.clone(),
            time: event.event_time,
            price: event.price,
        }
    }
}
