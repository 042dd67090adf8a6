//! Price store trait definitions.

use crate::error::StoreError;
use crate::types::{Candle, CurrentPrice, Timeframe};
use async_trait::async_trait;

/// Query/upsert boundary of the persisted price history.
///
/// Implementations must tolerate concurrent callers; the tracker writes
/// current prices while the evaluator reads candles.
#[async_trait]
pub trait PriceStore: Send + Sync {
    /// Symbols with a known current price, ascending.
    async fn tracked_symbols(&self) -> Result<Vec<String>, StoreError>;

    /// Latest known price of a symbol.
    async fn current_price(&self, symbol: &str) -> Result<Option<CurrentPrice>, StoreError>;

    /// Most recent closed candles of a symbol.
    ///
    /// # Returns
    /// At most `limit` candles ordered by open time, newest first
    async fn recent_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>, StoreError>;

    /// Insert or replace current prices, keyed on symbol.
    async fn upsert_current_prices(&self, prices: &[CurrentPrice]) -> Result<(), StoreError>;

    /// Insert or replace candles, keyed on (symbol, open time).
    async fn upsert_candles(&self, timeframe: Timeframe, candles: &[Candle])
        -> Result<(), StoreError>;

    /// Get the store name.
    fn name(&self) -> &str;
}
