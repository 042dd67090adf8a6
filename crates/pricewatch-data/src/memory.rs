//! In-memory price store.

use async_trait::async_trait;
use parking_lot::RwLock;
use pricewatch_core::error::StoreError;
use pricewatch_core::traits::PriceStore;
use pricewatch_core::types::{Candle, CurrentPrice, Timeframe};
use std::collections::{BTreeMap, HashMap};

/// Price store held entirely in memory.
///
/// Candles are keyed by (symbol, timeframe) and ordered by open time, so an
/// upsert of an existing open time replaces the candle.
#[derive(Debug, Default)]
pub struct MemoryStore {
    prices: RwLock<BTreeMap<String, CurrentPrice>>,
    candles: RwLock<HashMap<String, BTreeMap<i64, Candle>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn series_key(symbol: &str, timeframe: Timeframe) -> String {
        format!("{}_{}", symbol, timeframe)
    }

    /// Number of candles stored for a symbol and timeframe.
    pub fn candle_count(&self, symbol: &str, timeframe: Timeframe) -> usize {
        self.candles
            .read()
            .get(&Self::series_key(symbol, timeframe))
            .map_or(0, BTreeMap::len)
    }

    /// Remove everything stored for a symbol.
    pub fn clear(&self, symbol: &str) {
        self.prices.write().remove(symbol);
        let prefix = format!("{}_", symbol);
        self.candles.write().retain(|k, _| !k.starts_with(&prefix));
    }
}

#[async_trait]
impl PriceStore for MemoryStore {
    async fn tracked_symbols(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.prices.read().keys().cloned().collect())
    }

    async fn current_price(&self, symbol: &str) -> Result<Option<CurrentPrice>, StoreError> {
        Ok(self.prices.read().get(symbol).cloned())
    }

    async fn recent_candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>, StoreError> {
        let candles = self.candles.read();
        Ok(candles
            .get(&Self::series_key(symbol, timeframe))
            .map(|series| series.values().rev().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn upsert_current_prices(&self, prices: &[CurrentPrice]) -> Result<(), StoreError> {
        let mut stored = self.prices.write();
        for price in prices {
            stored.insert(price.symbol.clone(), price.clone());
        }
        Ok(())
    }

    async fn upsert_candles(&self, timeframe: Timeframe, candles: &[Candle]) -> Result<(), StoreError> {
        let mut stored = self.candles.write();
        for candle in candles {
            stored
                .entry(Self::series_key(&candle.symbol, timeframe))
                .or_default()
                .insert(candle.open_time, candle.clone());
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(symbol: &str, open_time: i64, close: f64) -> Candle {
        Candle::new(symbol, open_time, open_time + 59_999, close, close, close, close, 1.0)
    }

    #[tokio::test]
    async fn test_recent_candles_newest_first_with_limit() {
        let store = MemoryStore::new();
        let candles: Vec<Candle> = (0..5).map(|i| candle("BTCUSDT", i * 60_000, i as f64)).collect();
        store.upsert_candles(Timeframe::Minute1, &candles).await.unwrap();

        let recent = store.recent_candles("BTCUSDT", Timeframe::Minute1, 3).await.unwrap();
        let opens: Vec<i64> = recent.iter().map(|c| c.open_time).collect();
        assert_eq!(opens, vec![240_000, 180_000, 120_000]);

        assert!(store
            .recent_candles("BTCUSDT", Timeframe::Minute15, 3)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_upsert_replaces_same_open_time() {
        let store = MemoryStore::new();
        store
            .upsert_candles(Timeframe::Minute1, &[candle("ETHUSDT", 0, 1.0)])
            .await
            .unwrap();
        store
            .upsert_candles(Timeframe::Minute1, &[candle("ETHUSDT", 0, 2.0)])
            .await
            .unwrap();

        assert_eq!(store.candle_count("ETHUSDT", Timeframe::Minute1), 1);
        let recent = store.recent_candles("ETHUSDT", Timeframe::Minute1, 10).await.unwrap();
        assert_eq!(recent[0].close, 2.0);
    }

    #[tokio::test]
    async fn test_tracked_symbols_sorted() {
        let store = MemoryStore::new();
        let prices = ["SOLUSDT", "BTCUSDT"].map(|symbol| CurrentPrice {
            symbol: symbol.to_string(),
            time: 1,
            price: 1.0,
        });
        store.upsert_current_prices(&prices).await.unwrap();

        assert_eq!(store.tracked_symbols().await.unwrap(), vec!["BTCUSDT", "SOLUSDT"]);
        assert!(store.current_price("XRPUSDT").await.unwrap().is_none());

        store.clear("BTCUSDT");
        assert_eq!(store.tracked_symbols().await.unwrap(), vec!["SOLUSDT"]);
    }
}
