//! Shared price tracker.

use crate::config::TrackerConfig;
use crate::ranking::{rank, RankKey, RankOrder, TopToken};
use crate::statistic::SymbolStatistics;
use dashmap::DashMap;
use pricewatch_core::schedule::run_periodic;
use pricewatch_core::traits::PriceStore;
use pricewatch_core::types::{CurrentPrice, PriceEvent};
use pricewatch_stream::{StreamConnection, StreamFrame};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Frames ingested between cooperative yields.
const INGEST_BATCH: usize = 64;

/// Per-symbol statistics shared by ingestion, indexing and queries.
///
/// Symbols are created lazily on their first event. Each entry is locked
/// independently, so ingestion of one symbol never waits on another.
pub struct PriceTracker {
    config: TrackerConfig,
    symbols: DashMap<String, SymbolStatistics>,
    next_sequence: AtomicU64,
}

impl PriceTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            symbols: DashMap::new(),
            next_sequence: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    /// Route one event into its symbol's statistics.
    ///
    /// Returns false when the symbol is not quoted in the tracked currency.
    pub fn ingest_event(&self, event: PriceEvent) -> bool {
        if !event.is_quoted_in(&self.config.quote_suffix) {
            return false;
        }

        if let Some(mut stats) = self.symbols.get_mut(&event.symbol) {
            stats.push_price_event(event);
            return true;
        }

        let sequence = self.next_sequence.fetch_add(1, Ordering::Relaxed);
        let capacity = self.config.window_size;
        let symbol = event.symbol.clone();
        self.symbols
            .entry(symbol.clone())
            .or_insert_with(move || SymbolStatistics::new(symbol, capacity, sequence))
            .push_price_event(event);
        true
    }

    /// Route every decodable event of a frame, dropping malformed ones.
    ///
    /// Returns the number of events accepted.
    pub fn ingest_frame(&self, frame: &StreamFrame) -> usize {
        let mut accepted = 0;
        for result in frame.price_events() {
            match result {
                Ok(event) => {
                    if self.ingest_event(event) {
                        accepted += 1;
                    }
                }
                Err(e) => debug!(error = %e, "Dropping malformed ticker event"),
            }
        }
        accepted
    }

    /// Commit the latest event of every symbol into its window.
    ///
    /// Returns the number of symbols indexed.
    pub fn index_all(&self) -> usize {
        let mut indexed = 0;
        for mut entry in self.symbols.iter_mut() {
            if entry.value_mut().index().is_some() {
                indexed += 1;
            }
        }
        indexed
    }

    /// Ranking with the configured key, order and size.
    pub fn top_tokens(&self) -> Vec<TopToken> {
        self.rank(
            self.config.rank_by,
            self.config.rank_order,
            self.config.top_tokens_size,
        )
    }

    /// Rank qualifying symbols by `key`, keeping at most `limit`.
    pub fn rank(&self, key: RankKey, order: RankOrder, limit: usize) -> Vec<TopToken> {
        let entries: Vec<_> = self.symbols.iter().collect();
        rank(entries.iter().map(|e| e.value()), key, order, limit)
    }

    /// Projection of a single symbol.
    pub fn snapshot(&self, symbol: &str) -> Option<TopToken> {
        self.symbols.get(symbol).map(|stats| TopToken::from(stats.value()))
    }

    /// Latest live price of every symbol that has seen an event.
    pub fn latest_prices(&self) -> Vec<CurrentPrice> {
        let mut prices: Vec<CurrentPrice> = self
            .symbols
            .iter()
            .filter_map(|entry| entry.latest_event().map(CurrentPrice::from))
            .collect();
        prices.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        prices
    }

    /// Drain the stream queue forever, sleeping when it is empty.
    pub async fn run_ingestion(&self, connection: Arc<StreamConnection>) {
        let idle = self.config.idle_wait();
        loop {
            self.drain(|| connection.pop_frame()).await;
            tokio::time::sleep(idle).await;
        }
    }

    /// Ingest every queued frame, yielding to the runtime after each
    /// batch so a long backlog does not pin the worker.
    ///
    /// Returns the number of frames consumed.
    pub async fn drain(&self, mut next_frame: impl FnMut() -> Option<StreamFrame>) -> usize {
        let mut frames = 0;
        while let Some(frame) = next_frame() {
            self.ingest_frame(&frame);
            frames += 1;
            if frames % INGEST_BATCH == 0 {
                tokio::task::yield_now().await;
            }
        }
        frames
    }

    /// Run the indexing job forever.
    ///
    /// With a store and `persist_prices`, the live price of every symbol is
    /// upserted after each pass; store failures are logged and retried on
    /// the next pass.
    pub async fn run_indexing(&self, store: Option<Arc<dyn PriceStore>>) {
        let store = store.filter(|_| self.config.persist_prices);
        info!(
            interval_secs = self.config.index_interval_secs,
            persist = store.is_some(),
            "Starting indexing job"
        );

        run_periodic("tracker-index", self.config.index_interval(), || {
            let store = store.clone();
            async move { self.index_once(store.as_deref()).await }
        })
        .await
    }

    /// One indexing pass, followed by price persistence when a store is given.
    pub async fn index_once(&self, store: Option<&dyn PriceStore>) {
        let indexed = self.index_all();
        debug!(symbols = indexed, "Indexed symbol statistics");

        let Some(store) = store else {
            return;
        };
        let prices = self.latest_prices();
        if prices.is_empty() {
            return;
        }
        if let Err(e) = store.upsert_current_prices(&prices).await {
            warn!(store = store.name(), error = %e, "Failed to persist current prices");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use pricewatch_core::error::StoreError;
    use pricewatch_core::types::{Candle, Timeframe};
    use pricewatch_stream::decode_frame;
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicBool;

    fn event(symbol: &str, price: f64, event_time: i64) -> PriceEvent {
        PriceEvent {
            symbol: symbol.to_string(),
            price,
            event_time,
            receipt_time: event_time,
        }
    }

    fn tracker(window_size: usize) -> PriceTracker {
        PriceTracker::new(TrackerConfig {
            window_size,
            ..Default::default()
        })
    }

    #[derive(Default)]
    struct RecordingStore {
        prices: Mutex<Vec<CurrentPrice>>,
    }

    #[async_trait]
    impl PriceStore for RecordingStore {
        async fn tracked_symbols(&self) -> Result<Vec<String>, StoreError> {
            Ok(Vec::new())
        }

        async fn current_price(&self, _symbol: &str) -> Result<Option<CurrentPrice>, StoreError> {
            Ok(None)
        }

        async fn recent_candles(
            &self,
            _symbol: &str,
            _timeframe: Timeframe,
            _limit: usize,
        ) -> Result<Vec<Candle>, StoreError> {
            Ok(Vec::new())
        }

        async fn upsert_current_prices(&self, prices: &[CurrentPrice]) -> Result<(), StoreError> {
            self.prices.lock().extend_from_slice(prices);
            Ok(())
        }

        async fn upsert_candles(&self, _timeframe: Timeframe, _candles: &[Candle]) -> Result<(), StoreError> {
            Ok(())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    #[test]
    fn test_quote_filter_and_lazy_creation() {
        let tracker = tracker(5);
        assert!(tracker.ingest_event(event("BTCUSDT", 50_000.0, 0)));
        assert!(!tracker.ingest_event(event("ETHBTC", 0.05, 0)));
        assert!(tracker.ingest_event(event("BTCUSDT", 50_100.0, 1)));

        assert_eq!(tracker.symbol_count(), 1);
        let snapshot = tracker.snapshot("BTCUSDT").unwrap();
        assert_eq!(snapshot.latest_price, 50_100.0);
        assert!(snapshot.recent_prices.is_empty());
        assert!(tracker.snapshot("ETHBTC").is_none());
    }

    #[test]
    fn test_ingest_frame_skips_malformed_events() {
        let text = r#"{"stream":"!ticker_1h@arr","data":[
            {"E": 2, "s": "XRPUSDT", "c": "0.6487", "C": 1},
            {"E": 2, "s": "BADUSDT", "c": "abc", "C": 1},
            {"E": 2, "s": "ETHBTC", "c": "0.05", "C": 1}
        ]}"#;
        let frame = decode_frame(text, 3).unwrap().unwrap();
        let tracker = tracker(5);

        assert_eq!(tracker.ingest_frame(&frame), 1);
        assert_eq!(tracker.symbol_count(), 1);
    }

    #[tokio::test]
    async fn test_drain_yields_during_long_backlog() {
        let text = r#"{"data":[{"E": 2, "s": "XRPUSDT", "c": "0.6487", "C": 1}]}"#;
        let frame = decode_frame(text, 1).unwrap().unwrap();
        let mut backlog: VecDeque<StreamFrame> = std::iter::repeat(frame).take(200).collect();

        let other_task_ran = Arc::new(AtomicBool::new(false));
        {
            let other_task_ran = other_task_ran.clone();
            tokio::spawn(async move { other_task_ran.store(true, Ordering::SeqCst) });
        }

        // Single-threaded runtime: the spawned task only runs if drain yields
        let mut ran_before_backlog_emptied = false;
        let tracker = tracker(5);
        let consumed = tracker
            .drain(|| {
                if backlog.len() == 1 {
                    ran_before_backlog_emptied = other_task_ran.load(Ordering::SeqCst);
                }
                backlog.pop_front()
            })
            .await;

        assert_eq!(consumed, 200);
        assert!(ran_before_backlog_emptied);
        assert_eq!(tracker.symbol_count(), 1);
    }

    #[test]
    fn test_window_bounded_after_many_index_passes() {
        let tracker = tracker(3);
        for i in 0..4 {
            tracker.ingest_event(event("SOLUSDT", 100.0 + i as f64, i * 60_000));
            assert_eq!(tracker.index_all(), 1);
        }

        let snapshot = tracker.snapshot("SOLUSDT").unwrap();
        assert_eq!(snapshot.recent_prices, vec![103.0, 102.0, 101.0]);
    }

    #[test]
    fn test_top_tokens_uses_configured_size() {
        let tracker = PriceTracker::new(TrackerConfig {
            top_tokens_size: 2,
            ..Default::default()
        });
        for symbol in ["AUSDT", "BUSDT", "CUSDT"] {
            tracker.ingest_event(event(symbol, 100.0, 0));
        }
        tracker.index_all();
        for (i, symbol) in ["AUSDT", "BUSDT", "CUSDT"].iter().enumerate() {
            tracker.ingest_event(event(symbol, 100.0 + (i + 1) as f64, 1_000));
        }
        tracker.index_all();

        let top = tracker.top_tokens();
        let symbols: Vec<&str> = top.iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["CUSDT", "BUSDT"]);
    }

    #[tokio::test]
    async fn test_index_once_persists_latest_prices() {
        let tracker = tracker(5);
        tracker.ingest_event(event("BUSDT", 2.0, 10));
        tracker.ingest_event(event("AUSDT", 1.0, 20));
        let store = RecordingStore::default();

        tracker.index_once(Some(&store)).await;

        let saved = store.prices.lock().clone();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].symbol, "AUSDT");
        assert_eq!(saved[0].time, 20);
        assert_eq!(tracker.snapshot("AUSDT").unwrap().recent_prices, vec![1.0]);
    }
}
