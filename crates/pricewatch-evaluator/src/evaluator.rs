//! Periodic evaluation of every tracked symbol.

use crate::config::EvaluatorConfig;
use crate::trend::classify;
use chrono::Utc;
use pricewatch_core::error::StoreError;
use pricewatch_core::math::round2;
use pricewatch_core::schedule::run_periodic;
use pricewatch_core::traits::{PriceStore, StreamingIndicator};
use pricewatch_core::types::EvaluationCandidate;
use pricewatch_indicators::Rsi;
use pricewatch_notify::{Notification, NotificationQueue};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Batch trend evaluator feeding the notification queue.
pub struct Evaluator {
    config: EvaluatorConfig,
    store: Arc<dyn PriceStore>,
    queue: Arc<NotificationQueue>,
    quote_suffix: String,
}

impl Evaluator {
    pub fn new(config: EvaluatorConfig, store: Arc<dyn PriceStore>, queue: Arc<NotificationQueue>) -> Self {
        Self {
            config,
            store,
            queue,
            quote_suffix: "USDT".to_string(),
        }
    }

    /// Quote currency stripped from symbols in alert headers.
    pub fn with_quote_suffix(mut self, quote_suffix: impl Into<String>) -> Self {
        self.quote_suffix = quote_suffix.into();
        self
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluate one symbol.
    ///
    /// Reads the latest `candle_lookback` candles, substitutes the live price
    /// for the last close, recomputes RSI from a fresh state and classifies
    /// the last `classification_window` values. Symbols with too little
    /// history produce no candidate.
    pub async fn evaluate_symbol(&self, symbol: &str) -> Result<Option<EvaluationCandidate>, StoreError> {
        let mut candles = self
            .store
            .recent_candles(symbol, self.config.timeframe, self.config.candle_lookback)
            .await?;
        candles.reverse();

        let live = self.store.current_price(symbol).await?;
        if let (Some(live), Some(last)) = (live, candles.last_mut()) {
            *last = last.clone().with_live_close(live.price);
        }

        let Some(latest_price) = candles.last().map(|c| c.close) else {
            debug!(symbol, "No candles stored");
            return Ok(None);
        };

        let series = oscillator_series(candles.iter().map(|c| c.close));
        let start = series.len().saturating_sub(self.config.classification_window);
        let recent = &series[start..];
        if recent.len() < 2 {
            debug!(symbol, values = recent.len(), "Not enough RSI history");
            return Ok(None);
        }

        let candidate = classify(
            recent,
            self.config.increment_threshold,
            self.config.decrement_threshold,
        )
        .map(|(alert_case, oscillator_delta)| EvaluationCandidate {
            symbol: symbol.to_string(),
            alert_case,
            oscillator_delta,
            latest_price,
            recent_oscillator_series: recent.to_vec(),
        });

        Ok(candidate)
    }

    /// Evaluate every tracked symbol.
    ///
    /// A store error for one symbol is logged and the symbol skipped. The
    /// result holds enabled cases only, highest latest RSI first.
    pub async fn evaluate_all(&self) -> Result<Vec<EvaluationCandidate>, StoreError> {
        let symbols = self.store.tracked_symbols().await?;
        let mut candidates = Vec::new();

        for symbol in &symbols {
            match self.evaluate_symbol(symbol).await {
                Ok(Some(candidate)) if self.config.is_enabled(candidate.alert_case) => {
                    candidates.push(candidate)
                }
                Ok(_) => {}
                Err(e) => warn!(symbol = %symbol, error = %e, "Skipping symbol"),
            }
        }

        candidates.sort_by(|a, b| {
            b.latest_oscillator()
                .partial_cmp(&a.latest_oscillator())
                .unwrap_or(Ordering::Equal)
        });

        debug!(symbols = symbols.len(), candidates = candidates.len(), "Evaluation finished");
        Ok(candidates)
    }

    /// One evaluation pass: candidates outside their cooldown are queued.
    ///
    /// # Returns
    /// Number of notifications queued
    pub async fn run_pass(&self) -> Result<usize, StoreError> {
        let candidates = self.evaluate_all().await?;
        let now = Utc::now();
        let cooldown = self.config.cooldown();

        let mut queued = 0;
        for candidate in &candidates {
            let notification = Notification::from_candidate(candidate, &self.quote_suffix, now);
            if self
                .queue
                .push_alert(&candidate.symbol, candidate.alert_case, notification, now, cooldown)
            {
                info!(
                    symbol = %candidate.symbol,
                    case = %candidate.alert_case,
                    delta = candidate.oscillator_delta,
                    "Alert queued"
                );
                queued += 1;
            }
        }
        Ok(queued)
    }

    /// Run the evaluation job forever.
    pub async fn run(&self) {
        info!(
            store = self.store.name(),
            interval_secs = self.config.interval_secs,
            timeframe = %self.config.timeframe,
            "Starting evaluator"
        );
        run_periodic("evaluator", self.config.interval(), || async move {
            if let Err(e) = self.run_pass().await {
                error!(error = %e, "Evaluation pass failed");
            }
        })
        .await
    }
}

/// RSI after every close, oldest first, rounded to 2 decimals.
///
/// Closes before the indicator is ready produce no value.
pub fn oscillator_series(closes: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let mut rsi = Rsi::default();
    closes
        .into_iter()
        .filter_map(|close| rsi.update(close).map(round2))
        .collect()
}
