//! Tracker settings.

use crate::ranking::{RankKey, RankOrder};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Live statistics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Quote currency suffix a symbol must end with to be tracked
    pub quote_suffix: String,
    /// Maximum samples kept per symbol (W)
    pub window_size: usize,
    /// Period of the indexing job
    pub index_interval_secs: u64,
    /// Entries returned by the ranking query (N)
    pub top_tokens_size: usize,
    /// Ranking sort key
    pub rank_by: RankKey,
    /// Ranking sort direction
    pub rank_order: RankOrder,
    /// Sleep of the ingestion loop when the stream queue is empty
    pub idle_wait_ms: u64,
    /// Upsert live prices into the store after each indexing pass
    pub persist_prices: bool,
}

impl TrackerConfig {
    pub fn index_interval(&self) -> Duration {
        Duration::from_secs(self.index_interval_secs)
    }

    pub fn idle_wait(&self) -> Duration {
        Duration::from_millis(self.idle_wait_ms)
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            quote_suffix: "USDT".to_string(),
            window_size: 120,
            index_interval_secs: 60,
            top_tokens_size: 50,
            rank_by: RankKey::Velocity,
            rank_order: RankOrder::Descending,
            idle_wait_ms: 500,
            persist_prices: true,
        }
    }
}
