//! Stream connection settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Market stream configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// WebSocket endpoint
    pub endpoint: String,
    /// Channel to subscribe to
    pub channel: String,
    /// Liveness probe period
    pub probe_interval_secs: u64,
    /// Forced reconnect period, 0 disables it
    pub refresh_interval_secs: u64,
}

impl StreamConfig {
    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.probe_interval_secs)
    }

    pub fn refresh_interval(&self) -> Option<Duration> {
        (self.refresh_interval_secs > 0).then(|| Duration::from_secs(self.refresh_interval_secs))
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            endpoint: "wss://stream.binance.com:9443/stream".to_string(),
            channel: "!ticker_1h@arr".to_string(),
            probe_interval_secs: 10,
            refresh_interval_secs: 3600,
        }
    }
}
