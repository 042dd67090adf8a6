//! Configuration structures.

use pricewatch_core::error::{WatchError, WatchResult};
use pricewatch_data::DatabaseConfig;
use pricewatch_evaluator::EvaluatorConfig;
use pricewatch_monitor::ApiConfig;
use pricewatch_notify::NotifierConfig;
use pricewatch_stream::StreamConfig;
use pricewatch_tracker::TrackerConfig;
use serde::{Deserialize, Serialize};

/// Main application configuration.
///
/// Built once at startup and handed to each component by value. The
/// `[evaluator]` section is mandatory because its thresholds have no
/// defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub stream: StreamConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
    pub evaluator: EvaluatorConfig,
    #[serde(default)]
    pub notifier: NotifierConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

impl AppConfig {
    /// Defaults everywhere, with the given alert thresholds.
    pub fn with_thresholds(increment_threshold: f64, decrement_threshold: f64) -> Self {
        Self {
            app: AppSettings::default(),
            logging: LoggingConfig::default(),
            stream: StreamConfig::default(),
            tracker: TrackerConfig::default(),
            evaluator: EvaluatorConfig::new(increment_threshold, decrement_threshold),
            notifier: NotifierConfig::default(),
            database: DatabaseConfig::default(),
            api: ApiConfig::default(),
        }
    }

    /// Reject values no component can run with.
    pub fn validate(&self) -> WatchResult<()> {
        let tracker = &self.tracker;
        let evaluator = &self.evaluator;

        if tracker.window_size == 0 {
            return Err(invalid("tracker.window_size must be at least 1"));
        }
        if tracker.top_tokens_size == 0 {
            return Err(invalid("tracker.top_tokens_size must be at least 1"));
        }
        if tracker.quote_suffix.is_empty() {
            return Err(invalid("tracker.quote_suffix must not be empty"));
        }
        if evaluator.classification_window < 2 {
            return Err(invalid("evaluator.classification_window must be at least 2"));
        }
        if evaluator.candle_lookback < evaluator.classification_window {
            return Err(invalid(
                "evaluator.candle_lookback must not be smaller than evaluator.classification_window",
            ));
        }
        if evaluator.increment_threshold <= 0.0 {
            return Err(invalid("evaluator.increment_threshold must be positive"));
        }
        if evaluator.decrement_threshold <= 0.0 {
            return Err(invalid("evaluator.decrement_threshold must be positive"));
        }

        let intervals = [
            ("stream.probe_interval_secs", self.stream.probe_interval_secs),
            ("tracker.index_interval_secs", tracker.index_interval_secs),
            ("evaluator.interval_secs", evaluator.interval_secs),
            ("notifier.dispatch_interval_secs", self.notifier.dispatch_interval_secs),
            ("notifier.cleanup_interval_secs", self.notifier.cleanup_interval_secs),
        ];
        if let Some((name, _)) = intervals.iter().find(|(_, secs)| *secs == 0) {
            return Err(invalid(&format!("{} must be positive", name)));
        }

        Ok(())
    }
}

fn invalid(message: &str) -> WatchError {
    WatchError::Config(message.to_string())
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "pricewatch".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    /// Optional log file, written in addition to stdout
    pub file: Option<String>,
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}
