//! Notifier settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Alert delivery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    /// Bot API base URL
    pub api_endpoint: String,
    pub bot_token: String,
    pub chat_id: i64,
    pub dispatch_interval_secs: u64,
    /// Period of the delivered-entry cleanup
    pub cleanup_interval_secs: u64,
    pub request_timeout_secs: u64,
}

impl NotifierConfig {
    pub fn dispatch_interval(&self) -> Duration {
        Duration::from_secs(self.dispatch_interval_secs)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Full `sendMessage` URL.
    pub fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_endpoint.trim_end_matches('/'),
            self.bot_token
        )
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            api_endpoint: "https://api.telegram.org".to_string(),
            bot_token: String::new(),
            chat_id: 0,
            dispatch_interval_secs: 60,
            cleanup_interval_secs: 3600,
            request_timeout_secs: 10,
        }
    }
}
