//! Database settings.

use serde::{Deserialize, Serialize};

/// Price store connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite URL, e.g. `sqlite://database/pricewatch.db` or `sqlite::memory:`
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://database/pricewatch.db".to_string(),
            max_connections: 5,
        }
    }
}
