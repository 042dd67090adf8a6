//! Configuration management.

mod settings;

pub use settings::{AppConfig, AppSettings, LoggingConfig};

use config::{Config, ConfigError, Environment, File, FileFormat};
use std::path::Path;

const ENV_PREFIX: &str = "PRICEWATCH";

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Load configuration from a TOML file, overridden by `PRICEWATCH_*`
/// environment variables (`PRICEWATCH_TRACKER__WINDOW_SIZE=60`).
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(environment())
        .build()?;

    config.try_deserialize()
}

/// Load configuration from TOML text, with the same environment overrides.
pub fn load_config_str(toml: &str) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .add_source(environment())
        .build()?;

    config.try_deserialize()
}
