//! Validate configuration command.

use anyhow::Result;
use pricewatch_config::load_config;
use std::path::Path;

pub fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };
    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Err(e.into());
    }

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("Stream: {} ({})", config.stream.endpoint, config.stream.channel);
    println!("Ranking: top {} by {} {}", config.tracker.top_tokens_size, config.tracker.rank_by, config.tracker.rank_order);
    println!(
        "Thresholds: +{} / -{} on {} candles",
        config.evaluator.increment_threshold, config.evaluator.decrement_threshold, config.evaluator.timeframe
    );
    println!("Enabled cases: {:?}", config.evaluator.enabled_cases);
    println!("Database: {}", config.database.url);
    println!("API: {}", config.api.bind);

    Ok(())
}
