//! Price watch CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use pricewatch_config::{load_config, AppConfig};
use pricewatch_monitor::setup_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::ValidateConfig = cli.command {
        return cli::commands::validate::run(&cli.config);
    }

    let config = load(&cli)?;

    let level = cli
        .log_level
        .map_or(config.logging.level.as_str(), |level| level.as_str());
    let json = cli.json_logs || config.logging.is_json();
    let _log_guard = setup_logging(level, json, config.logging.file.as_deref());

    match cli.command {
        Commands::Tracker => cli::commands::tracker::run(config).await,
        Commands::Evaluator => cli::commands::evaluator::run(config).await,
        Commands::Run => cli::commands::run::run(config).await,
        Commands::ImportCandles(args) => cli::commands::import::run(args, config).await,
        Commands::ValidateConfig => Ok(()),
    }
}

fn load(cli: &Cli) -> Result<AppConfig> {
    let config = load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}
