//! Candle import command.

use crate::cli::ImportArgs;
use anyhow::{Context, Result};
use pricewatch_config::AppConfig;
use pricewatch_data::{import_csv, SqliteStore};

pub async fn run(args: ImportArgs, config: AppConfig) -> Result<()> {
    let path = args
        .file
        .to_str()
        .context("Candle file path is not valid UTF-8")?;
    let symbol = args.symbol.to_ascii_uppercase();

    let store = SqliteStore::connect(&config.database)
        .await
        .context("Failed to open price store")?;
    let imported = import_csv(&store, path, &symbol, args.timeframe)
        .await
        .with_context(|| format!("Failed to import {}", path))?;

    println!("Imported {} {} candles for {}", imported, args.timeframe, symbol);
    Ok(())
}
