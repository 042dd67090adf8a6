//! Tracker and evaluator in one process.

use anyhow::{Context, Result};
use pricewatch_config::AppConfig;
use pricewatch_core::traits::PriceStore;
use pricewatch_data::SqliteStore;
use std::sync::Arc;
use tokio::task::JoinSet;

pub async fn run(config: AppConfig) -> Result<()> {
    let store: Arc<dyn PriceStore> = Arc::new(
        SqliteStore::connect(&config.database)
            .await
            .context("Failed to open price store")?,
    );

    let mut jobs = JoinSet::new();
    super::evaluator::spawn(&config, store.clone(), &mut jobs)?;
    let tracker_store = config.tracker.persist_prices.then_some(store);
    let connection = super::tracker::spawn(&config, tracker_store, &mut jobs);

    super::run_until_shutdown(jobs, Some(connection)).await
}
