//! Trend evaluation and alert delivery command.

use anyhow::{Context, Result};
use pricewatch_config::AppConfig;
use pricewatch_core::traits::{AlertChannel, PriceStore};
use pricewatch_data::SqliteStore;
use pricewatch_evaluator::Evaluator;
use pricewatch_notify::{Dispatcher, NotificationQueue, TelegramNotifier};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::info;

pub async fn run(config: AppConfig) -> Result<()> {
    let store = SqliteStore::connect(&config.database)
        .await
        .context("Failed to open price store")?;

    let mut jobs = JoinSet::new();
    spawn(&config, Arc::new(store), &mut jobs)?;
    super::run_until_shutdown(jobs, None).await
}

/// Spawn the evaluation, dispatch and cleanup jobs.
pub(crate) fn spawn(config: &AppConfig, store: Arc<dyn PriceStore>, jobs: &mut JoinSet<()>) -> Result<()> {
    let channel: Arc<dyn AlertChannel> = Arc::new(
        TelegramNotifier::new(config.notifier.clone()).context("Failed to create the alert channel")?,
    );
    let queue = Arc::new(NotificationQueue::new());
    let evaluator = Evaluator::new(config.evaluator.clone(), store, queue.clone())
        .with_quote_suffix(config.tracker.quote_suffix.clone());
    let dispatcher = Dispatcher::new(queue.clone(), channel);

    info!(
        increment_threshold = config.evaluator.increment_threshold,
        decrement_threshold = config.evaluator.decrement_threshold,
        "Starting evaluator"
    );

    jobs.spawn(async move { evaluator.run().await });

    let dispatch_interval = config.notifier.dispatch_interval();
    jobs.spawn(async move { dispatcher.run(dispatch_interval).await });

    let cleanup_interval = config.notifier.cleanup_interval();
    let cooldown = config.evaluator.cooldown();
    jobs.spawn(async move { queue.run_cleanup(cleanup_interval, cooldown).await });

    Ok(())
}
