//! Live price tracking command.

use anyhow::{Context, Result};
use pricewatch_config::AppConfig;
use pricewatch_core::traits::PriceStore;
use pricewatch_data::SqliteStore;
use pricewatch_monitor::ApiServer;
use pricewatch_stream::{supervise, StreamConnection};
use pricewatch_tracker::PriceTracker;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, info};

pub async fn run(config: AppConfig) -> Result<()> {
    let store: Option<Arc<dyn PriceStore>> = if config.tracker.persist_prices {
        let store = SqliteStore::connect(&config.database)
            .await
            .context("Failed to open price store")?;
        let store: Arc<dyn PriceStore> = Arc::new(store);
        Some(store)
    } else {
        None
    };

    let mut jobs = JoinSet::new();
    let connection = spawn(&config, store, &mut jobs);
    super::run_until_shutdown(jobs, Some(connection)).await
}

/// Spawn stream supervision, ingestion, indexing and the API.
pub(crate) fn spawn(
    config: &AppConfig,
    store: Option<Arc<dyn PriceStore>>,
    jobs: &mut JoinSet<()>,
) -> Arc<StreamConnection> {
    let connection = StreamConnection::new(config.stream.clone());
    let tracker = Arc::new(PriceTracker::new(config.tracker.clone()));

    info!(
        endpoint = %config.stream.endpoint,
        channel = %config.stream.channel,
        window_size = config.tracker.window_size,
        persist = store.is_some(),
        "Starting tracker"
    );

    jobs.spawn(supervise(connection.clone()));

    {
        let tracker = tracker.clone();
        let connection = connection.clone();
        jobs.spawn(async move { tracker.run_ingestion(connection).await });
    }

    {
        let tracker = tracker.clone();
        jobs.spawn(async move { tracker.run_indexing(store).await });
    }

    let server = ApiServer::new(tracker, Some(connection.clone()));
    let bind = config.api.bind.clone();
    jobs.spawn(async move {
        if let Err(e) = server.serve(&bind).await {
            error!(bind = %bind, error = %e, "API server stopped");
        }
    });

    connection
}
