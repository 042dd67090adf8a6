//! CLI command implementations.

pub mod evaluator;
pub mod import;
pub mod run;
pub mod tracker;
pub mod validate;

use anyhow::{anyhow, Result};
use pricewatch_stream::StreamConnection;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, info};

/// Wait for Ctrl-C or for any job to stop, then tear everything down.
///
/// Every job loops forever, so a job finishing on its own is an error.
pub(crate) async fn run_until_shutdown(
    mut jobs: JoinSet<()>,
    connection: Option<Arc<StreamConnection>>,
) -> Result<()> {
    let outcome = tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            info!("Shutdown requested");
            signal.map_err(Into::into)
        }
        Some(joined) = jobs.join_next() => {
            if let Err(e) = joined {
                error!(error = %e, "Job panicked");
            }
            Err(anyhow!("A background job stopped unexpectedly"))
        }
    };

    jobs.shutdown().await;
    if let Some(connection) = connection {
        connection.terminate().await;
    }
    outcome
}
