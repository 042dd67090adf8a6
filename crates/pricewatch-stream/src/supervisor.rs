//! Connection supervision timers.

use crate::connection::StreamConnection;
use pricewatch_core::schedule::run_periodic;
use std::sync::Arc;
use tracing::{error, info};

/// Keep the connection alive for the lifetime of the process.
///
/// Connects once up front, then runs two independent timers: a short
/// liveness probe that reconnects whenever the socket is down, and an
/// optional long refresh that tears down and rebuilds a healthy socket.
pub async fn supervise(connection: Arc<StreamConnection>) {
    if let Err(e) = connection.connect().await {
        error!(error = %e, "Initial market stream connection failed, probe will retry");
    }

    let refresh_period = connection.config().refresh_interval();
    let probe = {
        let connection = connection.clone();
        run_periodic("stream-probe", connection.config().probe_interval(), move || {
            let connection = connection.clone();
            async move { respawn_if_dead(&connection).await }
        })
    };

    match refresh_period {
        Some(period) => {
            let refresh = run_periodic("stream-refresh", period, move || {
                let connection = connection.clone();
                async move { refresh(&connection).await }
            });
            tokio::join!(probe, refresh);
        }
        None => probe.await,
    }
}

async fn respawn_if_dead(connection: &Arc<StreamConnection>) {
    if connection.is_alive() {
        return;
    }
    info!("Market stream connection respawning...");
    if let Err(e) = connection.connect().await {
        error!(error = %e, "Market stream respawn failed");
    }
}

async fn refresh(connection: &Arc<StreamConnection>) {
    info!("Market stream connection refreshing...");
    connection.terminate().await;
    if let Err(e) = connection.connect().await {
        error!(error = %e, "Market stream refresh failed, probe will retry");
    }
}
