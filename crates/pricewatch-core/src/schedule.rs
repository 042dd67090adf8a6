//! Periodic job runner.
//!
//! Each job runs in its own loop: the next firing waits for the current run
//! to finish, so a job never overlaps itself. Independent jobs are spawned
//! as separate tasks and keep their own cadence.

use std::future::Future;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

/// Run `job` every `period`, starting one period from now.
///
/// A run that takes longer than `period` delays the following run instead of
/// queueing a burst of catch-up runs.
pub async fn run_periodic<F, Fut>(name: &'static str, period: Duration, mut job: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        debug!(job = name, "Running periodic job");
        job().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_periodic_job_never_overlaps() {
        let running = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));
        let runs = Arc::new(AtomicUsize::new(0));

        let handle = {
            let running = running.clone();
            let max_seen = max_seen.clone();
            let runs = runs.clone();
            tokio::spawn(run_periodic("slow", Duration::from_secs(1), move || {
                let running = running.clone();
                let max_seen = max_seen.clone();
                let runs = runs.clone();
                async move {
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    max_seen.fetch_max(now, Ordering::SeqCst);
                    // Three times longer than the period.
                    tokio::time::sleep(Duration::from_secs(3)).await;
                    running.fetch_sub(1, Ordering::SeqCst);
                    runs.fetch_add(1, Ordering::SeqCst);
                }
            }))
        };

        tokio::time::sleep(Duration::from_secs(20)).await;
        handle.abort();

        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
        assert!(runs.load(Ordering::SeqCst) >= 4);
    }
}
