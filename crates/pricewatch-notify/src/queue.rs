//! Ordered in-memory notification queue.

use crate::notification::Notification;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use pricewatch_core::schedule::run_periodic;
use pricewatch_core::types::AlertCase;
use std::collections::HashMap;
use tracing::{debug, info};

#[derive(Debug, Default)]
struct QueueState {
    /// Insertion order
    entries: Vec<Notification>,
    /// Last enqueue time per (symbol, case)
    last_alerted: HashMap<(String, AlertCase), DateTime<Utc>>,
}

/// Insertion-ordered notification queue shared by the evaluator, the
/// dispatcher and the cleanup job.
///
/// Every operation takes the lock once and never across an await point.
#[derive(Debug, Default)]
pub struct NotificationQueue {
    state: Mutex<QueueState>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a notification.
    pub fn push(&self, notification: Notification) {
        self.state.lock().entries.push(notification);
    }

    /// Append an alert unless one for the same symbol and case was enqueued
    /// less than `cooldown` before `now`.
    ///
    /// Returns whether the notification was queued.
    pub fn push_alert(
        &self,
        symbol: &str,
        alert_case: AlertCase,
        notification: Notification,
        now: DateTime<Utc>,
        cooldown: Duration,
    ) -> bool {
        let mut state = self.state.lock();
        let key = (symbol.to_string(), alert_case);

        if let Some(last) = state.last_alerted.get(&key) {
            if now - *last < cooldown {
                debug!(symbol, case = %alert_case, "Alert suppressed by cooldown");
                return false;
            }
        }

        state.last_alerted.insert(key, now);
        state.entries.push(notification);
        true
    }

    /// Undelivered notifications in insertion order.
    pub fn pending(&self) -> Vec<Notification> {
        self.state
            .lock()
            .entries
            .iter()
            .filter(|n| !n.delivered)
            .cloned()
            .collect()
    }

    pub fn pending_count(&self) -> usize {
        self.state.lock().entries.iter().filter(|n| !n.delivered).count()
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flag a notification as delivered. Returns false for unknown ids.
    pub fn mark_delivered(&self, id: &str) -> bool {
        let mut state = self.state.lock();
        match state.entries.iter_mut().find(|n| n.id == id) {
            Some(notification) => {
                notification.delivered = true;
                true
            }
            None => false,
        }
    }

    /// Remove delivered entries; undelivered ones are never touched.
    ///
    /// Returns the number removed.
    pub fn cleanup_delivered(&self) -> usize {
        let mut state = self.state.lock();
        let before = state.entries.len();
        state.entries.retain(|n| !n.delivered);
        before - state.entries.len()
    }

    /// Forget cooldown marks older than `cooldown`.
    pub fn prune_cooldowns(&self, now: DateTime<Utc>, cooldown: Duration) -> usize {
        let mut state = self.state.lock();
        let before = state.last_alerted.len();
        state.last_alerted.retain(|_, last| now - *last < cooldown);
        before - state.last_alerted.len()
    }

    /// Run the cleanup job forever.
    pub async fn run_cleanup(&self, period: std::time::Duration, cooldown: Duration) {
        info!(interval_secs = period.as_secs(), "Starting notification cleanup job");
        run_periodic("notification-cleanup", period, || async move {
            let removed = self.cleanup_delivered();
            let expired = self.prune_cooldowns(Utc::now(), cooldown);
            debug!(removed, expired, remaining = self.len(), "Cleaned up notifications");
        })
        .await
    }
}
