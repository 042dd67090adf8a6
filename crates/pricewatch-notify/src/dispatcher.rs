//! Sequential at-least-once delivery of queued notifications.

use crate::notification::Notification;
use crate::queue::NotificationQueue;
use pricewatch_core::error::DeliveryError;
use pricewatch_core::schedule::run_periodic;
use pricewatch_core::traits::AlertChannel;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Delivers pending notifications in insertion order.
pub struct Dispatcher {
    queue: Arc<NotificationQueue>,
    channel: Arc<dyn AlertChannel>,
}

impl Dispatcher {
    pub fn new(queue: Arc<NotificationQueue>, channel: Arc<dyn AlertChannel>) -> Self {
        Self { queue, channel }
    }

    /// Deliver every pending notification, preceded by a batch separator.
    ///
    /// An empty queue makes no external call at all, separator included, so
    /// idle passes do not post bare separators to the chat.
    ///
    /// Each notification is marked delivered as soon as its call succeeds.
    /// The first failure aborts the pass: earlier entries stay delivered and
    /// the failed one plus everything after it stay pending, in order, for
    /// the next pass.
    ///
    /// # Returns
    /// Number of notifications delivered (separator excluded)
    pub async fn dispatch(&self) -> Result<usize, DeliveryError> {
        let pending = self.queue.pending();
        if pending.is_empty() {
            return Ok(0);
        }

        self.channel.deliver(&Notification::separator().message).await?;

        let mut delivered = 0;
        for notification in pending {
            if let Err(e) = self.channel.deliver(&notification.message).await {
                warn!(
                    channel = self.channel.name(),
                    id = %notification.id,
                    delivered,
                    "Dispatch aborted, remaining notifications stay pending"
                );
                return Err(e);
            }
            self.queue.mark_delivered(&notification.id);
            delivered += 1;
        }

        Ok(delivered)
    }

    /// Run the dispatch job forever.
    pub async fn run(&self, period: Duration) {
        info!(
            channel = self.channel.name(),
            interval_secs = period.as_secs(),
            "Starting dispatcher"
        );
        run_periodic("notification-dispatch", period, || async move {
            match self.dispatch().await {
                Ok(0) => {}
                Ok(count) => info!(count, "Delivered notifications"),
                Err(e) => error!(error = %e, "Notification delivery failed"),
            }
        })
        .await
    }
}
