//! Alert notification pipeline.
//!
//! Candidates from the evaluator become [`Notification`]s in an ordered
//! [`NotificationQueue`]. The [`Dispatcher`] drains pending entries in order
//! through an [`AlertChannel`](pricewatch_core::traits::AlertChannel) such as
//! the [`TelegramNotifier`], stopping at the first failure so that nothing is
//! skipped and nothing already delivered is sent twice.

mod config;
mod dispatcher;
mod notification;
mod queue;
mod telegram;

pub use config::NotifierConfig;
pub use dispatcher::Dispatcher;
pub use notification::{escape_markdown, Notification};
pub use queue::NotificationQueue;
pub use telegram::TelegramNotifier;
