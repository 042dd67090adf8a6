//! Core traits for the price watch pipeline.

mod alert_channel;
mod indicator;
mod store;

pub use alert_channel::AlertChannel;
pub use indicator::StreamingIndicator;
pub use store::PriceStore;
