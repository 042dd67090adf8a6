//! Alert delivery trait.

use crate::error::DeliveryError;
use async_trait::async_trait;

/// External channel that delivers one formatted alert per call.
#[async_trait]
pub trait AlertChannel: Send + Sync {
    /// Deliver a single message.
    ///
    /// Any transport failure or non-2xx response is an error; the caller
    /// decides whether to retry.
    async fn deliver(&self, message: &str) -> Result<(), DeliveryError>;

    /// Get the channel name.
    fn name(&self) -> &str;
}
