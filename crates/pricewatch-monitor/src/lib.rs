//! Logging setup and the read-only HTTP API over the live tracker.

mod api;
mod logging;

pub use api::{ApiConfig, ApiServer, HealthResponse};
pub use logging::setup_logging;
