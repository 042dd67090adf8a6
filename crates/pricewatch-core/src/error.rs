//! Error types for the price watch pipeline.

use thiserror::Error;

/// Top-level pipeline error.
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Stream error: {0}")]
    Stream(#[from] StreamError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("Indicator error: {0}")]
    Indicator(#[from] IndicatorError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Streaming connection errors.
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Subscription handshake failed: {0}")]
    Handshake(String),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("Connection already active")]
    AlreadyConnected,
}

/// Errors raised while decoding inbound stream messages.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing field: {0}")]
    MissingField(&'static str),

    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Unsupported frame: {0}")]
    UnsupportedFrame(String),
}

/// Price store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("No data available for {0}")]
    NoData(String),
}

/// Alert delivery errors.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Channel misconfigured: {0}")]
    Configuration(String),
}

/// Indicator calculation errors.
#[derive(Error, Debug)]
pub enum IndicatorError {
    #[error("Insufficient data: need {required} points, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for pipeline operations.
pub type WatchResult<T> = Result<T, WatchError>;
