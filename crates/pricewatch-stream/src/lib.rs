//! Resilient market-data stream connection.
//!
//! A [`StreamConnection`] owns one live socket at a time, performs the
//! subscription handshake and buffers decoded frames in an unbounded FIFO
//! queue that the ingestion loop drains at its own pace. [`supervise`] keeps
//! the connection alive with a short liveness probe and bounds the lifetime
//! of any single socket with a longer refresh timer.

mod config;
mod connection;
mod message;
mod supervisor;
#[cfg(test)]
mod testing;

pub use config::StreamConfig;
pub use connection::{ConnectionState, StreamConnection};
pub use message::{decode_frame, decode_price_event, StreamFrame, SubscribeRequest};
pub use supervisor::supervise;
