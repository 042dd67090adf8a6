//! Core types and traits for the price watch pipeline.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (PriceEvent, Candle, CurrentPrice)
//! - Alert classification types
//! - Core traits for indicators, price stores and alert channels
//! - Rounding helpers and the periodic job runner shared by all services

pub mod error;
pub mod math;
pub mod schedule;
pub mod traits;
pub mod types;

pub use error::{WatchError, WatchResult};
pub use traits::*;
pub use types::*;
