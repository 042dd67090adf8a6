//! Core data types for the price watch pipeline.

mod alert;
mod candle;
mod price;
mod timeframe;

pub use alert::{AlertCase, EvaluationCandidate};
pub use candle::Candle;
pub use price::{CurrentPrice, PriceEvent};
pub use timeframe::Timeframe;
