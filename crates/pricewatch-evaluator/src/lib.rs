//! Trend evaluation over persisted candle history.
//!
//! Each pass recomputes RSI from scratch over the latest stored candles of
//! every tracked symbol (with the live price standing in for the last
//! close), runs the directional accumulator over the most recent values and
//! turns threshold crossings into alert candidates.

mod config;
mod evaluator;
mod trend;

pub use config::EvaluatorConfig;
pub use evaluator::Evaluator;
pub use trend::{accumulate, classify, TrendReading, WEAK_ZONE};
