//! Per-symbol live price statistics and ranking.
//!
//! The [`PriceTracker`] folds decoded stream events into one
//! [`SymbolStatistics`] per symbol. Every event refreshes the live price and
//! a previewed RSI; a periodic indexing pass commits the latest event into a
//! bounded newest-first window with velocity and acceleration derivatives.

mod config;
mod ranking;
mod statistic;
mod tracker;

pub use config::TrackerConfig;
pub use ranking::{RankKey, RankOrder, TopToken};
pub use statistic::{SymbolStatistics, WindowSample};
pub use tracker::PriceTracker;
