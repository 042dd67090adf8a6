//! Streaming momentum indicators.
//!
//! Indicators here are incremental: they are fed one value at a time and can
//! preview the effect of a value without committing it, which is what the
//! live tracker needs to show an in-progress window many times per second.

pub mod momentum;

pub use momentum::{Rsi, RsiState};
