//! Rolling per-symbol statistics.

use pricewatch_core::math::round2;
use pricewatch_core::traits::StreamingIndicator;
use pricewatch_core::types::PriceEvent;
use pricewatch_indicators::Rsi;
use std::collections::VecDeque;

/// Price change scale: velocities are expressed in millionths of the price.
const VELOCITY_SCALE: f64 = 1_000_000.0;

/// One committed snapshot of a symbol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowSample {
    pub price: f64,
    /// Event time of the committed price, Unix milliseconds
    pub timestamp: i64,
    /// Relative price change per second, absent for the first sample
    pub velocity: Option<f64>,
    /// Velocity change per second, absent until two velocities exist
    pub acceleration: Option<f64>,
    /// Committed RSI value (0 before warmup)
    pub oscillator: f64,
}

impl WindowSample {
    #[inline]
    pub fn velocity(&self) -> f64 {
        self.velocity.unwrap_or(0.0)
    }

    #[inline]
    pub fn acceleration(&self) -> f64 {
        self.acceleration.unwrap_or(0.0)
    }
}

/// Rolling statistics of one symbol.
///
/// The window is newest-first and never exceeds its capacity. Incoming
/// events only refresh the live price and a previewed RSI; the RSI state is
/// advanced by [`index`](Self::index) alone, once per indexing period.
#[derive(Debug, Clone)]
pub struct SymbolStatistics {
    symbol: String,
    capacity: usize,
    window: VecDeque<WindowSample>,
    rsi: Rsi,
    latest_event: Option<PriceEvent>,
    latest_oscillator: f64,
    first_seen: u64,
}

impl SymbolStatistics {
    /// Create empty statistics holding at most `capacity` samples.
    ///
    /// `first_seen` orders symbols that tie in the ranking.
    pub fn new(symbol: impl Into<String>, capacity: usize, first_seen: u64) -> Self {
        Self {
            symbol: symbol.into(),
            capacity: capacity.max(1),
            window: VecDeque::with_capacity(capacity.max(1) + 1),
            rsi: Rsi::default(),
            latest_event: None,
            latest_oscillator: 0.0,
            first_seen,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn first_seen(&self) -> u64 {
        self.first_seen
    }

    pub fn latest_event(&self) -> Option<&PriceEvent> {
        self.latest_event.as_ref()
    }

    pub fn latest_price(&self) -> Option<f64> {
        self.latest_event.as_ref().map(|e| e.price)
    }

    /// RSI including the uncommitted live price.
    pub fn latest_oscillator(&self) -> f64 {
        self.latest_oscillator
    }

    /// Committed samples, newest first.
    pub fn window(&self) -> &VecDeque<WindowSample> {
        &self.window
    }

    pub fn newest(&self) -> Option<&WindowSample> {
        self.window.front()
    }

    /// Record a live price.
    ///
    /// The RSI is previewed against the live price; its state is untouched.
    pub fn push_price_event(&mut self, event: PriceEvent) {
        self.latest_oscillator = round2(self.rsi.preview(event.price).unwrap_or(0.0));
        self.latest_event = Some(event);
    }

    /// Commit the latest event into the window.
    ///
    /// Returns the new sample, or `None` when no event has been seen yet.
    pub fn index(&mut self) -> Option<WindowSample> {
        let event = self.latest_event.as_ref()?;
        let price = event.price;
        let timestamp = event.event_time;

        let (velocity, acceleration) = match self.window.front() {
            Some(previous) => {
                let elapsed = (timestamp - previous.timestamp) as f64 / 1_000.0;
                let velocity = if elapsed != 0.0 {
                    round2(VELOCITY_SCALE * (price - previous.price) / previous.price / elapsed)
                } else {
                    0.0
                };
                let acceleration = previous.velocity.map(|previous_velocity| {
                    if elapsed != 0.0 {
                        round2((velocity - previous_velocity) / elapsed)
                    } else {
                        0.0
                    }
                });
                (Some(velocity), acceleration)
            }
            None => (None, None),
        };

        let oscillator = round2(self.rsi.update(price).unwrap_or(0.0));
        self.latest_oscillator = oscillator;

        let sample = WindowSample {
            price,
            timestamp,
            velocity,
            acceleration,
            oscillator,
        };
        self.window.push_front(sample);
        if self.window.len() > self.capacity {
            self.window.pop_back();
        }

        Some(sample)
    }
}
