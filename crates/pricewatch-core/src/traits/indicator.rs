//! Indicator trait definitions.

/// Streaming indicator that maintains internal state.
///
/// Values are folded in one at a time with [`update`](Self::update), which
/// permanently advances the state. [`preview`](Self::preview) answers what
/// `update` would produce for a value without committing anything, so an
/// in-progress window can be shown repeatedly and committed exactly once
/// when it closes.
pub trait StreamingIndicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Update the indicator with a new value.
    ///
    /// # Returns
    /// The current indicator value, or None if not yet ready
    fn update(&mut self, value: f64) -> Option<Self::Output>;

    /// Compute the value `update(value)` would return, leaving state untouched.
    fn preview(&self, value: f64) -> Option<Self::Output>;

    /// Get the current value without adding new data.
    fn current(&self) -> Option<Self::Output>;

    /// Reset the indicator state.
    fn reset(&mut self);

    /// Check if the indicator has enough data to produce values.
    fn is_ready(&self) -> bool;

    /// Get the smoothing period.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Feed a whole sequence, collecting the value after every step.
    fn series(&mut self, data: &[f64]) -> Vec<Option<Self::Output>> {
        data.iter().map(|&value| self.update(value)).collect()
    }
}
