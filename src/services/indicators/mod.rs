//! Per-instrument indicator implementations.

pub mod correlation;
pub mod crosses;
pub mod extrema;
pub mod periods;
pub mod sma;

pub use correlation::{correlation_matrix, daily_returns, pearson};
pub use crosses::CrossDetector;
pub use extrema::ExtremaIndicator;
pub use periods::PeriodResampler;
pub use sma::{rolling_mean, trailing_mean, Sma};

use crate::types::Bar;

/// Trait for indicators computed from one instrument's bars.
pub trait Indicator {
    type Output;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Minimum number of bars required for calculation.
    fn min_periods(&self) -> usize;

    /// Calculate from chronologically ordered bars.
    /// Returns None if there is not enough data.
    fn calculate(&self, bars: &[Bar]) -> Option<Self::Output>;
}

/// Closing prices of `bars`.
pub(crate) fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}
