//! Trailing high/low of closes (52-week extremes on daily data).

use super::Indicator;
use crate::types::{Bar, Extrema};

pub struct ExtremaIndicator {
    lookback: usize,
    tolerance: f64,
}

impl Default for ExtremaIndicator {
    fn default() -> Self {
        Self {
            lookback: 252,
            tolerance: 0.001,
        }
    }
}

impl ExtremaIndicator {
    /// `tolerance` is the fractional band (0.001 = 0.1%) within which the
    /// current price counts as sitting on the extreme.
    pub fn new(lookback: usize, tolerance: f64) -> Self {
        Self {
            lookback,
            tolerance,
        }
    }
}

impl Indicator for ExtremaIndicator {
    type Output = Extrema;

    fn name(&self) -> &str {
        "52-week range"
    }

    fn min_periods(&self) -> usize {
        1
    }

    fn calculate(&self, bars: &[Bar]) -> Option<Extrema> {
        let current = bars.last()?.close;
        let start = bars.len().saturating_sub(self.lookback);
        let window = &bars[start..];

        let high = window.iter().map(|b| b.close).fold(f64::MIN, f64::max);
        let low = window.iter().map(|b| b.close).fold(f64::MAX, f64::min);

        Some(Extrema {
            high_252: high,
            low_252: low,
            is_high: current >= high * (1.0 - self.tolerance),
            is_low: current <= low * (1.0 + self.tolerance),
        })
    }
}
