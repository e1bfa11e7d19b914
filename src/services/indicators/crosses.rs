//! Moving-average cross and alignment detection.

use super::{closes, rolling_mean, trailing_mean, Indicator};
use crate::types::{Alignment, Bar, Cross, CrossSignals};

/// Detects fast/slow SMA crossings and fast/slow/long ordering.
///
/// - Golden cross: fast <= slow on the previous bar, fast > slow on the last bar
/// - Dead cross: fast >= slow on the previous bar, fast < slow on the last bar
/// - Bullish alignment: fast > slow > long on the last bar (bearish is the reverse)
///
/// Both rolling means must exist on the previous bar for a cross to fire.
pub struct CrossDetector {
    fast: usize,
    slow: usize,
    long: usize,
}

impl Default for CrossDetector {
    fn default() -> Self {
        Self {
            fast: 5,
            slow: 20,
            long: 60,
        }
    }
}

impl CrossDetector {
    fn detect_cross(&self, closes: &[f64]) -> Option<Cross> {
        let prev = closes.len().checked_sub(2)?;
        let fast = rolling_mean(closes, self.fast);
        let slow = rolling_mean(closes, self.slow);

        let (prev_fast, prev_slow) = (fast[prev]?, slow[prev]?);
        let (cur_fast, cur_slow) = (fast[prev + 1]?, slow[prev + 1]?);

        if prev_fast <= prev_slow && cur_fast > cur_slow {
            Some(Cross::Golden)
        } else if prev_fast >= prev_slow && cur_fast < cur_slow {
            Some(Cross::Dead)
        } else {
            None
        }
    }

    fn detect_alignment(&self, closes: &[f64]) -> Option<Alignment> {
        let fast = trailing_mean(closes, self.fast)?;
        let slow = trailing_mean(closes, self.slow)?;
        let long = trailing_mean(closes, self.long)?;

        if fast > slow && slow > long {
            Some(Alignment::Bullish)
        } else if fast < slow && slow < long {
            Some(Alignment::Bearish)
        } else {
            None
        }
    }
}

impl Indicator for CrossDetector {
    type Output = CrossSignals;

    fn name(&self) -> &str {
        "MA cross"
    }

    fn min_periods(&self) -> usize {
        self.slow
    }

    fn calculate(&self, bars: &[Bar]) -> Option<CrossSignals> {
        if bars.len() < self.min_periods() {
            return None;
        }
        let closes = closes(bars);

        Some(CrossSignals {
            cross: self.detect_cross(&closes),
            alignment: self.detect_alignment(&closes),
        })
    }
}
