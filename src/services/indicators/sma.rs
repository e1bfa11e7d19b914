//! Simple Moving Average (SMA) indicator.

use super::{closes, Indicator};
use crate::types::{Bar, MovingAverage, Position};

/// Mean of the last `window` values.
pub fn trailing_mean(values: &[f64], window: usize) -> Option<f64> {
    if window == 0 || values.len() < window {
        return None;
    }
    let sum: f64 = values[values.len() - window..].iter().sum();
    Some(sum / window as f64)
}

/// Rolling mean aligned with `values`: entry `i` covers `values[i + 1 - window..=i]`
/// and is `None` until a full window is available.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| trailing_mean(&values[..=i], window))
        .collect()
}

/// SMA of closes at the latest bar.
///
/// Reports the average, the divergence of the current price from it and
/// whether the price sits above or below.
pub struct Sma {
    period: usize,
    label: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            label: format!("MA{}", period),
        }
    }
}

impl Indicator for Sma {
    type Output = MovingAverage;

    fn name(&self) -> &str {
        &self.label
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, bars: &[Bar]) -> Option<MovingAverage> {
        let closes = closes(bars);
        let value = trailing_mean(&closes, self.period)?;
        let current_price = *closes.last()?;

        Some(MovingAverage {
            window: self.period,
            value,
            divergence_pct: (current_price - value) / value * 100.0,
            position: Position::of(current_price, value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::indicators::test_support::bars_from;

    #[test]
    fn test_sma_name() {
        assert_eq!(Sma::new(20).name(), "MA20");
        assert_eq!(Sma::new(20).min_periods(), 20);
    }

    #[test]
    fn test_sma_insufficient_data() {
        let bars = bars_from(&[1.0, 2.0, 3.0, 4.0]);
        assert!(Sma::new(5).calculate(&bars).is_none());
    }

    #[test]
    fn test_sma_value_and_divergence() {
        let bars = bars_from(&[10.0, 10.0, 10.0, 10.0, 20.0]);
        let ma = Sma::new(5).calculate(&bars).unwrap();
        assert_eq!(ma.window, 5);
        assert!((ma.value - 12.0).abs() < 1e-12);
        assert!((ma.divergence_pct - (20.0 - 12.0) / 12.0 * 100.0).abs() < 1e-9);
        assert_eq!(ma.position, Position::Above);
    }

    #[test]
    fn test_sma_equal_price_is_below() {
        let bars = bars_from(&[7.0; 5]);
        let ma = Sma::new(5).calculate(&bars).unwrap();
        assert_eq!(ma.divergence_pct, 0.0);
        assert_eq!(ma.position, Position::Below);
    }

    #[test]
    fn test_rolling_mean_alignment() {
        let rolled = rolling_mean(&[1.0, 2.0, 3.0, 4.0], 2);
        assert_eq!(rolled, vec![None, Some(1.5), Some(2.5), Some(3.5)]);
    }

    #[test]
    fn test_zero_window_yields_nothing() {
        assert_eq!(trailing_mean(&[1.0, 2.0], 0), None);
        assert_eq!(rolling_mean(&[1.0, 2.0], 0), vec![None, None]);
    }
}
