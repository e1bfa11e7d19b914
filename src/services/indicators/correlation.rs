//! Cross-instrument return correlations.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::trace;

use crate::types::{Bar, CorrelationMatrix};

/// Day-over-day percentage returns over the last `window` bars, keyed by the
/// date of the later bar. `window` bars yield `window - 1` returns.
pub fn daily_returns(bars: &[Bar], window: usize) -> BTreeMap<NaiveDate, f64> {
    let start = bars.len().saturating_sub(window);
    bars[start..]
        .windows(2)
        .map(|pair| {
            let (prev, cur) = (&pair[0], &pair[1]);
            (cur.date, (cur.close - prev.close) / prev.close)
        })
        .collect()
}

/// Pearson correlation coefficient of two equally long series.
/// Returns None if lengths differ, the series are empty, or either has zero variance.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.is_empty() {
        return None;
    }
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let covariance: f64 = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| (xi - mean_x) * (yi - mean_y))
        .sum();
    let var_x: f64 = x.iter().map(|xi| (xi - mean_x).powi(2)).sum();
    let var_y: f64 = y.iter().map(|yi| (yi - mean_y).powi(2)).sum();

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 {
        None
    } else {
        Some((covariance / denominator).clamp(-1.0, 1.0))
    }
}

/// Correlate every pair of instruments that each have at least `window` bars.
///
/// Return series are intersected by date; a pair is kept only when more than
/// `min_overlap` dates remain and the coefficient is defined.
pub fn correlation_matrix(
    instruments: &[(&str, &[Bar])],
    window: usize,
    min_overlap: usize,
) -> CorrelationMatrix {
    let returns: Vec<(&str, BTreeMap<NaiveDate, f64>)> = instruments
        .iter()
        .filter(|(_, bars)| bars.len() >= window)
        .map(|(code, bars)| (*code, daily_returns(bars, window)))
        .collect();

    let mut matrix = CorrelationMatrix::new();

    for (i, (code_a, returns_a)) in returns.iter().enumerate() {
        for (code_b, returns_b) in returns.iter().skip(i + 1) {
            let (xs, ys): (Vec<f64>, Vec<f64>) = returns_a
                .iter()
                .filter_map(|(date, ra)| returns_b.get(date).map(|rb| (*ra, *rb)))
                .unzip();

            if xs.len() <= min_overlap {
                trace!(
                    "Skipping {}/{}: {} overlapping returns",
                    code_a,
                    code_b,
                    xs.len()
                );
                continue;
            }

            if let Some(coefficient) = pearson(&xs, &ys) {
                matrix.insert(code_a, code_b, coefficient);
            }
        }
    }

    matrix
}
