use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{OmenError, Result};

/// One daily OHLC bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl Bar {
    /// Bar whose open/high/low all equal the close.
    pub fn flat(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: None,
        }
    }
}

/// Chronological daily bars for one instrument.
///
/// The provider owns ordering; [`PriceHistory::validate`] is how the engine
/// checks that contract before touching the data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceHistory {
    bars: Vec<Bar>,
}

impl PriceHistory {
    /// Wrap bars as delivered, without reordering.
    pub fn new(bars: Vec<Bar>) -> Self {
        Self { bars }
    }

    /// Sort bars by date first. Duplicate dates are kept and still fail validation.
    pub fn from_unsorted(mut bars: Vec<Bar>) -> Self {
        bars.sort_by_key(|b| b.date);
        Self { bars }
    }

    /// Build from consecutive calendar days starting at `start`.
    pub fn from_closes(start: NaiveDate, closes: &[f64]) -> Self {
        let bars = closes
            .iter()
            .zip(start.iter_days())
            .map(|(&close, date)| Bar::flat(date, close))
            .collect();
        Self { bars }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Check the provider contract: strictly increasing dates and usable closes.
    pub fn validate(&self, code: &str) -> Result<()> {
        for (i, bar) in self.bars.iter().enumerate() {
            if !bar.close.is_finite() || bar.close <= 0.0 {
                return Err(OmenError::structural(
                    code,
                    format!("close {} on {} is not a positive number", bar.close, bar.date),
                ));
            }
            if i > 0 {
                let prev = &self.bars[i - 1];
                if bar.date == prev.date {
                    return Err(OmenError::structural(
                        code,
                        format!("duplicate bar for {}", bar.date),
                    ));
                }
                if bar.date < prev.date {
                    return Err(OmenError::structural(
                        code,
                        format!("bar {} follows {}", bar.date, prev.date),
                    ));
                }
            }
        }
        Ok(())
    }
}
