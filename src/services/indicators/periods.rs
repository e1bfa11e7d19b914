//! Weekly and monthly period statistics.

use chrono::{Datelike, NaiveDate};

use super::{trailing_mean, Indicator};
use crate::types::{Bar, Granularity, PeriodStats};

/// Resamples daily closes into calendar periods and summarises them.
///
/// Weeks run Monday to Sunday (ISO weeks); months are calendar months.
/// A period's value is its last observed close; periods without bars
/// do not appear at all.
pub struct PeriodResampler {
    granularity: Granularity,
}

impl PeriodResampler {
    pub fn new(granularity: Granularity) -> Self {
        Self { granularity }
    }

    pub fn weekly() -> Self {
        Self::new(Granularity::Weekly)
    }

    pub fn monthly() -> Self {
        Self::new(Granularity::Monthly)
    }

    fn period_key(&self, date: NaiveDate) -> (i32, u32) {
        match self.granularity {
            Granularity::Weekly => {
                let week = date.iso_week();
                (week.year(), week.week())
            }
            Granularity::Monthly => (date.year(), date.month()),
        }
    }

    /// Last close of every period that has at least one bar, oldest first.
    pub fn period_closes(&self, bars: &[Bar]) -> Vec<f64> {
        let mut closes: Vec<f64> = Vec::new();
        let mut current_key = None;

        for bar in bars {
            let key = self.period_key(bar.date);
            if current_key == Some(key) {
                if let Some(last) = closes.last_mut() {
                    *last = bar.close;
                }
            } else {
                closes.push(bar.close);
                current_key = Some(key);
            }
        }

        closes
    }
}

impl Indicator for PeriodResampler {
    type Output = PeriodStats;

    fn name(&self) -> &str {
        self.granularity.name()
    }

    fn min_periods(&self) -> usize {
        2
    }

    fn calculate(&self, bars: &[Bar]) -> Option<PeriodStats> {
        let closes = self.period_closes(bars);
        let n = closes.len();
        if n < 2 {
            return None;
        }

        Some(PeriodStats {
            current_period_avg: closes[n - 1],
            last_period_avg: closes[n - 2],
            last_2_period_avg: n.checked_sub(3).map(|i| closes[i]),
            trailing_3_avg: trailing_mean(&closes, 3),
            trailing_6_avg: trailing_mean(&closes, 6),
            trailing_12_avg: trailing_mean(&closes, 12),
        })
    }
}
