use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where the current price sits relative to a reference value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Above,
    Below,
}

impl Position {
    /// Strictly greater is above; equality counts as below.
    pub fn of(price: f64, reference: f64) -> Self {
        if price > reference {
            Position::Above
        } else {
            Position::Below
        }
    }
}

/// Simple moving average at the latest bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovingAverage {
    pub window: usize,
    pub value: f64,
    /// `(current - value) / value * 100`
    pub divergence_pct: f64,
    pub position: Position,
}

/// Resampling granularity for period statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Weekly,
    Monthly,
}

impl Granularity {
    pub fn name(&self) -> &'static str {
        match self {
            Granularity::Weekly => "weekly",
            Granularity::Monthly => "monthly",
        }
    }
}

/// Statistics over resampled period closes.
///
/// Each period is represented by its last observed close. Only built when at
/// least two periods exist, so the current and previous values are always set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodStats {
    pub current_period_avg: f64,
    pub last_period_avg: f64,
    pub last_2_period_avg: Option<f64>,
    pub trailing_3_avg: Option<f64>,
    pub trailing_6_avg: Option<f64>,
    pub trailing_12_avg: Option<f64>,
}

/// Trailing high/low of closes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extrema {
    pub high_252: f64,
    pub low_252: f64,
    pub is_high: bool,
    pub is_low: bool,
}

/// Fast/slow moving-average crossing between the last two bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cross {
    Golden,
    Dead,
}

/// Ordering of the fast, slow and long moving averages at the latest bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Bullish,
    Bearish,
}

/// Cross and alignment flags. Golden and dead are exclusive by construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrossSignals {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cross: Option<Cross>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
}

impl CrossSignals {
    pub fn golden_cross_5_20(&self) -> bool {
        self.cross == Some(Cross::Golden)
    }

    pub fn dead_cross_5_20(&self) -> bool {
        self.cross == Some(Cross::Dead)
    }

    pub fn bullish_alignment(&self) -> bool {
        self.alignment == Some(Alignment::Bullish)
    }

    pub fn bearish_alignment(&self) -> bool {
        self.alignment == Some(Alignment::Bearish)
    }
}

/// Indicators for one instrument with enough history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub current_price: f64,
    pub previous_close: f64,
    pub daily_change: f64,
    pub daily_change_pct: f64,
    /// Last few closes keyed by date, oldest first.
    pub recent_closes: BTreeMap<NaiveDate, f64>,
    pub weekly: Option<PeriodStats>,
    pub monthly: Option<PeriodStats>,
    /// In configured window order; windows longer than the history are absent.
    pub moving_averages: Vec<MovingAverage>,
    pub extrema: Extrema,
    /// `None` when the history is shorter than the slow window.
    pub cross_signals: Option<CrossSignals>,
}

impl AnalysisRecord {
    pub fn moving_average(&self, window: usize) -> Option<&MovingAverage> {
        self.moving_averages.iter().find(|ma| ma.window == window)
    }

    pub fn period_stats(&self, granularity: Granularity) -> Option<&PeriodStats> {
        match granularity {
            Granularity::Weekly => self.weekly.as_ref(),
            Granularity::Monthly => self.monthly.as_ref(),
        }
    }

    /// Change of the current price against the previous period's close, in percent.
    pub fn period_change_pct(&self, granularity: Granularity) -> Option<f64> {
        let last = self.period_stats(granularity)?.last_period_avg;
        if last == 0.0 {
            return None;
        }
        Some((self.current_price - last) / last * 100.0)
    }

    /// Shared position of the given averages, if all exist and agree.
    pub fn common_position(&self, windows: &[usize]) -> Option<Position> {
        let mut positions = windows
            .iter()
            .map(|&w| self.moving_average(w).map(|ma| ma.position));
        let first = positions.next()??;
        for position in positions {
            if position? != first {
                return None;
            }
        }
        Some(first)
    }
}

/// Engine result for one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InstrumentAnalysis {
    Ready(AnalysisRecord),
    /// Too few bars; excluded from every downstream stage.
    Insufficient { bars: usize, required: usize },
}

impl InstrumentAnalysis {
    pub fn record(&self) -> Option<&AnalysisRecord> {
        match self {
            InstrumentAnalysis::Ready(record) => Some(record),
            InstrumentAnalysis::Insufficient { .. } => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, InstrumentAnalysis::Insufficient { .. })
    }
}
