//! Report model handed to the rendering sink.
//!
//! Everything here is derived from engine output; no rendering happens in
//! this crate beyond serialising the model to JSON.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::services::engine::IndicatorOutput;
use crate::types::{
    Alignment, AnalysisRecord, Category, Cross, Granularity, Instrument, InstrumentRegistry,
    MovingAverage, PairKey, PeriodStats, Position,
};

/// Overall direction of an instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// Bullish alignment.
    StrongUp,
    /// Bearish alignment.
    StrongDown,
    /// Above both MA5 and MA20.
    Up,
    /// Below both MA5 and MA20.
    Down,
    Sideways,
}

impl Trend {
    pub fn of(record: &AnalysisRecord) -> Self {
        if let Some(signals) = &record.cross_signals {
            if signals.bullish_alignment() {
                return Trend::StrongUp;
            }
            if signals.bearish_alignment() {
                return Trend::StrongDown;
            }
        }
        match record.common_position(&[5, 20]) {
            Some(Position::Above) => Trend::Up,
            Some(Position::Below) => Trend::Down,
            None => Trend::Sideways,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Trend::StrongUp => "Strong (bullish alignment)",
            Trend::StrongDown => "Weak (bearish alignment)",
            Trend::Up => "Uptrend",
            Trend::Down => "Downtrend",
            Trend::Sideways => "Sideways",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationStrength {
    Strong,
    Moderate,
    Weak,
}

impl CorrelationStrength {
    pub fn of(coefficient: f64) -> Self {
        let magnitude = coefficient.abs();
        if magnitude > 0.7 {
            CorrelationStrength::Strong
        } else if magnitude > 0.4 {
            CorrelationStrength::Moderate
        } else {
            CorrelationStrength::Weak
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationDirection {
    Positive,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRow {
    pub category: Category,
    pub code: String,
    pub name: String,
    pub current_price: f64,
    pub daily_change: f64,
    pub daily_change_pct: f64,
    pub weekly_change_pct: Option<f64>,
    pub monthly_change_pct: Option<f64>,
    pub high_252: f64,
    pub low_252: f64,
    pub trend: Trend,
    /// Human-readable trend, as shown in the rendered summary.
    pub trend_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentClosesRow {
    pub code: String,
    pub name: String,
    pub closes: BTreeMap<NaiveDate, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodRow {
    pub code: String,
    pub name: String,
    pub granularity: Granularity,
    pub stats: PeriodStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalRow {
    pub code: String,
    pub name: String,
    pub moving_averages: Vec<MovingAverage>,
    pub cross: Option<Cross>,
    pub alignment: Option<Alignment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationRow {
    pub pair: PairKey,
    pub names: [String; 2],
    pub coefficient: f64,
    pub strength: CorrelationStrength,
    pub direction: CorrelationDirection,
}

/// Full report for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub generated_on: NaiveDate,
    pub summary: Vec<SummaryRow>,
    pub recent_closes: Vec<RecentClosesRow>,
    pub periods: Vec<PeriodRow>,
    pub technicals: Vec<TechnicalRow>,
    /// Strongest relationships first.
    pub correlations: Vec<CorrelationRow>,
}

/// Build the report. Instrument rows follow registry order; error-state
/// records are left out.
pub fn build_report(
    output: &IndicatorOutput,
    registry: &InstrumentRegistry,
    generated_on: NaiveDate,
) -> Report {
    let valid: Vec<(&Instrument, &AnalysisRecord)> = registry
        .enabled()
        .filter_map(|i| Some((i, output.record(&i.code)?)))
        .collect();

    let summary = valid
        .iter()
        .map(|(instrument, record)| {
            let trend = Trend::of(record);
            SummaryRow {
                category: instrument.category,
                code: instrument.code.clone(),
                name: instrument.name.clone(),
                current_price: record.current_price,
                daily_change: record.daily_change,
                daily_change_pct: record.daily_change_pct,
                weekly_change_pct: record.period_change_pct(Granularity::Weekly),
                monthly_change_pct: record.period_change_pct(Granularity::Monthly),
                high_252: record.extrema.high_252,
                low_252: record.extrema.low_252,
                trend,
                trend_label: trend.label(),
            }
        })
        .collect();

    let recent_closes = valid
        .iter()
        .map(|(instrument, record)| RecentClosesRow {
            code: instrument.code.clone(),
            name: instrument.name.clone(),
            closes: record.recent_closes.clone(),
        })
        .collect();

    let periods = [Granularity::Weekly, Granularity::Monthly]
        .into_iter()
        .flat_map(|granularity| {
            valid.iter().filter_map(move |(instrument, record)| {
                Some(PeriodRow {
                    code: instrument.code.clone(),
                    name: instrument.name.clone(),
                    granularity,
                    stats: record.period_stats(granularity)?.clone(),
                })
            })
        })
        .collect();

    let technicals = valid
        .iter()
        .map(|(instrument, record)| {
            let signals = record.cross_signals.clone().unwrap_or_default();
            TechnicalRow {
                code: instrument.code.clone(),
                name: instrument.name.clone(),
                moving_averages: record.moving_averages.clone(),
                cross: signals.cross,
                alignment: signals.alignment,
            }
        })
        .collect();

    let mut correlations: Vec<CorrelationRow> = output
        .correlations
        .iter()
        .map(|(pair, coefficient)| CorrelationRow {
            pair: pair.clone(),
            names: [
                registry.display_name(pair.first()).to_string(),
                registry.display_name(pair.second()).to_string(),
            ],
            coefficient,
            strength: CorrelationStrength::of(coefficient),
            direction: if coefficient > 0.0 {
                CorrelationDirection::Positive
            } else {
                CorrelationDirection::Negative
            },
        })
        .collect();
    correlations.sort_by(|a, b| b.coefficient.abs().total_cmp(&a.coefficient.abs()));

    Report {
        generated_on,
        summary,
        recent_closes,
        periods,
        technicals,
        correlations,
    }
}
