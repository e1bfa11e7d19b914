//! Alert classification.
//!
//! Turns analysis records into three alert tiers. Lines follow registry
//! order (enabled instruments only), then rule order within a tier.
//! Correlation anomalies are appended to level 3 after the per-instrument
//! findings.

use std::collections::BTreeMap;
use tracing::debug;

use crate::config::{AlertThresholds, CorrelationPattern};
use crate::services::format::format_price;
use crate::types::{
    AlertSet, AnalysisRecord, CorrelationMatrix, Granularity, Instrument, InstrumentAnalysis,
    InstrumentRegistry, Position,
};

/// Averages that must agree for the level 1 trend glyph.
const TREND_WINDOWS: [usize; 3] = [5, 20, 60];

/// Stateless classifier over a registry, thresholds and correlation patterns.
pub struct AlertClassifier<'a> {
    registry: &'a InstrumentRegistry,
    thresholds: &'a AlertThresholds,
    patterns: &'a [CorrelationPattern],
}

impl<'a> AlertClassifier<'a> {
    pub fn new(
        registry: &'a InstrumentRegistry,
        thresholds: &'a AlertThresholds,
        patterns: &'a [CorrelationPattern],
    ) -> Self {
        Self {
            registry,
            thresholds,
            patterns,
        }
    }

    /// Classify one run. Error-state and unknown instruments are skipped.
    pub fn classify(
        &self,
        records: &BTreeMap<String, InstrumentAnalysis>,
        correlations: &CorrelationMatrix,
    ) -> AlertSet {
        let valid: Vec<(&Instrument, &AnalysisRecord)> = self
            .registry
            .enabled()
            .filter_map(|instrument| {
                let record = records.get(&instrument.code)?.record()?;
                Some((instrument, record))
            })
            .collect();

        let level1 = valid
            .iter()
            .map(|(instrument, record)| Self::daily_line(instrument, record))
            .collect();

        let level2 = valid
            .iter()
            .flat_map(|(instrument, record)| self.warnings(instrument, record))
            .collect();

        let mut level3: Vec<String> = valid
            .iter()
            .flat_map(|(instrument, record)| self.emergencies(instrument, record))
            .collect();
        level3.extend(self.correlation_anomalies(records, correlations));

        let alerts = AlertSet {
            level1,
            level2,
            level3,
        };
        debug!(
            "Classified {} instruments: {} info, {} warning, {} emergency",
            valid.len(),
            alerts.level1.len(),
            alerts.level2.len(),
            alerts.level3.len()
        );
        alerts
    }

    /// Level 1 summary line.
    fn daily_line(instrument: &Instrument, record: &AnalysisRecord) -> String {
        let mut line = format!(
            "{} {}: {} ({:+.2}%)",
            instrument.icon,
            instrument.name,
            format_price(record.current_price),
            record.daily_change_pct
        );

        if let Some(weekly) = record.period_change_pct(Granularity::Weekly) {
            line.push_str(&format!(" | Weekly {:+.1}%", weekly));
        }

        match record.common_position(&TREND_WINDOWS) {
            Some(Position::Above) => line.push_str(" 📈"),
            Some(Position::Below) => line.push_str(" 📉"),
            None => {}
        }

        line
    }

    fn warnings(&self, instrument: &Instrument, record: &AnalysisRecord) -> Vec<String> {
        let name = &instrument.name;
        let mut lines = Vec::new();

        if record.daily_change_pct.abs() >= self.thresholds.warning.daily_change {
            lines.push(format!("📊 {} daily {:+.2}%", name, record.daily_change_pct));
        }

        if let Some(signals) = &record.cross_signals {
            if signals.golden_cross_5_20() {
                lines.push(format!("⚡ {} MA5↗MA20 golden cross", name));
            }
            if signals.dead_cross_5_20() {
                lines.push(format!("⚡ {} MA5↘MA20 dead cross", name));
            }
        }

        lines
    }

    fn emergencies(&self, instrument: &Instrument, record: &AnalysisRecord) -> Vec<String> {
        let name = &instrument.name;
        let change = record.daily_change_pct;
        let mut lines = Vec::new();

        if change.abs() >= self.thresholds.emergency.daily_change {
            if change > 0.0 {
                lines.push(format!("🚀 {} surge {:+.2}%", name, change));
            } else {
                lines.push(format!("💥 {} plunge {:+.2}%", name, change));
            }
        }

        if self.thresholds.emergency.extremes {
            let price = format_price(record.current_price);
            if record.extrema.is_high {
                lines.push(format!("🔔 {} at 52-week high ({})", name, price));
            }
            if record.extrema.is_low {
                lines.push(format!("🔔 {} at 52-week low ({})", name, price));
            }
        }

        if let Some(signals) = &record.cross_signals {
            if signals.bullish_alignment() {
                lines.push(format!("📈 {} bullish alignment (MA5>MA20>MA60)", name));
            }
            if signals.bearish_alignment() {
                lines.push(format!("📉 {} bearish alignment (MA5<MA20<MA60)", name));
            }
        }

        lines
    }

    /// One line per configured pattern whose measured coefficient contradicts it.
    fn correlation_anomalies(
        &self,
        records: &BTreeMap<String, InstrumentAnalysis>,
        correlations: &CorrelationMatrix,
    ) -> Vec<String> {
        let mut lines = Vec::new();

        for pattern in self.patterns {
            let [a, b] = &pattern.assets;

            let Some(coefficient) = correlations.get(a, b) else {
                debug!("No correlation for pattern {}, skipping", pattern.name);
                continue;
            };

            if !pattern.is_violated_by(coefficient) {
                continue;
            }

            let change_a = records.get(a).and_then(|r| r.record()).map(|r| r.daily_change_pct);
            let change_b = records.get(b).and_then(|r| r.record()).map(|r| r.daily_change_pct);

            if let (Some(change_a), Some(change_b)) = (change_a, change_b) {
                lines.push(format!(
                    "⚠️ Unusual pattern: {} {:+.1}% & {} {:+.1}% (correlation: {:.2})",
                    self.registry.display_name(a),
                    change_a,
                    self.registry.display_name(b),
                    change_b,
                    coefficient
                ));
            }
        }

        lines
    }
}

/// Classify one run.
pub fn classify_alerts(
    records: &BTreeMap<String, InstrumentAnalysis>,
    correlations: &CorrelationMatrix,
    registry: &InstrumentRegistry,
    thresholds: &AlertThresholds,
    patterns: &[CorrelationPattern],
) -> AlertSet {
    AlertClassifier::new(registry, thresholds, patterns).classify(records, correlations)
}
