//! Indicator engine: price histories in, analysis records and correlations out.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, trace};

use crate::config::EngineConfig;
use crate::error::Result;
use crate::services::indicators::{
    correlation_matrix, CrossDetector, ExtremaIndicator, Indicator, PeriodResampler, Sma,
};
use crate::types::{AnalysisRecord, Bar, CorrelationMatrix, InstrumentAnalysis, PriceHistory};

/// Result of one engine run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndicatorOutput {
    pub records: BTreeMap<String, InstrumentAnalysis>,
    pub correlations: CorrelationMatrix,
}

impl IndicatorOutput {
    /// Valid record for `code`, if any.
    pub fn record(&self, code: &str) -> Option<&AnalysisRecord> {
        self.records.get(code).and_then(InstrumentAnalysis::record)
    }
}

/// Computes per-instrument indicators and the correlation matrix.
pub struct IndicatorEngine {
    config: EngineConfig,
    averages: Vec<Sma>,
    weekly: PeriodResampler,
    monthly: PeriodResampler,
    extrema: ExtremaIndicator,
    crosses: CrossDetector,
}

impl IndicatorEngine {
    /// Create an engine; fails if the configuration is unusable.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let engine = Self {
            averages: config
                .moving_average_windows
                .iter()
                .map(|&w| Sma::new(w))
                .collect(),
            weekly: PeriodResampler::weekly(),
            monthly: PeriodResampler::monthly(),
            extrema: ExtremaIndicator::new(config.extrema_lookback, config.extreme_tolerance),
            crosses: CrossDetector::default(),
            config,
        };
        debug!("Indicator engine ready: {}", engine.indicator_names().join(", "));
        Ok(engine)
    }

    /// Names of the per-instrument indicators, in evaluation order.
    pub fn indicator_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.averages.iter().map(|sma| sma.name()).collect();
        names.push(self.weekly.name());
        names.push(self.monthly.name());
        names.push(self.extrema.name());
        names.push(self.crosses.name());
        names
    }

    /// Analyse every history, then correlate the valid ones.
    ///
    /// A history that breaks the provider contract (unsorted, duplicate
    /// dates, unusable closes) aborts the run with `StructuralInput`.
    pub fn compute(&self, histories: &BTreeMap<String, PriceHistory>) -> Result<IndicatorOutput> {
        let mut records = BTreeMap::new();
        for (code, history) in histories {
            history.validate(code)?;
            let analysis = self.analyze(history);
            match &analysis {
                InstrumentAnalysis::Insufficient { bars, required } => {
                    debug!("{}: {} bars, {} required - marked insufficient", code, bars, required);
                }
                InstrumentAnalysis::Ready(_) => {
                    for sma in self.averages.iter().filter(|s| history.len() < s.min_periods()) {
                        trace!(
                            "{}: {} skipped, {} of {} bars",
                            code,
                            sma.name(),
                            history.len(),
                            sma.min_periods()
                        );
                    }
                }
            }
            records.insert(code.clone(), analysis);
        }

        let eligible: Vec<(&str, &[Bar])> = histories
            .iter()
            .filter(|(code, _)| records.get(*code).is_some_and(|r| !r.is_error()))
            .map(|(code, history)| (code.as_str(), history.bars()))
            .collect();

        let correlations = correlation_matrix(
            &eligible,
            self.config.correlation_window,
            self.config.correlation_min_overlap,
        );

        debug!(
            "Computed {} records ({} valid), {} correlation pairs",
            records.len(),
            eligible.len(),
            correlations.len()
        );

        Ok(IndicatorOutput {
            records,
            correlations,
        })
    }

    /// Analyse one history. Assumes it has already passed validation.
    pub fn analyze(&self, history: &PriceHistory) -> InstrumentAnalysis {
        match self.build_record(history.bars()) {
            Some(record) => InstrumentAnalysis::Ready(record),
            None => InstrumentAnalysis::Insufficient {
                bars: history.len(),
                required: self.config.min_bars,
            },
        }
    }

    fn build_record(&self, bars: &[Bar]) -> Option<AnalysisRecord> {
        let n = bars.len();
        if n < self.config.min_bars || n < 2 {
            return None;
        }

        let current_price = bars[n - 1].close;
        let previous_close = bars[n - 2].close;
        let daily_change = current_price - previous_close;

        let recent_closes = bars[n.saturating_sub(self.config.recent_days)..]
            .iter()
            .map(|b| (b.date, b.close))
            .collect();

        Some(AnalysisRecord {
            current_price,
            previous_close,
            daily_change,
            daily_change_pct: daily_change / previous_close * 100.0,
            recent_closes,
            weekly: self.weekly.calculate(bars),
            monthly: self.monthly.calculate(bars),
            moving_averages: self
                .averages
                .iter()
                .filter_map(|sma| sma.calculate(bars))
                .collect(),
            extrema: self.extrema.calculate(bars)?,
            cross_signals: self.crosses.calculate(bars),
        })
    }
}

/// Run the engine once with `config`.
pub fn compute_indicators(
    histories: &BTreeMap<String, PriceHistory>,
    config: &EngineConfig,
) -> Result<IndicatorOutput> {
    IndicatorEngine::new(config.clone())?.compute(histories)
}
