use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{OmenError, Result};
use crate::types::{Category, Instrument, InstrumentRegistry};

/// Indicator engine parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Moving-average windows reported per instrument.
    pub moving_average_windows: Vec<usize>,
    /// Bars required for a valid record.
    pub min_bars: usize,
    /// Trailing bars used for return correlations.
    pub correlation_window: usize,
    /// Overlapping return dates must exceed this count.
    pub correlation_min_overlap: usize,
    /// Trailing bars for the high/low extremes.
    pub extrema_lookback: usize,
    /// Fractional band around an extreme that still counts as "at" it.
    pub extreme_tolerance: f64,
    /// Closes kept in `recent_closes`.
    pub recent_days: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            moving_average_windows: vec![5, 20, 60, 120],
            min_bars: 20,
            correlation_window: 60,
            correlation_min_overlap: 20,
            extrema_lookback: 252,
            extreme_tolerance: 0.001,
            recent_days: 7,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.moving_average_windows.is_empty() {
            return Err(OmenError::Config("no moving-average windows configured".into()));
        }
        if self.moving_average_windows.contains(&0) {
            return Err(OmenError::Config("moving-average window of 0".into()));
        }
        if self.min_bars < 2 {
            return Err(OmenError::Config(format!(
                "min_bars must be at least 2, got {}",
                self.min_bars
            )));
        }
        if self.correlation_window < 2 {
            return Err(OmenError::Config(format!(
                "correlation_window must be at least 2, got {}",
                self.correlation_window
            )));
        }
        if self.extrema_lookback == 0 {
            return Err(OmenError::Config("extrema_lookback of 0".into()));
        }
        if !(0.0..1.0).contains(&self.extreme_tolerance) {
            return Err(OmenError::Config(format!(
                "extreme_tolerance must be in [0, 1), got {}",
                self.extreme_tolerance
            )));
        }
        Ok(())
    }
}

/// Thresholds for one alert tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierThresholds {
    /// Absolute daily change, in percent.
    pub daily_change: f64,
    /// Emit 52-period high/low lines. Only read for the emergency tier.
    #[serde(default = "default_true")]
    pub extremes: bool,
}

fn default_true() -> bool {
    true
}

/// Per-tier alert thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertThresholds {
    pub warning: TierThresholds,
    pub emergency: TierThresholds,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            warning: TierThresholds {
                daily_change: 2.0,
                extremes: false,
            },
            emergency: TierThresholds {
                daily_change: 3.0,
                extremes: true,
            },
        }
    }
}

/// Expected sign of a correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expectation {
    Positive,
    Negative,
}

/// A pair whose return correlation is expected to hold a sign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPattern {
    pub name: String,
    pub assets: [String; 2],
    pub expected: Expectation,
    pub threshold: f64,
}

impl CorrelationPattern {
    pub fn new(name: &str, a: &str, b: &str, expected: Expectation, threshold: f64) -> Self {
        Self {
            name: name.to_string(),
            assets: [a.to_string(), b.to_string()],
            expected,
            threshold,
        }
    }

    /// Whether `coefficient` contradicts the expectation.
    ///
    /// Negative: anomaly when `coefficient > -threshold`.
    /// Positive: anomaly when `coefficient < threshold`.
    pub fn is_violated_by(&self, coefficient: f64) -> bool {
        match self.expected {
            Expectation::Negative => coefficient > -self.threshold,
            Expectation::Positive => coefficient < self.threshold,
        }
    }
}

/// Registry, thresholds and correlation patterns, as stored in the settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub instruments: InstrumentRegistry,
    pub thresholds: AlertThresholds,
    pub correlation_patterns: Vec<CorrelationPattern>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            instruments: default_registry(),
            thresholds: AlertThresholds::default(),
            correlation_patterns: default_patterns(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file. Missing sections take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        Ok(settings)
    }
}

/// Default instrument registry.
pub fn default_registry() -> InstrumentRegistry {
    use Category::*;

    InstrumentRegistry::new(vec![
        // Precious metals
        Instrument::new(Commodities, "GOLD", "Gold", "💰", "GC=F").with_unit("oz"),
        Instrument::new(Commodities, "SILVER", "Silver", "💎", "SI=F").with_unit("oz"),
        Instrument::new(Commodities, "PLATINUM", "Platinum", "⚪", "PL=F")
            .with_unit("oz")
            .disabled(),
        Instrument::new(Commodities, "PALLADIUM", "Palladium", "⚫", "PA=F")
            .with_unit("oz")
            .disabled(),
        // Base metals
        Instrument::new(Commodities, "COPPER", "Copper", "🟫", "HG=F").with_unit("lb"),
        Instrument::new(Commodities, "ALUMINUM", "Aluminum", "⚙️", "ALI=F")
            .with_unit("MT")
            .disabled(),
        Instrument::new(Commodities, "NICKEL", "Nickel", "🔩", "NKL.L")
            .with_unit("MT")
            .disabled(),
        // Energy
        Instrument::new(Commodities, "CRUDE_OIL", "Crude Oil (WTI)", "🛢️", "CL=F").with_unit("bbl"),
        Instrument::new(Commodities, "BRENT_OIL", "Crude Oil (Brent)", "🛢️", "BZ=F")
            .with_unit("bbl")
            .disabled(),
        Instrument::new(Commodities, "NATURAL_GAS", "Natural Gas", "🔥", "NG=F")
            .with_unit("MMBtu")
            .disabled(),
        // Agriculture
        Instrument::new(Commodities, "WHEAT", "Wheat", "🌾", "ZW=F")
            .with_unit("bu")
            .disabled(),
        Instrument::new(Commodities, "CORN", "Corn", "🌽", "ZC=F")
            .with_unit("bu")
            .disabled(),
        Instrument::new(Commodities, "SOYBEAN", "Soybean", "🫘", "ZS=F")
            .with_unit("bu")
            .disabled(),
        // Livestock
        Instrument::new(Commodities, "LEAN_HOGS", "Lean Hogs", "🥓", "HE=F")
            .with_unit("lb")
            .disabled(),
        Instrument::new(Commodities, "LIVE_CATTLE", "Live Cattle", "🥩", "LE=F")
            .with_unit("lb")
            .disabled(),
        // Currencies
        Instrument::new(Currencies, "USD_KRW", "USD/KRW", "💵", "KRW=X"),
        Instrument::new(Currencies, "USD_JPY", "USD/JPY", "💴", "JPY=X"),
        Instrument::new(Currencies, "USD_CNY", "USD/CNY", "💴", "CNY=X").disabled(),
        Instrument::new(Currencies, "EUR_USD", "EUR/USD", "💶", "EURUSD=X"),
        Instrument::new(Currencies, "GBP_USD", "GBP/USD", "💷", "GBPUSD=X").disabled(),
        Instrument::new(Currencies, "AUD_USD", "AUD/USD", "🇦🇺", "AUDUSD=X").disabled(),
        Instrument::new(Currencies, "USD_CAD", "USD/CAD", "🇨🇦", "CAD=X").disabled(),
        // Crypto
        Instrument::new(Cryptocurrencies, "BTC", "Bitcoin", "₿", "BTC-USD").disabled(),
        Instrument::new(Cryptocurrencies, "ETH", "Ethereum", "♦️", "ETH-USD").disabled(),
    ])
}

/// Default correlation expectations.
pub fn default_patterns() -> Vec<CorrelationPattern> {
    vec![
        CorrelationPattern::new("USD_KRW_GOLD", "USD_KRW", "GOLD", Expectation::Negative, -0.3),
        CorrelationPattern::new("GOLD_SILVER", "GOLD", "SILVER", Expectation::Positive, 0.5),
    ]
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory of `{CODE}_history.json` files.
    pub data_dir: PathBuf,
    /// Directory the JSON report is written to.
    pub report_dir: PathBuf,
    /// Optional settings file; built-in defaults otherwise.
    pub settings_file: Option<PathBuf>,
    /// Indicator engine parameters.
    pub engine: EngineConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = EngineConfig::default();

        // Format: "5,20,60,120"
        let moving_average_windows = env::var("MA_WINDOWS")
            .ok()
            .map(|s| {
                s.split(',')
                    .filter_map(|w| w.trim().parse().ok())
                    .collect::<Vec<usize>>()
            })
            .filter(|w| !w.is_empty())
            .unwrap_or(defaults.moving_average_windows);

        Self {
            data_dir: env::var("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            report_dir: env::var("REPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("reports")),
            settings_file: env::var("SETTINGS_FILE").ok().map(PathBuf::from),
            engine: EngineConfig {
                moving_average_windows,
                min_bars: env::var("MIN_BARS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.min_bars),
                correlation_window: env::var("CORRELATION_WINDOW")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.correlation_window),
                correlation_min_overlap: env::var("CORRELATION_MIN_OVERLAP")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.correlation_min_overlap),
                extrema_lookback: env::var("EXTREMA_LOOKBACK")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.extrema_lookback),
                extreme_tolerance: env::var("EXTREME_TOLERANCE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.extreme_tolerance),
                recent_days: env::var("RECENT_DAYS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.recent_days),
            },
        }
    }

    /// Settings from the configured file, or the built-in defaults.
    pub fn load_settings(&self) -> Result<Settings> {
        match &self.settings_file {
            Some(path) => Settings::load(path),
            None => Ok(Settings::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_registry_enabled_order() {
        let registry = default_registry();
        let enabled: Vec<&str> = registry.enabled().map(|i| i.code.as_str()).collect();
        assert_eq!(
            enabled,
            vec!["GOLD", "SILVER", "COPPER", "CRUDE_OIL", "USD_KRW", "USD_JPY", "EUR_USD"]
        );
    }

    #[test]
    fn test_engine_config_validation() {
        assert!(EngineConfig::default().validate().is_ok());

        let empty = EngineConfig {
            moving_average_windows: vec![],
            ..Default::default()
        };
        assert!(matches!(empty.validate(), Err(OmenError::Config(_))));

        let zero = EngineConfig {
            moving_average_windows: vec![5, 0],
            ..Default::default()
        };
        assert!(zero.validate().is_err());

        let one_bar = EngineConfig {
            min_bars: 1,
            ..Default::default()
        };
        assert!(one_bar.validate().is_err());
    }

    #[test]
    fn test_pattern_violation_rules() {
        let negative = CorrelationPattern::new("p", "A", "B", Expectation::Negative, -0.3);
        // -threshold = 0.3
        assert!(negative.is_violated_by(0.9));
        assert!(!negative.is_violated_by(0.3));
        assert!(!negative.is_violated_by(-0.5));

        let positive = CorrelationPattern::new("p", "A", "B", Expectation::Positive, 0.5);
        assert!(positive.is_violated_by(0.2));
        assert!(!positive.is_violated_by(0.5));
        assert!(!positive.is_violated_by(0.8));
    }

    #[test]
    fn test_load_partial_settings_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let content = r#"{
            "instruments": [
                {"category": "cryptocurrencies", "code": "BTC", "name": "Bitcoin", "icon": "₿", "ticker": "BTC-USD"}
            ],
            "thresholds": {
                "warning": {"dailyChange": 1.5},
                "emergency": {"dailyChange": 4.0, "extremes": false}
            }
        }"#;
        fs::write(&path, content).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.instruments.len(), 1);
        assert!(settings.instruments.get("BTC").unwrap().enabled);
        assert_eq!(settings.thresholds.warning.daily_change, 1.5);
        assert!(!settings.thresholds.emergency.extremes);
        // Not in the file, so defaults apply
        assert_eq!(settings.correlation_patterns, default_patterns());
    }

    #[test]
    fn test_load_settings_missing_file() {
        let dir = tempdir().unwrap();
        let config = Config {
            data_dir: dir.path().to_path_buf(),
            report_dir: dir.path().to_path_buf(),
            settings_file: Some(dir.path().join("missing.json")),
            engine: EngineConfig::default(),
        };
        assert!(matches!(config.load_settings(), Err(OmenError::Io(_))));
    }
}
