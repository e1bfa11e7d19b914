//! Omen - daily indicator and alert engine for commodities, currencies and crypto

pub mod config;
pub mod error;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use config::{AlertThresholds, CorrelationPattern, EngineConfig, Expectation, Settings};
pub use error::{OmenError, Result};
pub use services::{classify_alerts, compute_indicators, IndicatorEngine, IndicatorOutput};
pub use types::*;
