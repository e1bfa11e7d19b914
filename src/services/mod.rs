//! Indicator engine, alert classifier and their collaborators.

pub mod classifier;
pub mod digest;
pub mod engine;
pub mod format;
pub mod history_store;
pub mod indicators;
pub mod report;

pub use classifier::{classify_alerts, AlertClassifier};
pub use digest::{Digest, DigestMessage};
pub use engine::{compute_indicators, IndicatorEngine, IndicatorOutput};
pub use history_store::HistoryStore;
pub use report::{build_report, Report};
