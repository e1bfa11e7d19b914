use serde::{Deserialize, Serialize};

/// Alert severity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    /// Level 1: one line per instrument.
    Info,
    /// Level 2.
    Warning,
    /// Level 3, including correlation anomalies.
    Emergency,
}

impl AlertLevel {
    pub const ALL: [AlertLevel; 3] = [AlertLevel::Info, AlertLevel::Warning, AlertLevel::Emergency];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Info => "info",
            AlertLevel::Warning => "warning",
            AlertLevel::Emergency => "emergency",
        }
    }
}

/// Findings of one classification run, in emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertSet {
    pub level1: Vec<String>,
    pub level2: Vec<String>,
    pub level3: Vec<String>,
}

impl AlertSet {
    pub fn tier(&self, level: AlertLevel) -> &[String] {
        match level {
            AlertLevel::Info => &self.level1,
            AlertLevel::Warning => &self.level2,
            AlertLevel::Emergency => &self.level3,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.level1.is_empty() && self.level2.is_empty() && self.level3.is_empty()
    }

    pub fn total(&self) -> usize {
        self.level1.len() + self.level2.len() + self.level3.len()
    }
}
