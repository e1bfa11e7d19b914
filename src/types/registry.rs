use serde::{Deserialize, Serialize};

/// Instrument category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Commodities,
    Currencies,
    Cryptocurrencies,
}

/// One registry entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub category: Category,
    pub code: String,
    pub name: String,
    pub icon: String,
    /// Market-data provider symbol.
    pub ticker: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Instrument {
    pub fn new(category: Category, code: &str, name: &str, icon: &str, ticker: &str) -> Self {
        Self {
            category,
            code: code.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            ticker: ticker.to_string(),
            unit: None,
            enabled: true,
        }
    }

    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = Some(unit.to_string());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Ordered instrument list. Iteration order is the order entries were given,
/// which fixes the order of every per-instrument alert line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstrumentRegistry {
    instruments: Vec<Instrument>,
}

impl InstrumentRegistry {
    pub fn new(instruments: Vec<Instrument>) -> Self {
        Self { instruments }
    }

    /// Enabled entries, in registry order.
    pub fn enabled(&self) -> impl Iterator<Item = &Instrument> {
        self.instruments.iter().filter(|i| i.enabled)
    }

    /// Enabled entry by code.
    pub fn get(&self, code: &str) -> Option<&Instrument> {
        self.enabled().find(|i| i.code == code)
    }

    /// Display name for a code, falling back to the code itself.
    pub fn display_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.get(code).map(|i| i.name.as_str()).unwrap_or(code)
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}
