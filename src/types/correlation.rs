use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Unordered instrument pair. Members are stored sorted, so `(a, b)` and
/// `(b, a)` produce the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey {
    first: String,
    second: String,
}

impl PairKey {
    pub fn new(a: &str, b: &str) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self {
            first: first.to_string(),
            second: second.to_string(),
        }
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }

    pub fn contains(&self, code: &str) -> bool {
        self.first == code || self.second == code
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.first, self.second)
    }
}

impl Serialize for PairKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Pearson coefficients of daily returns, keyed by unordered pair.
/// Pairs without enough overlapping observations are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CorrelationMatrix {
    entries: BTreeMap<PairKey, f64>,
}

impl CorrelationMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, a: &str, b: &str, coefficient: f64) {
        self.entries.insert(PairKey::new(a, b), coefficient);
    }

    /// Coefficient for the pair in either order.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        self.entries.get(&PairKey::new(a, b)).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PairKey, f64)> {
        self.entries.iter().map(|(k, v)| (k, *v))
    }

    pub fn involves(&self, code: &str) -> bool {
        self.entries.keys().any(|k| k.contains(code))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
