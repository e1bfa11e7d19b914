//! File-backed price history provider.
//!
//! Reads `{dir}/{CODE}_history.json`, each a JSON array of daily bars, as
//! written by the market-data collector.

use futures_util::future::join_all;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::types::{Bar, InstrumentRegistry, PriceHistory};

/// Directory of per-instrument history files.
pub struct HistoryStore {
    dir: PathBuf,
}

impl HistoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// History file path for a code.
    fn get_path(&self, code: &str) -> PathBuf {
        // Sanitize code for filesystem
        let safe_code = code.replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|'], "_");
        self.dir.join(format!("{}_history.json", safe_code))
    }

    /// Load one history, sorted by date. Missing or unreadable files yield None.
    pub async fn load(&self, code: &str) -> Option<PriceHistory> {
        let path = self.get_path(code);

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(c) => c,
            Err(e) => {
                warn!("No history for {} at {}: {}", code, path.display(), e);
                return None;
            }
        };

        let bars: Vec<Bar> = match serde_json::from_str(&content) {
            Ok(b) => b,
            Err(e) => {
                warn!("Failed to parse history for {}: {}", code, e);
                return None;
            }
        };

        if bars.is_empty() {
            warn!("Empty history for {}", code);
            return None;
        }

        debug!("Loaded {} bars for {}", bars.len(), code);
        Some(PriceHistory::from_unsorted(bars))
    }

    /// Load every enabled instrument concurrently. Instruments without a usable
    /// file are left out of the map.
    pub async fn load_all(&self, registry: &InstrumentRegistry) -> BTreeMap<String, PriceHistory> {
        let codes: Vec<&str> = registry.enabled().map(|i| i.code.as_str()).collect();
        let loaded = join_all(codes.iter().map(|code| self.load(code))).await;

        codes
            .into_iter()
            .zip(loaded)
            .filter_map(|(code, history)| Some((code.to_string(), history?)))
            .collect()
    }

    /// Write a history file, creating the directory if needed.
    pub async fn save(&self, code: &str, history: &PriceHistory) -> crate::error::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let content = serde_json::to_string(history)?;
        tokio::fs::write(self.get_path(code), content).await?;
        Ok(())
    }
}
