//! Offline market snapshots
//!
//! A snapshot holds everything one analysis needs (bars plus call chains) so
//! a ticker can be analyzed without network access, e.g. from a JSON file
//! captured earlier.

use std::cell::Cell;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::provider::MarketDataProvider;
use crate::core::{AnalysisError, AnalysisResult, CallQuote, PriceBar};

/// Call chain for one expiration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotChain {
    pub expiration: NaiveDate,
    pub calls: Vec<CallQuote>,
}

/// Bars and chains for a single ticker
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub ticker: String,
    pub bars: Vec<PriceBar>,
    /// Chains in provider order
    pub chains: Vec<SnapshotChain>,
}

impl MarketSnapshot {
    pub fn new(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            ..Default::default()
        }
    }

    pub fn with_bars(mut self, bars: Vec<PriceBar>) -> Self {
        self.bars = bars;
        self
    }

    pub fn with_chain(mut self, expiration: NaiveDate, calls: Vec<CallQuote>) -> Self {
        self.chains.push(SnapshotChain { expiration, calls });
        self
    }

    /// Load a snapshot from a JSON file
    pub fn load(path: impl AsRef<Path>) -> AnalysisResult<Self> {
        let json = fs::read_to_string(path.as_ref())?;
        serde_json::from_str(&json).map_err(|e| AnalysisError::Serialization(e.to_string()))
    }

    /// Save a snapshot as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> AnalysisResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| AnalysisError::Serialization(e.to_string()))?;
        fs::write(path.as_ref(), json)?;
        Ok(())
    }
}

/// Provider serving a fixed snapshot
///
/// Chains can be marked as failing to exercise per-horizon error handling,
/// and fetch counts are tracked so cache behavior can be observed.
pub struct SnapshotProvider {
    snapshot: MarketSnapshot,
    failing: HashSet<NaiveDate>,
    history_fetches: Cell<usize>,
    chain_fetches: Cell<usize>,
}

impl SnapshotProvider {
    pub fn new(snapshot: MarketSnapshot) -> Self {
        Self {
            snapshot,
            failing: HashSet::new(),
            history_fetches: Cell::new(0),
            chain_fetches: Cell::new(0),
        }
    }

    /// Make `fetch_call_chain` fail for this expiration
    pub fn with_failing_chain(mut self, expiration: NaiveDate) -> Self {
        self.failing.insert(expiration);
        self
    }

    pub fn snapshot(&self) -> &MarketSnapshot {
        &self.snapshot
    }

    /// Number of `fetch_history` calls served so far
    pub fn history_fetches(&self) -> usize {
        self.history_fetches.get()
    }

    /// Number of `fetch_call_chain` calls served so far
    pub fn chain_fetches(&self) -> usize {
        self.chain_fetches.get()
    }

    fn check_ticker(&self, ticker: &str) -> AnalysisResult<()> {
        if self.snapshot.ticker.eq_ignore_ascii_case(ticker) {
            Ok(())
        } else {
            Err(AnalysisError::no_data(format!(
                "Snapshot holds {}, not {}",
                self.snapshot.ticker, ticker
            )))
        }
    }
}

impl MarketDataProvider for SnapshotProvider {
    fn fetch_history(&self, ticker: &str, _range: &str) -> AnalysisResult<Vec<PriceBar>> {
        self.history_fetches.set(self.history_fetches.get() + 1);
        self.check_ticker(ticker)?;
        Ok(self.snapshot.bars.clone())
    }

    fn list_option_expirations(&self, ticker: &str) -> AnalysisResult<Vec<NaiveDate>> {
        self.check_ticker(ticker)?;
        Ok(self.snapshot.chains.iter().map(|c| c.expiration).collect())
    }

    fn fetch_call_chain(&self, ticker: &str, expiration: NaiveDate) -> AnalysisResult<Vec<CallQuote>> {
        self.chain_fetches.set(self.chain_fetches.get() + 1);
        self.check_ticker(ticker)?;

        if self.failing.contains(&expiration) {
            return Err(AnalysisError::network(format!("Chain request for {} failed", expiration)));
        }

        self.snapshot
            .chains
            .iter()
            .find(|c| c.expiration == expiration)
            .map(|c| c.calls.clone())
            .ok_or_else(|| AnalysisError::data(format!("No chain for {}", expiration)))
    }
}
