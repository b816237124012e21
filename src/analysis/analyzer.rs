//! StockAnalyzer - Main facade for the analysis pipeline
//!
//! Combines the provider, the history cache and both stages into a single
//! interface. One call to `analyze` is one user interaction.

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;

use super::{select_horizons, summarize_history, AnalyzerConfig, HorizonReport, PriceHistorySummary};
use crate::core::{AnalysisError, AnalysisResult};
use crate::data::{Clock, DataCache, MarketDataProvider, SystemClock};

/// Everything one interaction produces
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub ticker: String,
    pub target_strike: f64,
    pub history: Arc<PriceHistorySummary>,
    pub horizons: HorizonReport,
}

/// Main analyzer running history aggregation and horizon selection
pub struct StockAnalyzer<P, C: Clock = SystemClock> {
    provider: P,
    config: AnalyzerConfig,
    cache: DataCache<Arc<PriceHistorySummary>, C>,
}

impl<P: MarketDataProvider> StockAnalyzer<P, SystemClock> {
    /// Create an analyzer on the wall clock
    pub fn new(provider: P, config: AnalyzerConfig) -> Self {
        Self::with_clock(provider, config, SystemClock)
    }
}

impl<P: MarketDataProvider, C: Clock> StockAnalyzer<P, C> {
    /// Create with an explicit clock (drives cache expiry and "now")
    pub fn with_clock(provider: P, config: AnalyzerConfig, clock: C) -> Self {
        let cache = DataCache::with_clock(config.cache_config(), clock);
        Self {
            provider,
            config,
            cache,
        }
    }

    /// Get current configuration
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn clock(&self) -> &C {
        self.cache.clock()
    }

    /// Current time as seen by the analyzer (UTC)
    pub fn now(&self) -> NaiveDateTime {
        self.cache.clock().now().naive_utc()
    }

    /// Chart-ready price history, served from cache while fresh
    pub fn history(&mut self, ticker: &str) -> AnalysisResult<Arc<PriceHistorySummary>> {
        let ticker = normalize_ticker(ticker)?;
        let provider = &self.provider;
        let history_config = &self.config.history;

        self.cache.get_or_try_insert_with(&ticker, || {
            tracing::info!("Fetching {} of daily bars for {}", history_config.range, ticker);
            let bars = provider.fetch_history(&ticker, &history_config.range)?;
            summarize_history(&ticker, &bars, history_config).map(Arc::new)
        })
    }

    /// Horizon table for a spot and target, measured against `now`
    pub fn horizons(
        &self,
        ticker: &str,
        spot: f64,
        target_strike: f64,
        now: NaiveDateTime,
    ) -> HorizonReport {
        let ticker = ticker.trim().to_ascii_uppercase();
        select_horizons(
            &self.provider,
            &ticker,
            spot,
            target_strike,
            now,
            &self.config.horizons,
        )
    }

    /// Full interaction: history first, then horizons against its latest close.
    ///
    /// Fails only when the history is unavailable; horizon problems show up as
    /// missing rows.
    pub fn analyze(&mut self, ticker: &str, target_strike: f64) -> AnalysisResult<Analysis> {
        if !target_strike.is_finite() {
            return Err(AnalysisError::invalid_input(format!(
                "Target strike must be a number, got {}",
                target_strike
            )));
        }

        let ticker = normalize_ticker(ticker)?;
        let history = self.history(&ticker)?;
        let now = self.now();
        let horizons = self.horizons(&ticker, history.current_price, target_strike, now);

        tracing::info!(
            "{}: {} bars, spot {}, {} horizon rows ({} skipped)",
            ticker,
            history.bar_count(),
            history.current_price,
            horizons.rows.len(),
            horizons.skipped.len()
        );

        Ok(Analysis {
            ticker,
            target_strike,
            history,
            horizons,
        })
    }
}

fn normalize_ticker(ticker: &str) -> AnalysisResult<String> {
    let ticker = ticker.trim().to_ascii_uppercase();
    if ticker.is_empty() {
        return Err(AnalysisError::invalid_input("Ticker is empty"));
    }
    Ok(ticker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CallQuote, PriceBar};
    use crate::data::{ManualClock, MarketSnapshot, SnapshotProvider};
    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    fn snapshot() -> MarketSnapshot {
        let start = NaiveDate::from_ymd_opt(2024, 12, 2).unwrap();
        let bars = (0..20)
            .map(|i| {
                let close = 100.0 + i as f64;
                PriceBar::new(start + Duration::days(i), close - 0.5, close + 1.0, close - 1.0, close, 1_000)
            })
            .collect();

        MarketSnapshot::new("TSLA")
            .with_bars(bars)
            .with_chain(
                NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
                vec![CallQuote::new(120.0, 3.0, 0.5), CallQuote::new(130.0, 1.0, 0.55)],
            )
    }

    fn analyzer() -> StockAnalyzer<SnapshotProvider, ManualClock> {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2025, 1, 2, 15, 0, 0).unwrap());
        StockAnalyzer::with_clock(SnapshotProvider::new(snapshot()), AnalyzerConfig::default(), clock)
    }

    #[test]
    fn test_analyze() {
        let mut analyzer = analyzer();
        let analysis = analyzer.analyze("tsla", 125.0).unwrap();

        assert_eq!(analysis.ticker, "TSLA");
        assert_eq!(analysis.history.current_price, 119.0);
        assert_eq!(analysis.horizons.rows.len(), 14);
        // 125 is equidistant from 120 and 130; the lower strike is listed first
        assert!(analysis.horizons.rows.iter().all(|r| r.strike == 120.0));
    }

    #[test]
    fn test_history_is_cached_for_an_hour() {
        let mut analyzer = analyzer();

        analyzer.analyze("TSLA", 120.0).unwrap();
        analyzer.analyze("tsla", 130.0).unwrap();
        assert_eq!(analyzer.provider().history_fetches(), 1);

        analyzer.clock().advance(Duration::minutes(61));
        analyzer.analyze("TSLA", 120.0).unwrap();
        assert_eq!(analyzer.provider().history_fetches(), 2);
    }

    #[test]
    fn test_option_chains_are_not_cached() {
        let mut analyzer = analyzer();
        analyzer.analyze("TSLA", 120.0).unwrap();
        analyzer.analyze("TSLA", 120.0).unwrap();
        assert_eq!(analyzer.provider().chain_fetches(), 2);
    }

    #[test]
    fn test_bad_inputs() {
        let mut analyzer = analyzer();
        assert!(matches!(analyzer.analyze("  ", 100.0), Err(AnalysisError::InvalidInput(_))));
        assert!(matches!(analyzer.analyze("TSLA", f64::NAN), Err(AnalysisError::InvalidInput(_))));
        assert!(matches!(analyzer.analyze("AAPL", 100.0), Err(AnalysisError::NoData(_))));
    }

    #[test]
    fn test_non_positive_target_still_analyzes() {
        let mut analyzer = analyzer();

        let analysis = analyzer.analyze("TSLA", 0.0).unwrap();
        assert_eq!(analysis.history.bar_count(), 20);
        assert!(analysis.horizons.rows.iter().all(|r| r.strike == 120.0));

        let analysis = analyzer.analyze("TSLA", -50.0).unwrap();
        assert_eq!(analysis.target_strike, -50.0);
        assert_eq!(analysis.horizons.rows.len(), 14);
    }
}
