//! Market-data provider seam
//!
//! The analyzer only ever talks to a provider through this trait, so the live
//! Yahoo client and offline snapshots are interchangeable.

use chrono::NaiveDate;

use crate::core::{AnalysisResult, CallQuote, PriceBar};

/// Source of daily bars and call chains for a ticker
pub trait MarketDataProvider {
    /// Daily bars over `range` (Yahoo range syntax, e.g. "2y"), oldest first
    fn fetch_history(&self, ticker: &str, range: &str) -> AnalysisResult<Vec<PriceBar>>;

    /// Listed option expirations, in provider order
    fn list_option_expirations(&self, ticker: &str) -> AnalysisResult<Vec<NaiveDate>>;

    /// Call side of the chain for one expiration, in provider order
    fn fetch_call_chain(&self, ticker: &str, expiration: NaiveDate) -> AnalysisResult<Vec<CallQuote>>;
}

impl<P: MarketDataProvider + ?Sized> MarketDataProvider for &P {
    fn fetch_history(&self, ticker: &str, range: &str) -> AnalysisResult<Vec<PriceBar>> {
        (**self).fetch_history(ticker, range)
    }

    fn list_option_expirations(&self, ticker: &str) -> AnalysisResult<Vec<NaiveDate>> {
        (**self).list_option_expirations(ticker)
    }

    fn fetch_call_chain(&self, ticker: &str, expiration: NaiveDate) -> AnalysisResult<Vec<CallQuote>> {
        (**self).fetch_call_chain(ticker, expiration)
    }
}

impl<P: MarketDataProvider + ?Sized> MarketDataProvider for Box<P> {
    fn fetch_history(&self, ticker: &str, range: &str) -> AnalysisResult<Vec<PriceBar>> {
        (**self).fetch_history(ticker, range)
    }

    fn list_option_expirations(&self, ticker: &str) -> AnalysisResult<Vec<NaiveDate>> {
        (**self).list_option_expirations(ticker)
    }

    fn fetch_call_chain(&self, ticker: &str, expiration: NaiveDate) -> AnalysisResult<Vec<CallQuote>> {
        (**self).fetch_call_chain(ticker, expiration)
    }
}
