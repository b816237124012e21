//! Price-history aggregation
//!
//! Turns a window of daily bars into everything the chart needs: date axis,
//! candlestick tuples, padded value-axis bounds, the chip distribution and the
//! latest close.

use serde::{Deserialize, Serialize};

use super::config::HistoryConfig;
use super::{round2, ChipDistribution};
use crate::core::{AnalysisError, AnalysisResult, PriceBar};

/// Chart-ready view of a ticker's price history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistorySummary {
    pub ticker: String,
    /// `YYYY-MM-DD`, ascending
    pub dates: Vec<String>,
    /// (open, close, low, high), index-aligned with `dates`
    pub kline: Vec<[f64; 4]>,
    /// min(low) padded downwards
    pub min_axis: f64,
    /// max(high) padded upwards
    pub max_axis: f64,
    pub chips: ChipDistribution,
    /// Latest close, rounded to cents
    pub current_price: f64,
}

impl PriceHistorySummary {
    pub fn bar_count(&self) -> usize {
        self.dates.len()
    }

    pub fn first_date(&self) -> Option<&str> {
        self.dates.first().map(String::as_str)
    }

    pub fn last_date(&self) -> Option<&str> {
        self.dates.last().map(String::as_str)
    }
}

/// Aggregate a window of daily bars.
///
/// Fails with `NoData` on an empty window and `Data` on a bar with
/// non-finite or negative prices; there is no partial result.
pub fn summarize_history(
    ticker: &str,
    bars: &[PriceBar],
    config: &HistoryConfig,
) -> AnalysisResult<PriceHistorySummary> {
    if bars.is_empty() {
        return Err(AnalysisError::no_data(format!("No daily bars for {}", ticker)));
    }

    if let Some(bad) = bars.iter().find(|b| !b.is_valid()) {
        return Err(AnalysisError::data(format!(
            "Invalid bar for {} on {}",
            ticker, bad.date
        )));
    }

    let mut bars = bars.to_vec();
    bars.sort_by_key(|b| b.date);

    let min_low = bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    let max_high = bars.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);

    let chips = ChipDistribution::from_bars(&bars, config.chip_buckets)
        .ok_or_else(|| AnalysisError::data("Chip distribution needs at least one bucket"))?;

    // Non-empty was checked above
    let current_price = bars.last().map(|b| round2(b.close)).unwrap_or_default();

    Ok(PriceHistorySummary {
        ticker: ticker.to_string(),
        dates: bars.iter().map(|b| b.date.format("%Y-%m-%d").to_string()).collect(),
        kline: bars.iter().map(PriceBar::kline).collect(),
        min_axis: min_low * (1.0 - config.axis_padding),
        max_axis: max_high * (1.0 + config.axis_padding),
        chips,
        current_price,
    })
}
