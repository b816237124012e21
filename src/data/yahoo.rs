//! Yahoo Finance data fetcher
//!
//! Fetches daily history and option chains from Yahoo Finance's unofficial API.
//!
//! Note: This is for educational/research purposes. Yahoo Finance
//! data is delayed ~15 minutes and intended for personal use.

use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::Deserialize;

use super::provider::MarketDataProvider;
use crate::core::{AnalysisError, AnalysisResult, CallQuote, PriceBar};

/// Yahoo Finance API client
pub struct YahooClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooClient {
    /// Client with a 30 second request timeout
    pub fn new() -> AnalysisResult<Self> {
        Self::with_timeout(Duration::from_secs(30))
    }

    pub fn with_timeout(timeout: Duration) -> AnalysisResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .timeout(timeout)
            .build()
            .map_err(|e| AnalysisError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: "https://query1.finance.yahoo.com".to_string(),
        })
    }

    /// Point the client at a different host (mirrors, proxies)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str, what: &str) -> AnalysisResult<T> {
        tracing::debug!("GET {}", url);

        self.client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| AnalysisError::Network(e.to_string()))?
            .json()
            .map_err(|e| AnalysisError::Data(format!("Failed to parse {}: {}", what, e)))
    }

    /// Get daily bars for the given range
    pub fn get_history(&self, symbol: &str, range: &str) -> AnalysisResult<Vec<PriceBar>> {
        let url = format!(
            "{}/v8/finance/chart/{}?range={}&interval=1d",
            self.base_url, symbol, range
        );

        let response: YahooChartResponse = self.get_json(&url, "chart")?;

        let result = response.chart.result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| AnalysisError::no_data(format!("No chart data returned for {}", symbol)))?;

        let bars = convert_chart(result);
        tracing::info!("Fetched {} daily bars for {} ({})", bars.len(), symbol, range);

        Ok(bars)
    }

    /// Get available option expiration dates
    pub fn get_expirations(&self, symbol: &str) -> AnalysisResult<Vec<NaiveDate>> {
        let url = format!("{}/v7/finance/options/{}", self.base_url, symbol);

        let response: YahooOptionsResponse = self.get_json(&url, "options")?;

        let chain = response.option_chain.result
            .into_iter()
            .next()
            .ok_or_else(|| AnalysisError::no_data("No options data returned"))?;

        let expiries: Vec<NaiveDate> = chain.expiration_dates
            .iter()
            .filter_map(|&ts| {
                DateTime::from_timestamp(ts, 0)
                    .map(|dt| dt.date_naive())
            })
            .collect();

        Ok(expiries)
    }

    /// Get call quotes for a specific expiration
    pub fn get_calls(&self, symbol: &str, expiry: NaiveDate) -> AnalysisResult<Vec<CallQuote>> {
        // Yahoo keys chains by midnight UTC of the expiration date
        let expiry_ts = expiry.and_time(NaiveTime::MIN).and_utc().timestamp();

        let url = format!(
            "{}/v7/finance/options/{}?date={}",
            self.base_url, symbol, expiry_ts
        );

        let response: YahooOptionsResponse = self.get_json(&url, "options")?;

        let chain_data = response.option_chain.result
            .into_iter()
            .next()
            .ok_or_else(|| AnalysisError::no_data("No options data returned"))?;

        let calls: Vec<CallQuote> = chain_data.options
            .into_iter()
            .next()
            .map(|o| o.calls.iter().filter_map(convert_call).collect())
            .unwrap_or_default();

        tracing::debug!("{} {}: {} calls", symbol, expiry, calls.len());
        Ok(calls)
    }
}

impl MarketDataProvider for YahooClient {
    fn fetch_history(&self, ticker: &str, range: &str) -> AnalysisResult<Vec<PriceBar>> {
        self.get_history(ticker, range)
    }

    fn list_option_expirations(&self, ticker: &str) -> AnalysisResult<Vec<NaiveDate>> {
        self.get_expirations(ticker)
    }

    fn fetch_call_chain(&self, ticker: &str, expiration: NaiveDate) -> AnalysisResult<Vec<CallQuote>> {
        self.get_calls(ticker, expiration)
    }
}

/// Turn the columnar chart payload into bars, dropping incomplete rows
fn convert_chart(result: YahooChartResult) -> Vec<PriceBar> {
    let offset = result.meta.gmtoffset.unwrap_or(0);
    let quote = match result.indicators.quote.into_iter().next() {
        Some(q) => q,
        None => return Vec::new(),
    };

    let mut bars = Vec::with_capacity(result.timestamp.len());
    let mut dropped = 0;

    for (i, &ts) in result.timestamp.iter().enumerate() {
        // Shift to exchange-local time before taking the calendar date
        let date = match DateTime::from_timestamp(ts + offset, 0) {
            Some(dt) => dt.date_naive(),
            None => {
                dropped += 1;
                continue;
            }
        };

        let prices = (
            value_at(&quote.open, i),
            value_at(&quote.high, i),
            value_at(&quote.low, i),
            value_at(&quote.close, i),
        );

        match prices {
            (Some(open), Some(high), Some(low), Some(close)) => {
                let volume = quote.volume.get(i).copied().flatten().unwrap_or(0);
                let bar = PriceBar::new(date, open, high, low, close, volume.max(0) as u64);
                if bar.is_valid() {
                    bars.push(bar);
                } else {
                    dropped += 1;
                }
            }
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        tracing::warn!("Dropped {} incomplete daily rows", dropped);
    }

    bars
}

fn value_at(column: &[Option<f64>], i: usize) -> Option<f64> {
    column.get(i).copied().flatten()
}

fn convert_call(data: &YahooOptionData) -> Option<CallQuote> {
    let strike = data.strike.filter(|s| s.is_finite() && *s > 0.0)?;

    Some(CallQuote {
        strike,
        last_price: data.last_price.unwrap_or(0.0),
        implied_volatility: data.implied_volatility.unwrap_or(0.0),
        symbol: data.contract_symbol.clone(),
    })
}

// Yahoo Finance API response structures

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooChartResult>>,
}

#[derive(Debug, Deserialize)]
struct YahooChartResult {
    meta: YahooChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooChartMeta {
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionsResponse {
    #[serde(rename = "optionChain")]
    option_chain: YahooOptionChain,
}

#[derive(Debug, Deserialize)]
struct YahooOptionChain {
    result: Vec<YahooOptionChainData>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionChainData {
    #[serde(rename = "expirationDates", default)]
    expiration_dates: Vec<i64>,
    #[serde(default)]
    options: Vec<YahooOptions>,
}

#[derive(Debug, Deserialize)]
struct YahooOptions {
    #[serde(default)]
    calls: Vec<YahooOptionData>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionData {
    #[serde(rename = "contractSymbol")]
    contract_symbol: Option<String>,
    strike: Option<f64>,
    #[serde(rename = "lastPrice")]
    last_price: Option<f64>,
    #[serde(rename = "impliedVolatility")]
    implied_volatility: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_chart_drops_null_rows() {
        let json = r#"{
            "chart": {"result": [{
                "meta": {"gmtoffset": -14400},
                "timestamp": [1736519400, 1736778600, 1736865000],
                "indicators": {"quote": [{
                    "open":   [100.0, null, 102.0],
                    "high":   [105.0, 106.0, 108.0],
                    "low":    [99.0, 100.0, 101.0],
                    "close":  [104.0, 105.0, 107.0],
                    "volume": [1000, 2000, null]
                }]}
            }], "error": null}
        }"#;

        let response: YahooChartResponse = serde_json::from_str(json).unwrap();
        let result = response.chart.result.unwrap().into_iter().next().unwrap();
        let bars = convert_chart(result);

        assert_eq!(bars.len(), 2);
        // 2025-01-10 14:30 UTC is 10:30 in New York
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
        assert_eq!(bars[0].volume, 1000);
        assert_eq!(bars[1].close, 107.0);
        assert_eq!(bars[1].volume, 0);
    }

    #[test]
    fn test_convert_call_requires_strike() {
        let json = r#"[
            {"contractSymbol": "TSLA250117C00500000", "strike": 500.0, "lastPrice": 12.3, "impliedVolatility": 0.55},
            {"contractSymbol": "BROKEN", "strike": null, "lastPrice": 1.0},
            {"strike": 510.0}
        ]"#;

        let data: Vec<YahooOptionData> = serde_json::from_str(json).unwrap();
        let calls: Vec<CallQuote> = data.iter().filter_map(convert_call).collect();

        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].symbol.as_deref(), Some("TSLA250117C00500000"));
        assert_eq!(calls[0].implied_volatility, 0.55);
        assert_eq!(calls[1].last_price, 0.0);
    }

    #[test]
    fn test_unreachable_host_is_network_error() {
        let client = YahooClient::with_timeout(Duration::from_secs(2))
            .unwrap()
            .with_base_url("http://127.0.0.1:1");

        let err = client.get_history("TSLA", "1mo").unwrap_err();
        assert!(matches!(err, AnalysisError::Network(_)));
        assert!(matches!(
            client.fetch_call_chain("TSLA", NaiveDate::from_ymd_opt(2025, 1, 17).unwrap()),
            Err(AnalysisError::Network(_))
        ));
    }

    #[test]
    #[ignore] // Requires network
    fn test_get_history() {
        let client = YahooClient::new().unwrap();
        let bars = client.get_history("QQQ", "1mo").unwrap();

        assert!(!bars.is_empty());
        assert!(bars.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    #[ignore] // Requires network
    fn test_get_calls() {
        let client = YahooClient::new().unwrap();
        let expiries = client.get_expirations("QQQ").unwrap();

        if let Some(&expiry) = expiries.first() {
            let calls = client.get_calls("QQQ", expiry).unwrap();
            println!("Chain for {}: {} calls", expiry, calls.len());
            assert!(!calls.is_empty());
        }
    }
}
