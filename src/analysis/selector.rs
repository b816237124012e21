//! Option-horizon selection
//!
//! For each nominal horizon, pick the listed expiration whose distance in days
//! is closest, then the call whose strike is closest to the target, and derive
//! distance, cost ratio and IV in percent.
//!
//! Ties go to the first candidate in provider order. Yahoo lists expirations
//! and strikes ascending, so in practice the earlier expiration and the lower
//! strike win.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::core::{CallQuote, HorizonResult, HorizonTarget, OptionExpiration};
use crate::data::MarketDataProvider;

/// A horizon that produced no row, with the reason
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedHorizon {
    pub label: String,
    pub expiration: NaiveDate,
    pub reason: String,
}

/// Outcome of one selection pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HorizonReport {
    /// Matched rows, in catalog order
    pub rows: Vec<HorizonResult>,
    /// Horizons whose chain could not be resolved
    pub skipped: Vec<SkippedHorizon>,
}

impl HorizonReport {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, label: &str) -> Option<&HorizonResult> {
        self.rows.iter().find(|r| r.period_label == label)
    }
}

/// Strictly-future expirations, measured against `now`, in provider order
pub fn eligible_expirations(dates: &[NaiveDate], now: NaiveDateTime) -> Vec<OptionExpiration> {
    dates
        .iter()
        .map(|&d| OptionExpiration::new(d, now))
        .filter(OptionExpiration::is_eligible)
        .collect()
}

/// Expiration closest to `nominal_days` (first on ties)
pub fn nearest_expiration(
    eligible: &[OptionExpiration],
    nominal_days: i64,
) -> Option<&OptionExpiration> {
    eligible.iter().min_by_key(|e| e.distance_to(nominal_days))
}

/// Call whose strike is closest to `target_strike` (first on ties)
pub fn nearest_call(calls: &[CallQuote], target_strike: f64) -> Option<&CallQuote> {
    calls
        .iter()
        .filter(|c| c.strike.is_finite())
        .min_by(|a, b| {
            a.strike_distance(target_strike)
                .total_cmp(&b.strike_distance(target_strike))
        })
}

/// Derived metrics for a matched call
pub fn horizon_metrics(
    label: &str,
    expiration: NaiveDate,
    quote: &CallQuote,
    spot: f64,
) -> HorizonResult {
    HorizonResult {
        period_label: label.to_string(),
        expiration,
        strike: quote.strike,
        last_price: quote.last_price,
        distance_pct: (quote.strike / spot - 1.0) * 100.0,
        cost_ratio_pct: quote.last_price / spot * 100.0,
        implied_vol_pct: quote.implied_volatility * 100.0,
    }
}

/// Run horizon selection for one ticker.
///
/// Never fails: an unusable spot, a failed expiration listing or no future
/// expirations yield an empty report, and a chain that cannot be fetched (or
/// holds no calls) skips only the horizons matched to it. Each expiration's
/// chain is requested at most once per call.
pub fn select_horizons<P: MarketDataProvider + ?Sized>(
    provider: &P,
    ticker: &str,
    spot: f64,
    target_strike: f64,
    now: NaiveDateTime,
    catalog: &[HorizonTarget],
) -> HorizonReport {
    let mut report = HorizonReport::default();

    if !(spot.is_finite() && spot > 0.0) {
        tracing::warn!("Skipping horizon selection for {}: spot {} unusable", ticker, spot);
        return report;
    }

    let dates = match provider.list_option_expirations(ticker) {
        Ok(dates) => dates,
        Err(e) => {
            tracing::warn!("No expirations for {}: {}", ticker, e);
            return report;
        }
    };

    let eligible = eligible_expirations(&dates, now);
    if eligible.is_empty() {
        tracing::info!("{} has no future expirations ({} listed)", ticker, dates.len());
        return report;
    }

    let mut chains: HashMap<NaiveDate, Result<Vec<CallQuote>, String>> = HashMap::new();

    for horizon in catalog {
        let Some(expiration) = nearest_expiration(&eligible, horizon.days) else {
            continue;
        };

        tracing::debug!(
            "{} {} -> {} ({} days)",
            ticker,
            horizon.label,
            expiration.date,
            expiration.days_until
        );

        let chain = chains.entry(expiration.date).or_insert_with(|| {
            provider
                .fetch_call_chain(ticker, expiration.date)
                .map_err(|e| e.to_string())
        });

        let outcome = match chain {
            Ok(calls) => nearest_call(calls, target_strike)
                .map(|quote| horizon_metrics(&horizon.label, expiration.date, quote, spot))
                .ok_or_else(|| "chain has no calls".to_string()),
            Err(reason) => Err(reason.clone()),
        };

        match outcome {
            Ok(row) => report.rows.push(row),
            Err(reason) => {
                tracing::warn!(
                    "Skipping {} {} ({}): {}",
                    ticker,
                    horizon.label,
                    expiration.date,
                    reason
                );
                report.skipped.push(SkippedHorizon {
                    label: horizon.label.clone(),
                    expiration: expiration.date,
                    reason,
                });
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{MarketSnapshot, SnapshotProvider};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    /// Expiration whose `days_until` seen from `now()` equals `days`
    fn in_days(days: i64) -> NaiveDate {
        now().date() + chrono::Duration::days(days + 1)
    }

    fn calls() -> Vec<CallQuote> {
        vec![
            CallQuote::new(90.0, 14.0, 0.50),
            CallQuote::new(100.0, 6.0, 0.45),
            CallQuote::new(110.0, 2.5, 0.40),
        ]
    }

    fn targets(days: &[(&str, i64)]) -> Vec<HorizonTarget> {
        days.iter().map(|&(l, d)| HorizonTarget::new(l, d)).collect()
    }

    #[test]
    fn test_in_days_helper() {
        assert_eq!(OptionExpiration::new(in_days(5), now()).days_until, 5);
    }

    #[test]
    fn test_nearest_expiration_per_horizon() {
        let eligible = eligible_expirations(
            &[in_days(5), in_days(20), in_days(95), in_days(400)],
            now(),
        );

        let pick = |d| nearest_expiration(&eligible, d).unwrap().days_until;
        assert_eq!(pick(7), 5);
        assert_eq!(pick(30), 20);
        assert_eq!(pick(90), 95);
        assert_eq!(pick(365), 400);
        // 14 is 9 from 5 and 6 from 20
        assert_eq!(pick(14), 20);
    }

    #[test]
    fn test_horizons_may_share_an_expiration() {
        let provider = SnapshotProvider::new(
            MarketSnapshot::new("TSLA").with_chain(in_days(10), calls()),
        );

        let report = select_horizons(
            &provider,
            "TSLA",
            100.0,
            100.0,
            now(),
            &targets(&[("1周", 7), ("2周", 14)]),
        );

        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].expiration, in_days(10));
        assert_eq!(report.rows[1].expiration, in_days(10));
        // Chain is fetched once for both horizons
        assert_eq!(provider.chain_fetches(), 1);
    }

    #[test]
    fn test_expiration_ties_take_first_listed() {
        // 7 is 3 days from both 4 and 10
        let eligible = eligible_expirations(&[in_days(10), in_days(4)], now());
        assert_eq!(nearest_expiration(&eligible, 7).unwrap().days_until, 10);
    }

    #[test]
    fn test_strike_ties_take_first_listed() {
        let chain = vec![CallQuote::new(95.0, 8.0, 0.4), CallQuote::new(105.0, 4.0, 0.4)];
        assert_eq!(nearest_call(&chain, 100.0).unwrap().strike, 95.0);
        assert!(nearest_call(&[], 100.0).is_none());
    }

    #[test]
    fn test_metrics() {
        let above = horizon_metrics("1月", in_days(30), &CallQuote::new(110.0, 2.5, 0.4), 100.0);
        assert!((above.distance_pct - 10.0).abs() < 1e-9);
        assert!((above.cost_ratio_pct - 2.5).abs() < 1e-9);
        assert!((above.implied_vol_pct - 40.0).abs() < 1e-9);

        let below = horizon_metrics("1月", in_days(30), &CallQuote::new(90.0, 14.0, 0.5), 100.0);
        assert!(below.distance_pct < 0.0);

        let at = horizon_metrics("1月", in_days(30), &CallQuote::new(412.37, 20.0, 0.5), 412.37);
        assert_eq!(at.distance_pct, 0.0);
    }

    #[test]
    fn test_past_and_same_day_expirations_are_ignored() {
        let provider = SnapshotProvider::new(
            MarketSnapshot::new("TSLA")
                .with_chain(now().date(), calls())
                .with_chain(in_days(0), calls()),
        );

        let report = select_horizons(&provider, "TSLA", 100.0, 100.0, now(), &targets(&[("1周", 7)]));
        assert!(report.is_empty());
        assert_eq!(provider.chain_fetches(), 0);
    }

    #[test]
    fn test_failed_chain_skips_only_its_horizons() {
        let provider = SnapshotProvider::new(
            MarketSnapshot::new("TSLA")
                .with_chain(in_days(7), calls())
                .with_chain(in_days(30), calls())
                .with_chain(in_days(90), calls()),
        )
        .with_failing_chain(in_days(30));

        let report = select_horizons(
            &provider,
            "TSLA",
            100.0,
            104.0,
            now(),
            &targets(&[("1周", 7), ("1月", 30), ("3月", 90)]),
        );

        let labels: Vec<&str> = report.rows.iter().map(|r| r.period_label.as_str()).collect();
        assert_eq!(labels, vec!["1周", "3月"]);
        assert_eq!(report.rows[0].strike, 100.0);
        assert_eq!(report.rows[1].expiration, in_days(90));

        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].label, "1月");
        assert!(report.skipped[0].reason.contains("failed"));
    }

    #[test]
    fn test_empty_chain_skips_horizon() {
        let provider = SnapshotProvider::new(
            MarketSnapshot::new("TSLA")
                .with_chain(in_days(7), vec![])
                .with_chain(in_days(60), calls()),
        );

        let report = select_horizons(
            &provider,
            "TSLA",
            100.0,
            100.0,
            now(),
            &targets(&[("1周", 7), ("2月", 60)]),
        );

        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].period_label, "2月");
        assert_eq!(report.skipped[0].reason, "chain has no calls");
    }

    #[test]
    fn test_unavailable_inputs_give_empty_report() {
        let provider = SnapshotProvider::new(MarketSnapshot::new("TSLA").with_chain(in_days(30), calls()));
        let catalog = HorizonTarget::standard_catalog();

        // Unknown ticker: listing fails
        assert!(select_horizons(&provider, "AAPL", 100.0, 100.0, now(), &catalog).is_empty());
        // No spot to divide by
        assert!(select_horizons(&provider, "TSLA", 0.0, 100.0, now(), &catalog).is_empty());
        // Nothing listed
        let bare = SnapshotProvider::new(MarketSnapshot::new("TSLA"));
        assert!(select_horizons(&bare, "TSLA", 100.0, 100.0, now(), &catalog).is_empty());
    }
}
