//! Horizon targets and per-horizon results

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Nominal time-to-expiration used to pick a real expiration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorizonTarget {
    /// Display label, e.g. "1月"
    pub label: String,
    /// Nominal calendar days
    pub days: i64,
}

impl HorizonTarget {
    pub fn new(label: impl Into<String>, days: i64) -> Self {
        Self {
            label: label.into(),
            days,
        }
    }

    /// Standard catalog: weekly for two weeks, then monthly out to a year
    pub fn standard_catalog() -> Vec<HorizonTarget> {
        [
            ("1周", 7),
            ("2周", 14),
            ("1月", 30),
            ("2月", 60),
            ("3月", 90),
            ("4月", 120),
            ("5月", 150),
            ("6月", 180),
            ("7月", 210),
            ("8月", 240),
            ("9月", 270),
            ("10月", 300),
            ("11月", 330),
            ("1年", 365),
        ]
        .into_iter()
        .map(|(label, days)| HorizonTarget::new(label, days))
        .collect()
    }
}

/// Matched call option for one horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HorizonResult {
    pub period_label: String,
    pub expiration: NaiveDate,
    pub strike: f64,
    pub last_price: f64,
    /// Signed distance of the strike from spot, in percent
    pub distance_pct: f64,
    /// Premium as a percentage of spot
    pub cost_ratio_pct: f64,
    pub implied_vol_pct: f64,
}
