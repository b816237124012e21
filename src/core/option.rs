//! Option expirations and call quotes
//!
//! Only the call side of a chain is carried; the analyzer never looks at puts.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: i64 = 86_400;

/// A listed expiration together with its distance from "now"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionExpiration {
    /// Expiration date
    pub date: NaiveDate,
    /// Whole days from `now` until midnight of `date` (floored)
    pub days_until: i64,
}

impl OptionExpiration {
    /// Measure an expiration date against `now`.
    ///
    /// Partial days are floored, so an expiration at tomorrow's midnight seen
    /// at 10:00 today is 0 days away.
    pub fn new(date: NaiveDate, now: NaiveDateTime) -> Self {
        let seconds = (date.and_time(chrono::NaiveTime::MIN) - now).num_seconds();
        Self {
            date,
            days_until: seconds.div_euclid(SECONDS_PER_DAY),
        }
    }

    /// Strictly in the future
    pub fn is_eligible(&self) -> bool {
        self.days_until > 0
    }

    /// Absolute day distance from a nominal horizon
    pub fn distance_to(&self, nominal_days: i64) -> i64 {
        (self.days_until - nominal_days).abs()
    }
}

/// Call option quote for a single strike
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallQuote {
    /// Strike price
    pub strike: f64,
    /// Last traded price
    pub last_price: f64,
    /// Implied volatility as a fraction (0.35 = 35%)
    pub implied_volatility: f64,
    /// Exchange contract symbol, when the provider supplies one
    pub symbol: Option<String>,
}

impl CallQuote {
    pub fn new(strike: f64, last_price: f64, implied_volatility: f64) -> Self {
        Self {
            strike,
            last_price,
            implied_volatility,
            symbol: None,
        }
    }

    /// Absolute distance between this strike and a target
    pub fn strike_distance(&self, target: f64) -> f64 {
        (self.strike - target).abs()
    }
}
