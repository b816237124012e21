//! Chip distribution and option-horizon analysis
//!
//! Two stages feed the presentation layer:
//! 1. **History aggregation**: daily bars → candlesticks, axis bounds and a
//!    volume-by-price ("chip") histogram
//! 2. **Horizon selection**: per nominal horizon, the nearest expiration and
//!    the call nearest the target strike, with distance/cost/IV in percent
//!
//! `StockAnalyzer` ties both to a provider and the history cache.

mod analyzer;
mod chips;
mod config;
mod history;
mod selector;

pub use analyzer::*;
pub use chips::*;
pub use config::*;
pub use history::*;
pub use selector::*;

use serde::{Deserialize, Serialize};

use crate::core::HorizonResult;

/// Round to cents
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// How expensive a call is relative to spot, per `CostTierConfig`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CostTier {
    /// Below `green_below`
    Green,
    Yellow,
    /// Above `red_above`
    Red,
}

impl CostTier {
    /// CSS class used by the HTML table
    pub fn css_class(&self) -> &'static str {
        match self {
            CostTier::Green => "tag-green",
            CostTier::Yellow => "tag-yellow",
            CostTier::Red => "tag-red",
        }
    }
}

/// Whether a strike sits above spot (highlighted) or not (muted)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceStyle {
    Active,
    Muted,
}

impl DistanceStyle {
    pub fn from_distance(distance_pct: f64) -> Self {
        if distance_pct > 0.0 {
            DistanceStyle::Active
        } else {
            DistanceStyle::Muted
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            DistanceStyle::Active => "dist-active",
            DistanceStyle::Muted => "dist-gray",
        }
    }
}

impl HorizonResult {
    pub fn cost_tier(&self, tiers: &CostTierConfig) -> CostTier {
        tiers.classify(self.cost_ratio_pct)
    }

    pub fn distance_style(&self) -> DistanceStyle {
        DistanceStyle::from_distance(self.distance_pct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_tier_boundaries() {
        let tiers = CostTierConfig::default();
        assert_eq!(tiers.classify(4.99), CostTier::Green);
        assert_eq!(tiers.classify(5.0), CostTier::Yellow);
        assert_eq!(tiers.classify(15.0), CostTier::Yellow);
        assert_eq!(tiers.classify(15.01), CostTier::Red);
        assert_eq!(CostTier::Red.css_class(), "tag-red");
    }

    #[test]
    fn test_cost_tier_uses_configured_thresholds() {
        let row = HorizonResult {
            period_label: "1月".to_string(),
            expiration: chrono::NaiveDate::from_ymd_opt(2025, 2, 21).unwrap(),
            strike: 530.0,
            last_price: 20.0,
            distance_pct: 6.0,
            cost_ratio_pct: 4.0,
            implied_vol_pct: 55.0,
        };
        let tight = CostTierConfig {
            green_below: 2.0,
            red_above: 3.0,
        };

        assert_eq!(row.cost_tier(&CostTierConfig::default()), CostTier::Green);
        assert_eq!(row.cost_tier(&tight), CostTier::Red);
    }

    #[test]
    fn test_distance_style() {
        assert_eq!(DistanceStyle::from_distance(0.01), DistanceStyle::Active);
        assert_eq!(DistanceStyle::from_distance(0.0), DistanceStyle::Muted);
        assert_eq!(DistanceStyle::from_distance(-3.0), DistanceStyle::Muted);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(101.456), 101.46);
        assert_eq!(round2(99.994), 99.99);
    }
}
