//! Configuration for the analysis pipeline

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::CostTier;
use crate::core::{AnalysisError, AnalysisResult, HorizonTarget};
use crate::data::CacheConfig;

/// Configuration for a full analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Price-history aggregation
    pub history: HistoryConfig,
    /// Cost-ratio tier thresholds
    pub cost_tiers: CostTierConfig,
    /// Horizon catalog, matched in order
    pub horizons: Vec<HorizonTarget>,
    /// How long a ticker's history summary stays cached (seconds)
    /// Default: 3600
    pub cache_ttl_secs: i64,
    /// HTTP request timeout for the live provider (seconds)
    /// Default: 30
    pub request_timeout_secs: u64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            history: HistoryConfig::default(),
            cost_tiers: CostTierConfig::default(),
            horizons: HorizonTarget::standard_catalog(),
            cache_ttl_secs: 3600,
            request_timeout_secs: 30,
        }
    }
}

impl AnalyzerConfig {
    /// Short-dated settings: one year of history, horizons out to three months
    pub fn short_dated() -> Self {
        Self {
            history: HistoryConfig {
                range: "1y".to_string(),
                ..Default::default()
            },
            horizons: HorizonTarget::standard_catalog()
                .into_iter()
                .filter(|h| h.days <= 90)
                .collect(),
            ..Default::default()
        }
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> AnalysisResult<Self> {
        let json = fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&json)
            .map_err(|e| AnalysisError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot work with
    pub fn validate(&self) -> AnalysisResult<()> {
        if self.history.chip_buckets == 0 {
            return Err(AnalysisError::invalid_input("chip_buckets must be positive"));
        }
        if !(0.0..1.0).contains(&self.history.axis_padding) {
            return Err(AnalysisError::invalid_input("axis_padding must be in [0, 1)"));
        }
        if self.cost_tiers.green_below > self.cost_tiers.red_above {
            return Err(AnalysisError::invalid_input(
                "green_below must not exceed red_above",
            ));
        }
        if self.horizons.is_empty() {
            return Err(AnalysisError::invalid_input("horizon catalog is empty"));
        }
        if let Some(h) = self.horizons.iter().find(|h| h.days <= 0) {
            return Err(AnalysisError::invalid_input(format!(
                "horizon {} has non-positive days",
                h.label
            )));
        }
        if self.cache_ttl_secs < 0 {
            return Err(AnalysisError::invalid_input("cache_ttl_secs must not be negative"));
        }
        Ok(())
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            ttl_secs: self.cache_ttl_secs,
            enabled: self.cache_ttl_secs > 0,
        }
    }
}

/// Price-history aggregation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Lookback range in provider syntax
    /// Default: "2y"
    pub range: String,

    /// Number of equal-width close-price buckets
    /// Default: 80
    pub chip_buckets: usize,

    /// Fractional padding below min(low) and above max(high)
    /// Default: 0.05
    pub axis_padding: f64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            range: "2y".to_string(),
            chip_buckets: 80,
            axis_padding: 0.05,
        }
    }
}

/// Cost-ratio tier thresholds (percent of spot)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CostTierConfig {
    /// Ratios strictly below this are cheap
    /// Default: 5.0
    pub green_below: f64,
    /// Ratios strictly above this are expensive
    /// Default: 15.0
    pub red_above: f64,
}

impl Default for CostTierConfig {
    fn default() -> Self {
        Self {
            green_below: 5.0,
            red_above: 15.0,
        }
    }
}

impl CostTierConfig {
    pub fn classify(&self, cost_ratio_pct: f64) -> CostTier {
        if cost_ratio_pct < self.green_below {
            CostTier::Green
        } else if cost_ratio_pct > self.red_above {
            CostTier::Red
        } else {
            CostTier::Yellow
        }
    }
}
