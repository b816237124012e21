//! # Stock Analyzer - Chip Distribution & Call Horizons
//!
//! Fetches two years of daily bars and the option chain for a single ticker,
//! derives a volume-by-price ("chip") distribution, and compares call pricing
//! across nominal horizons around a target strike.
//!
//! ## Key Components
//!
//! - **Data Fetching**: Yahoo Finance daily bars and call chains, offline snapshots
//! - **Caching**: per-ticker history cache with a one hour TTL and injectable clock
//! - **History Aggregation**: candlesticks, padded axis bounds, 80-bucket chip histogram
//! - **Horizon Selection**: nearest expiration per horizon, nearest strike per chain
//! - **Rendering**: ECharts options JSON and an HTML/text horizon table
//!
//! ## Usage
//!
//! ```rust,no_run
//! use stock_analyzer::prelude::*;
//!
//! let client = YahooClient::new().unwrap();
//! let mut analyzer = StockAnalyzer::new(client, AnalyzerConfig::default());
//!
//! let analysis = analyzer.analyze("TSLA", 530.0).unwrap();
//! println!("{}", text_table(&analysis.horizons.rows, &analyzer.config().cost_tiers));
//! ```
//!
//! ## What This Does NOT Do
//!
//! - Price options or compute Greeks
//! - Stream real-time quotes
//! - Persist anything beyond the in-memory history cache

pub mod analysis;
pub mod core;
pub mod data;
pub mod render;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        AnalysisError, AnalysisResult, CallQuote, HorizonResult, HorizonTarget, OptionExpiration,
        PriceBar,
    };

    // Data fetching
    pub use crate::data::{
        CacheConfig, Clock, DataCache, ManualClock, MarketDataProvider, MarketSnapshot,
        SnapshotProvider, SystemClock, YahooClient,
    };

    // Analysis
    pub use crate::analysis::{
        select_horizons, summarize_history, Analysis, AnalyzerConfig, ChipBucket,
        ChipDistribution, CostTier, CostTierConfig, DistanceStyle, HistoryConfig, HorizonReport,
        PriceHistorySummary, SkippedHorizon, StockAnalyzer,
    };

    // Rendering
    pub use crate::render::{chart_options, html_table, text_table};
}

// Re-export main types at crate root
pub use crate::analysis::{AnalyzerConfig, StockAnalyzer};
pub use crate::core::{AnalysisError, AnalysisResult};
