//! Presentation output
//!
//! Chart options for an ECharts-compatible widget and the horizon table.

pub mod chart;
pub mod table;

pub use chart::*;
pub use table::*;
