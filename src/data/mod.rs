//! Data fetching and caching
//!
//! Handles:
//! - The provider seam the analyzer fetches through
//! - Yahoo Finance API for daily bars and option chains (free)
//! - Offline JSON snapshots
//! - Time-bounded in-memory caching

pub mod provider;
pub mod yahoo;
pub mod snapshot;
pub mod cache;

pub use provider::*;
pub use yahoo::*;
pub use snapshot::*;
pub use cache::*;
