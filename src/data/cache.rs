//! In-memory data caching
//!
//! Caches fetched data per ticker for a bounded time to reduce API calls.
//! Expiry is checked on read; nothing runs in the background.

use std::cell::Cell;
use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::core::AnalysisResult;

/// Source of the current time
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for deterministic expiry
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum age before refresh (in seconds)
    pub ttl_secs: i64,
    /// Whether to use cache
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 3600,
            enabled: true,
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    stored_at: DateTime<Utc>,
    value: V,
}

/// Ticker-keyed cache with time-based expiry
pub struct DataCache<V, C: Clock = SystemClock> {
    config: CacheConfig,
    clock: C,
    entries: HashMap<String, CacheEntry<V>>,
}

impl<V: Clone> DataCache<V, SystemClock> {
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<V: Clone, C: Clock> DataCache<V, C> {
    pub fn with_clock(config: CacheConfig, clock: C) -> Self {
        Self {
            config,
            clock,
            entries: HashMap::new(),
        }
    }

    /// Tickers are case-insensitive
    fn cache_key(symbol: &str) -> String {
        symbol.trim().to_ascii_uppercase()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    fn is_fresh(&self, entry: &CacheEntry<V>) -> bool {
        self.clock.now() - entry.stored_at < Duration::seconds(self.config.ttl_secs)
    }

    /// Cached value for `symbol`, evicting it if it has expired
    pub fn get(&mut self, symbol: &str) -> Option<V> {
        if !self.config.enabled {
            return None;
        }

        let key = Self::cache_key(symbol);
        let fresh = self.entries.get(&key).map(|e| self.is_fresh(e))?;

        if fresh {
            self.entries.get(&key).map(|e| e.value.clone())
        } else {
            tracing::debug!("Cache entry for {} expired", key);
            self.entries.remove(&key);
            None
        }
    }

    pub fn insert(&mut self, symbol: &str, value: V) {
        if !self.config.enabled {
            return;
        }

        let entry = CacheEntry {
            stored_at: self.clock.now(),
            value,
        };
        self.entries.insert(Self::cache_key(symbol), entry);
    }

    /// Read-through lookup: serve from cache, otherwise run `fetch` and store
    /// its value. Errors are returned as-is and never cached.
    pub fn get_or_try_insert_with<F>(&mut self, symbol: &str, fetch: F) -> AnalysisResult<V>
    where
        F: FnOnce() -> AnalysisResult<V>,
    {
        if let Some(value) = self.get(symbol) {
            tracing::info!("Loaded {} from cache", Self::cache_key(symbol));
            return Ok(value);
        }

        let value = fetch()?;
        self.insert(symbol, value.clone());
        Ok(value)
    }

    /// Drop every expired entry
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now();
        let ttl = Duration::seconds(self.config.ttl_secs);
        let before = self.entries.len();
        self.entries.retain(|_, e| now - e.stored_at < ttl);
        before - self.entries.len()
    }

    /// Number of stored entries (expired ones included until read or purged)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AnalysisError;
    use chrono::TimeZone;

    fn cache() -> DataCache<u32, ManualClock> {
        let start = Utc.with_ymd_and_hms(2025, 1, 10, 14, 30, 0).unwrap();
        DataCache::with_clock(CacheConfig::default(), ManualClock::new(start))
    }

    #[test]
    fn test_cache_expiry() {
        let mut cache = cache();
        cache.insert("tsla", 7);

        assert_eq!(cache.get("TSLA"), Some(7));

        cache.clock().advance(Duration::seconds(3599));
        assert_eq!(cache.get("TSLA"), Some(7));

        cache.clock().advance(Duration::seconds(1));
        assert_eq!(cache.get("TSLA"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_read_through_does_not_cache_errors() {
        let mut cache = cache();

        let err = cache.get_or_try_insert_with("AAPL", || Err(AnalysisError::no_data("empty")));
        assert!(err.is_err());
        assert!(cache.is_empty());

        let mut calls = 0;
        for _ in 0..3 {
            let v = cache
                .get_or_try_insert_with("AAPL", || {
                    calls += 1;
                    Ok(42)
                })
                .unwrap();
            assert_eq!(v, 42);
        }
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_purge_and_disabled() {
        let mut cache = cache();
        cache.insert("A", 1);
        cache.clock().advance(Duration::minutes(30));
        cache.insert("B", 2);
        cache.clock().advance(Duration::minutes(31));

        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.get("B"), Some(2));

        let mut disabled: DataCache<u32> = DataCache::new(CacheConfig {
            enabled: false,
            ..Default::default()
        });
        disabled.insert("A", 1);
        assert_eq!(disabled.get("A"), None);
    }
}
