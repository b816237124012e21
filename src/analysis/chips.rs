//! Chip distribution
//!
//! Volume-by-price histogram: the observed close range is split into
//! equal-width buckets and each bar's volume is credited to the bucket its
//! close falls in. Buckets are `[lower, upper)` except the last, which is
//! closed, so every close lands in exactly one bucket.

use serde::{Deserialize, Serialize};

use super::round2;
use crate::core::PriceBar;

/// One price bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChipBucket {
    pub lower: f64,
    pub upper: f64,
    /// Bucket midpoint rounded to cents
    pub price_midpoint: f64,
    /// Volume of every bar closing inside the bucket
    pub total_volume: u64,
}

impl ChipBucket {
    /// Midpoint formatted for a category axis
    pub fn label(&self) -> String {
        format!("{:.2}", self.price_midpoint)
    }
}

/// Fixed-length histogram, ascending by price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChipDistribution {
    pub buckets: Vec<ChipBucket>,
}

impl ChipDistribution {
    /// Build the distribution over `bars`.
    ///
    /// Returns `None` for an empty window or a zero bucket count.
    pub fn from_bars(bars: &[PriceBar], bucket_count: usize) -> Option<Self> {
        if bucket_count == 0 {
            return None;
        }

        let (lo, hi) = close_range(bars)?;
        let edges = BucketEdges::new(lo, hi, bucket_count);

        let mut volumes = vec![0u64; bucket_count];
        for bar in bars {
            volumes[edges.index_of(bar.close)] += bar.volume;
        }

        let buckets = volumes
            .into_iter()
            .enumerate()
            .map(|(i, total_volume)| {
                let lower = edges.lower(i);
                let upper = edges.upper(i);
                ChipBucket {
                    lower,
                    upper,
                    price_midpoint: round2((lower + upper) / 2.0),
                    total_volume,
                }
            })
            .collect();

        Some(Self { buckets })
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn total_volume(&self) -> u64 {
        self.buckets.iter().map(|b| b.total_volume).sum()
    }

    /// Midpoint labels, parallel to `volumes()`
    pub fn labels(&self) -> Vec<String> {
        self.buckets.iter().map(ChipBucket::label).collect()
    }

    pub fn volumes(&self) -> Vec<u64> {
        self.buckets.iter().map(|b| b.total_volume).collect()
    }

    /// Bucket holding the most volume (first one on ties)
    pub fn peak(&self) -> Option<&ChipBucket> {
        self.buckets
            .iter()
            .reduce(|best, b| if b.total_volume > best.total_volume { b } else { best })
    }

    /// Bucket a price falls in, if inside the covered range
    pub fn bucket_for(&self, price: f64) -> Option<&ChipBucket> {
        let last = self.buckets.len().checked_sub(1)?;
        self.buckets.iter().enumerate().find(|(i, b)| {
            price >= b.lower && (price < b.upper || (*i == last && price <= b.upper))
        }).map(|(_, b)| b)
    }
}

/// Min and max close, widened when they coincide so buckets keep a width
fn close_range(bars: &[PriceBar]) -> Option<(f64, f64)> {
    let lo = bars.iter().map(|b| b.close).reduce(f64::min)?;
    let hi = bars.iter().map(|b| b.close).reduce(f64::max)?;

    if hi > lo {
        return Some((lo, hi));
    }

    let pad = if lo == 0.0 { 0.001 } else { lo.abs() * 0.001 };
    Some((lo - pad, hi + pad))
}

struct BucketEdges {
    lo: f64,
    hi: f64,
    width: f64,
    count: usize,
}

impl BucketEdges {
    fn new(lo: f64, hi: f64, count: usize) -> Self {
        Self {
            lo,
            hi,
            width: (hi - lo) / count as f64,
            count,
        }
    }

    fn lower(&self, i: usize) -> f64 {
        if i == 0 {
            self.lo
        } else {
            self.lo + i as f64 * self.width
        }
    }

    fn upper(&self, i: usize) -> f64 {
        if i + 1 == self.count {
            self.hi
        } else {
            self.lower(i + 1)
        }
    }

    /// Index of the bucket containing `price`, consistent with `lower`/`upper`
    fn index_of(&self, price: f64) -> usize {
        let last = self.count - 1;
        let raw = ((price - self.lo) / self.width).floor();
        let mut idx = if raw <= 0.0 {
            0
        } else {
            (raw as usize).min(last)
        };

        // Floor can land one bucket off right at an edge
        if idx < last && price >= self.lower(idx + 1) {
            idx += 1;
        } else if idx > 0 && price < self.lower(idx) {
            idx -= 1;
        }
        idx
    }
}
