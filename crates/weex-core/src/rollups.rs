//! Rollup accumulators shared by raw scans and daily summaries
//!
//! A raw scan folds records into a [`Rollup`]; a daily summary row is the
//! same [`Rollup`] persisted per day. Both paths combine with
//! [`Rollup::merge`], which is what keeps their results identical.

use crate::types::Timestamp;
use crate::vector::VectorAccumulator;
use serde::{Deserialize, Serialize};

/// An extreme value and when it occurred
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extreme {
    pub value: f64,
    pub time: Timestamp,
    /// Direction attached to the value (vector fields only)
    pub dir: Option<f64>,
}

/// Running extremes, sum and count of a scalar series
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScalarStats {
    pub min: Option<Extreme>,
    pub max: Option<Extreme>,
    pub sum: f64,
    pub count: u64,
}

impl ScalarStats {
    /// Add a sample to both the extremes and the sum
    pub fn add(&mut self, time: Timestamp, value: f64) {
        self.add_extreme(time, value, None);
        self.add_sum(value);
    }

    pub fn add_sum(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    /// Samples must arrive in ascending time order: only a strictly lower
    /// (higher) value replaces the current minimum (maximum), so ties keep
    /// the earliest time.
    pub fn add_extreme(&mut self, time: Timestamp, value: f64, dir: Option<f64>) {
        let candidate = Extreme { value, time, dir };
        if self.min.map_or(true, |m| value < m.value) {
            self.min = Some(candidate);
        }
        if self.max.map_or(true, |m| value > m.value) {
            self.max = Some(candidate);
        }
    }

    /// Fold in the stats of a later period
    pub fn merge(&mut self, later: &ScalarStats) {
        if let Some(min) = later.min {
            if self.min.map_or(true, |m| min.value < m.value) {
                self.min = Some(min);
            }
        }
        if let Some(max) = later.max {
            if self.max.map_or(true, |m| max.value > m.value) {
                self.max = Some(max);
            }
        }
        self.sum += later.sum;
        self.count += later.count;
    }

    pub fn avg(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        Some(self.sum / self.count as f64)
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0 && self.min.is_none()
    }
}

/// Everything an aggregate needs to know about a period
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rollup {
    pub scalar: ScalarStats,
    pub vector: VectorAccumulator,
}

impl Rollup {
    pub fn merge(&mut self, later: &Rollup) {
        self.scalar.merge(&later.scalar);
        self.vector.merge(&later.vector);
    }

    pub fn is_empty(&self) -> bool {
        self.scalar.is_empty()
    }
}

/// The rollup of one archive day, keyed by the day's opening midnight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayRollup {
    pub day_start: Timestamp,
    pub rollup: Rollup,
}

/// Merge a time-ordered sequence of rollups into one
pub fn merge_rollups<'a>(rollups: impl IntoIterator<Item = &'a Rollup>) -> Rollup {
    rollups.into_iter().fold(Rollup::default(), |mut acc, r| {
        acc.merge(r);
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_min_max() {
        let mut stats = ScalarStats::default();
        stats.add(1, 10.0);
        stats.add(2, 5.0);
        stats.add(3, 15.0);
        assert_eq!(stats.min.unwrap().value, 5.0);
        assert_eq!(stats.min.unwrap().time, 2);
        assert_eq!(stats.max.unwrap().value, 15.0);
        assert_eq!(stats.max.unwrap().time, 3);
    }

    #[test]
    fn test_scalar_avg_sum() {
        let mut stats = ScalarStats::default();
        stats.add(1, 10.0);
        stats.add(2, 20.0);
        stats.add(3, 30.0);
        assert_eq!(stats.avg(), Some(20.0));
        assert_eq!(stats.sum, 60.0);
        assert_eq!(stats.count, 3);
    }

    #[test]
    fn test_ties_keep_earliest() {
        let mut stats = ScalarStats::default();
        stats.add(10, 7.0);
        stats.add(20, 7.0);
        assert_eq!(stats.min.unwrap().time, 10);
        assert_eq!(stats.max.unwrap().time, 10);

        let mut later = ScalarStats::default();
        later.add(30, 7.0);
        stats.merge(&later);
        assert_eq!(stats.min.unwrap().time, 10);
        assert_eq!(stats.max.unwrap().time, 10);
    }

    #[test]
    fn test_empty() {
        let stats = ScalarStats::default();
        assert_eq!(stats.avg(), None);
        assert!(stats.is_empty());
    }

    #[test]
    fn test_merge_equals_single_pass() {
        let values = [3.0, -1.0, 8.5, 8.5, 0.0, -1.0, 2.25];
        let mut whole = Rollup::default();
        let mut parts = vec![Rollup::default(), Rollup::default(), Rollup::default()];
        for (i, v) in values.iter().enumerate() {
            let ts = i as Timestamp * 300;
            whole.scalar.add(ts, *v);
            whole.vector.add(*v, Some(i as f64 * 40.0));
            let part = &mut parts[i * 3 / values.len()];
            part.scalar.add(ts, *v);
            part.vector.add(*v, Some(i as f64 * 40.0));
        }
        let merged = merge_rollups(&parts);
        assert_eq!(merged.scalar.min, whole.scalar.min);
        assert_eq!(merged.scalar.max, whole.scalar.max);
        assert_eq!(merged.scalar.count, whole.scalar.count);
        assert!((merged.scalar.sum - whole.scalar.sum).abs() < 1e-12);
        assert!((merged.vector.sum_x - whole.vector.sum_x).abs() < 1e-9);
    }
}
