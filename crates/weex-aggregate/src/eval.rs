//! Aggregate evaluation over rollups
//!
//! Both storage strategies reduce a request to rollups, either one for the
//! whole span or one per archive day, and finish here. Keeping the final
//! step shared is what makes their answers agree.

use weex_core::{AggregateType, Comparison, DayRollup, DayStat, Rollup, ScalarStats};

/// What an aggregate kind needs to be evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Individual records (first, last, diff, ...); no rollup form
    Record,
    /// A single rollup over the whole span
    Span,
    /// One rollup per archive day
    Days,
}

pub fn shape(kind: AggregateType) -> Shape {
    use AggregateType::*;
    match kind {
        First | FirstTime | Last | LastTime | Diff | TDeriv => Shape::Record,
        MinMax | MeanMin | MeanMax | MaxMin | MaxSum | MaxSumTime => Shape::Days,
        _ if kind.threshold().is_some() => Shape::Days,
        _ => Shape::Span,
    }
}

/// Threshold comparison with the threshold already in the field's unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold {
    pub stat: DayStat,
    pub comparison: Comparison,
    pub value: f64,
}

impl Threshold {
    fn matches(&self, day: &ScalarStats) -> bool {
        day_stat(day, self.stat).map_or(false, |v| self.comparison.matches(v, self.value))
    }
}

fn day_stat(day: &ScalarStats, stat: DayStat) -> Option<f64> {
    match stat {
        DayStat::Min => day.min.map(|m| m.value),
        DayStat::Max => day.max.map(|m| m.value),
        DayStat::Sum => (day.count > 0).then_some(day.sum),
        DayStat::Avg => day.avg(),
    }
}

/// Evaluate a span-shaped kind
pub fn total(kind: AggregateType, rollup: &Rollup) -> Option<f64> {
    let scalar = &rollup.scalar;
    match kind {
        AggregateType::Avg => scalar.avg(),
        AggregateType::Sum => (scalar.count > 0).then_some(scalar.sum),
        AggregateType::Count => Some(scalar.count as f64),
        AggregateType::Min => scalar.min.map(|m| m.value),
        AggregateType::Max => scalar.max.map(|m| m.value),
        AggregateType::MinTime => scalar.min.map(|m| m.time as f64),
        AggregateType::MaxTime => scalar.max.map(|m| m.time as f64),
        AggregateType::NotNull => Some(if rollup.is_empty() { 0.0 } else { 1.0 }),
        AggregateType::VecAvg => rollup.vector.magnitude(),
        AggregateType::VecDir => rollup.vector.direction(),
        AggregateType::GustDir => scalar.max.and_then(|m| m.dir),
        _ => None,
    }
}

/// Evaluate a day-shaped kind. Days without data never qualify.
pub fn over_days(
    kind: AggregateType,
    days: &[DayRollup],
    threshold: Option<Threshold>,
) -> Option<f64> {
    let stats = days.iter().map(|d| &d.rollup.scalar);
    match kind {
        AggregateType::MinMax => mean(stats.filter_map(|s| Some(s.max?.value - s.min?.value))),
        AggregateType::MeanMin => mean(stats.filter_map(|s| s.min.map(|m| m.value))),
        AggregateType::MeanMax => mean(stats.filter_map(|s| s.max.map(|m| m.value))),
        AggregateType::MaxMin => stats
            .filter_map(|s| s.min.map(|m| m.value))
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v)))),
        AggregateType::MaxSum => max_sum_day(days).map(|(_, sum)| sum),
        AggregateType::MaxSumTime => max_sum_day(days).map(|(day, _)| day as f64),
        _ => {
            let threshold = threshold?;
            Some(stats.filter(|s| threshold.matches(s)).count() as f64)
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Day with the largest sum, earliest on ties
fn max_sum_day(days: &[DayRollup]) -> Option<(i64, f64)> {
    days.iter()
        .filter(|d| d.rollup.scalar.count > 0)
        .fold(None, |best: Option<(i64, f64)>, d| {
            let sum = d.rollup.scalar.sum;
            match best {
                Some((_, b)) if sum <= b => best,
                _ => Some((d.day_start, sum)),
            }
        })
}
