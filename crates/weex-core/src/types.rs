//! Core data types for weather observations

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Timestamp type (Unix epoch seconds)
pub type Timestamp = i64;

/// Observation interval in minutes, as stored in the archive
pub type Interval = i32;

/// Archive record: the observations of the interval ending at `date_time`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObservationRecord {
    /// Unix timestamp (end of interval)
    #[serde(rename = "dateTime")]
    pub date_time: Timestamp,

    /// Unit system (1=US, 16=Metric, 17=MetricWX)
    #[serde(rename = "usUnits")]
    pub us_units: i32,

    /// Observation interval (minutes)
    pub interval: Interval,

    /// Observations (field name -> value)
    #[serde(flatten)]
    pub values: HashMap<String, ObservationValue>,
}

impl ObservationRecord {
    pub fn new(date_time: Timestamp, us_units: i32, interval: Interval) -> Self {
        Self {
            date_time,
            us_units,
            interval,
            values: HashMap::new(),
        }
    }

    /// Builder-style setter for a single observation
    pub fn with(mut self, field: impl Into<String>, value: impl Into<ObservationValue>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }

    /// Numeric value of `field`. The record's own columns (`dateTime`,
    /// `usUnits`, `interval`) are addressable like any observation.
    pub fn value(&self, field: &str) -> Option<f64> {
        match field {
            "dateTime" => Some(self.date_time as f64),
            "usUnits" => Some(self.us_units as f64),
            "interval" => Some(self.interval as f64),
            _ => self.values.get(field).and_then(ObservationValue::as_f64),
        }
    }

    /// Names of the observation columns carried by this record
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

/// An observation value with optional null handling
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ObservationValue {
    Float(f64),
    Integer(i64),
    String(String),
    Null,
}

impl ObservationValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ObservationValue::Float(v) => Some(*v),
            ObservationValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ObservationValue::Integer(v) => Some(*v),
            ObservationValue::Float(v) => Some(*v as i64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ObservationValue::Null)
    }
}

impl From<f64> for ObservationValue {
    fn from(v: f64) -> Self {
        ObservationValue::Float(v)
    }
}

impl From<Option<f64>> for ObservationValue {
    fn from(v: Option<f64>) -> Self {
        v.map_or(ObservationValue::Null, ObservationValue::Float)
    }
}

/// Aggregation type requested over a time span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateType {
    Avg,
    Sum,
    Count,
    Min,
    Max,
    #[serde(rename = "mintime")]
    MinTime,
    #[serde(rename = "maxtime")]
    MaxTime,
    First,
    #[serde(rename = "firsttime")]
    FirstTime,
    Last,
    #[serde(rename = "lasttime")]
    LastTime,
    Diff,
    #[serde(rename = "tderiv")]
    TDeriv,
    NotNull,
    #[serde(rename = "gustdir")]
    GustDir,
    #[serde(rename = "vecavg")]
    VecAvg,
    #[serde(rename = "vecdir")]
    VecDir,
    #[serde(rename = "minmax")]
    MinMax,
    #[serde(rename = "meanmin")]
    MeanMin,
    #[serde(rename = "meanmax")]
    MeanMax,
    #[serde(rename = "maxmin")]
    MaxMin,
    #[serde(rename = "maxsum")]
    MaxSum,
    #[serde(rename = "maxsumtime")]
    MaxSumTime,
    MinGe,
    MinLe,
    MaxGe,
    MaxLe,
    SumGe,
    SumLe,
    AvgGe,
    AvgLe,
}

/// Per-day statistic a threshold aggregate compares against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayStat {
    Min,
    Max,
    Sum,
    Avg,
}

/// Direction of a threshold comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    /// value >= threshold
    Ge,
    /// value <= threshold
    Le,
}

impl Comparison {
    pub fn matches(self, value: f64, threshold: f64) -> bool {
        match self {
            Comparison::Ge => value >= threshold,
            Comparison::Le => value <= threshold,
        }
    }
}

impl AggregateType {
    pub const ALL: [AggregateType; 31] = [
        AggregateType::Avg,
        AggregateType::Sum,
        AggregateType::Count,
        AggregateType::Min,
        AggregateType::Max,
        AggregateType::MinTime,
        AggregateType::MaxTime,
        AggregateType::First,
        AggregateType::FirstTime,
        AggregateType::Last,
        AggregateType::LastTime,
        AggregateType::Diff,
        AggregateType::TDeriv,
        AggregateType::NotNull,
        AggregateType::GustDir,
        AggregateType::VecAvg,
        AggregateType::VecDir,
        AggregateType::MinMax,
        AggregateType::MeanMin,
        AggregateType::MeanMax,
        AggregateType::MaxMin,
        AggregateType::MaxSum,
        AggregateType::MaxSumTime,
        AggregateType::MinGe,
        AggregateType::MinLe,
        AggregateType::MaxGe,
        AggregateType::MaxLe,
        AggregateType::SumGe,
        AggregateType::SumLe,
        AggregateType::AvgGe,
        AggregateType::AvgLe,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AggregateType::Avg => "avg",
            AggregateType::Sum => "sum",
            AggregateType::Count => "count",
            AggregateType::Min => "min",
            AggregateType::Max => "max",
            AggregateType::MinTime => "mintime",
            AggregateType::MaxTime => "maxtime",
            AggregateType::First => "first",
            AggregateType::FirstTime => "firsttime",
            AggregateType::Last => "last",
            AggregateType::LastTime => "lasttime",
            AggregateType::Diff => "diff",
            AggregateType::TDeriv => "tderiv",
            AggregateType::NotNull => "not_null",
            AggregateType::GustDir => "gustdir",
            AggregateType::VecAvg => "vecavg",
            AggregateType::VecDir => "vecdir",
            AggregateType::MinMax => "minmax",
            AggregateType::MeanMin => "meanmin",
            AggregateType::MeanMax => "meanmax",
            AggregateType::MaxMin => "maxmin",
            AggregateType::MaxSum => "maxsum",
            AggregateType::MaxSumTime => "maxsumtime",
            AggregateType::MinGe => "min_ge",
            AggregateType::MinLe => "min_le",
            AggregateType::MaxGe => "max_ge",
            AggregateType::MaxLe => "max_le",
            AggregateType::SumGe => "sum_ge",
            AggregateType::SumLe => "sum_le",
            AggregateType::AvgGe => "avg_ge",
            AggregateType::AvgLe => "avg_le",
        }
    }

    /// The per-day statistic and comparison of a threshold aggregate
    pub fn threshold(self) -> Option<(DayStat, Comparison)> {
        match self {
            AggregateType::MinGe => Some((DayStat::Min, Comparison::Ge)),
            AggregateType::MinLe => Some((DayStat::Min, Comparison::Le)),
            AggregateType::MaxGe => Some((DayStat::Max, Comparison::Ge)),
            AggregateType::MaxLe => Some((DayStat::Max, Comparison::Le)),
            AggregateType::SumGe => Some((DayStat::Sum, Comparison::Ge)),
            AggregateType::SumLe => Some((DayStat::Sum, Comparison::Le)),
            AggregateType::AvgGe => Some((DayStat::Avg, Comparison::Ge)),
            AggregateType::AvgLe => Some((DayStat::Avg, Comparison::Le)),
            _ => None,
        }
    }

    /// Aggregates that only make sense for a vector field
    pub fn is_vector_only(self) -> bool {
        matches!(
            self,
            AggregateType::VecAvg | AggregateType::VecDir | AggregateType::GustDir
        )
    }
}

impl fmt::Display for AggregateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an aggregate name that does not map to any [`AggregateType`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown aggregate type: {0}")]
pub struct UnknownAggregate(pub String);

impl FromStr for AggregateType {
    type Err = UnknownAggregate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AggregateType::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownAggregate(s.to_string()))
    }
}

/// Unit system constants (must match Python WeeWX)
pub mod unit_systems {
    pub const US: i32 = 1;
    pub const METRIC: i32 = 16;
    pub const METRICWX: i32 = 17;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observation_value_conversions() {
        let float_val = ObservationValue::Float(25.5);
        assert_eq!(float_val.as_f64(), Some(25.5));

        let int_val = ObservationValue::Integer(42);
        assert_eq!(int_val.as_i64(), Some(42));
        assert_eq!(int_val.as_f64(), Some(42.0));

        let null_val = ObservationValue::Null;
        assert!(null_val.is_null());
        assert_eq!(null_val.as_f64(), None);
    }

    #[test]
    fn test_record_serde() {
        let json = r#"{"dateTime":1267430400,"usUnits":1,"interval":10,"outTemp":25.5,"rain":null}"#;
        let record: ObservationRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.date_time, 1267430400);
        assert_eq!(record.interval, 10);
        assert_eq!(record.value("outTemp"), Some(25.5));
        assert_eq!(record.value("rain"), None);
        assert_eq!(record.value("dateTime"), Some(1267430400.0));
    }

    #[test]
    fn test_aggregate_names_roundtrip() {
        for kind in AggregateType::ALL {
            assert_eq!(kind.as_str().parse::<AggregateType>(), Ok(kind));
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
        assert_eq!(
            "median".parse::<AggregateType>(),
            Err(UnknownAggregate("median".to_string()))
        );
    }

    #[test]
    fn test_threshold_kinds() {
        assert_eq!(
            AggregateType::MinGe.threshold(),
            Some((DayStat::Min, Comparison::Ge))
        );
        assert_eq!(AggregateType::Avg.threshold(), None);
        assert!(Comparison::Le.matches(0.0, 0.0));
        assert!(!Comparison::Ge.matches(-0.1, 0.0));
    }
}
