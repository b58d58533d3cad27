//! Database schema types matching the Python WeeWX schema
//!
//! IMPORTANT: These structures must maintain strict parity with the
//! existing schema created by Python WeeWX. Do not modify
//! column names or types without verifying against production schema.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use weex_core::{DayRollup, Extreme, Rollup, ScalarStats, VectorAccumulator};

/// One row of an `archive_day_<obs>` table: the rollup of a single day
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct DailySummaryRow {
    /// Local midnight opening the day
    #[sqlx(rename = "dateTime")]
    pub date_time: i64,

    /// Observation type; not a column, filled in by the query
    #[sqlx(default)]
    pub obs_type: String,

    pub min: Option<f64>,
    pub mintime: Option<i64>,
    pub max: Option<f64>,
    pub maxtime: Option<i64>,
    pub sum: Option<f64>,
    pub count: Option<i64>,

    // Vector tables only. WeeWX keeps the east component in `xsum` and
    // the north component in `ysum`.
    #[sqlx(default)]
    pub xsum: Option<f64>,
    #[sqlx(default)]
    pub ysum: Option<f64>,
    #[sqlx(default)]
    pub max_dir: Option<f64>,
}

impl DailySummaryRow {
    /// Persisted form of a day's rollup
    pub fn from_rollup(obs_type: &str, day: &DayRollup, vector: bool) -> Self {
        let scalar = &day.rollup.scalar;
        let (xsum, ysum) = if vector {
            (Some(day.rollup.vector.sum_y), Some(day.rollup.vector.sum_x))
        } else {
            (None, None)
        };
        Self {
            date_time: day.day_start,
            obs_type: obs_type.to_string(),
            min: scalar.min.map(|m| m.value),
            mintime: scalar.min.map(|m| m.time),
            max: scalar.max.map(|m| m.value),
            maxtime: scalar.max.map(|m| m.time),
            sum: Some(scalar.sum),
            count: Some(scalar.count as i64),
            xsum,
            ysum,
            max_dir: if vector {
                scalar.max.and_then(|m| m.dir)
            } else {
                None
            },
        }
    }

    /// Rollup view of the row. A value without its time (or the reverse)
    /// is treated as missing.
    pub fn to_rollup(&self) -> DayRollup {
        let count = self.count.unwrap_or(0).max(0) as u64;
        let min = self.min.zip(self.mintime).map(|(value, time)| Extreme {
            value,
            time,
            dir: None,
        });
        let max = self.max.zip(self.maxtime).map(|(value, time)| Extreme {
            value,
            time,
            dir: self.max_dir,
        });
        let vector = match (self.xsum, self.ysum) {
            (Some(east), Some(north)) => VectorAccumulator::from_parts(north, east, count),
            _ => VectorAccumulator::default(),
        };
        DayRollup {
            day_start: self.date_time,
            rollup: Rollup {
                scalar: ScalarStats {
                    min,
                    max,
                    sum: self.sum.unwrap_or(0.0),
                    count,
                },
                vector,
            },
        }
    }
}

/// Table names matching Python WeeWX schema
pub mod tables {
    pub const ARCHIVE: &str = "archive";
    pub const DAILY_SUMMARY_PREFIX: &str = "archive_day_";

    /// Name of the daily summary table of an observation type
    pub fn daily_summary(obs_type: &str) -> String {
        format!("{DAILY_SUMMARY_PREFIX}{obs_type}")
    }
}

/// Archive columns that are record metadata rather than observations
pub const RECORD_COLUMNS: [&str; 3] = ["dateTime", "usUnits", "interval"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_names() {
        assert_eq!(tables::ARCHIVE, "archive");
        assert_eq!(tables::daily_summary("outTemp"), "archive_day_outTemp");
    }

    #[test]
    fn test_row_rollup_roundtrip() {
        let mut rollup = Rollup::default();
        rollup.scalar.add_extreme(100, 3.0, Some(45.0));
        rollup.scalar.add_extreme(200, 9.0, Some(270.0));
        rollup.scalar.add_sum(3.0);
        rollup.scalar.add_sum(9.0);
        rollup.vector.add(3.0, Some(45.0));
        rollup.vector.add(9.0, Some(270.0));
        let day = DayRollup {
            day_start: 0,
            rollup,
        };

        let row = DailySummaryRow::from_rollup("wind", &day, true);
        assert_eq!(row.max_dir, Some(270.0));
        assert_eq!(row.count, Some(2));
        let back = row.to_rollup();
        assert_eq!(back.rollup.scalar.max, rollup.scalar.max);
        assert_eq!(back.rollup.scalar.min.unwrap().value, 3.0);
        assert_eq!(back.rollup.vector, rollup.vector);
    }

    #[test]
    fn test_vector_columns_are_east_and_north() {
        let mut rollup = Rollup::default();
        rollup.scalar.add_extreme(100, 10.0, Some(90.0));
        rollup.scalar.add_sum(10.0);
        rollup.vector.add(10.0, Some(90.0));
        let row = DailySummaryRow::from_rollup(
            "wind",
            &DayRollup {
                day_start: 0,
                rollup,
            },
            true,
        );
        assert!((row.xsum.unwrap() - 10.0).abs() < 1e-9);
        assert!(row.ysum.unwrap().abs() < 1e-9);
    }

    #[test]
    fn test_stored_wind_row_direction() {
        // A day of steady 10 mph wind from due east, as WeeWX stores it
        let east = DailySummaryRow {
            date_time: 0,
            obs_type: "wind".to_string(),
            min: Some(10.0),
            mintime: Some(300),
            max: Some(10.0),
            maxtime: Some(300),
            sum: Some(10.0),
            count: Some(1),
            xsum: Some(10.0),
            ysum: Some(0.0),
            max_dir: Some(90.0),
        };
        let vector = east.to_rollup().rollup.vector;
        assert!((vector.direction().unwrap() - 90.0).abs() < 1e-9);
        assert!((vector.magnitude().unwrap() - 10.0).abs() < 1e-9);

        let north = DailySummaryRow {
            xsum: Some(0.0),
            ysum: Some(10.0),
            ..east
        };
        assert_eq!(north.to_rollup().rollup.vector.direction(), Some(0.0));
    }

    #[test]
    fn test_empty_row() {
        let row = DailySummaryRow::from_rollup(
            "outTemp",
            &DayRollup {
                day_start: 86_400,
                rollup: Rollup::default(),
            },
            false,
        );
        assert_eq!(row.min, None);
        assert_eq!(row.xsum, None);
        assert!(row.to_rollup().rollup.is_empty());
    }
}
