//! Observation fields an aggregate can be requested for

use crate::rollups::Rollup;
use crate::types::ObservationRecord;
use crate::units::{get_unit_group, UnitGroup};
use std::fmt;

/// A magnitude + direction quantity assembled from several archive columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorField {
    pub name: &'static str,
    pub magnitude: &'static str,
    pub direction: &'static str,
    pub gust: &'static str,
    pub gust_direction: &'static str,
}

/// The wind vector: speed/direction, with gusts feeding its extremes
pub const WIND: VectorField = VectorField {
    name: "wind",
    magnitude: "windSpeed",
    direction: "windDir",
    gust: "windGust",
    gust_direction: "windGustDir",
};

/// Degree-day conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DegreeDayKind {
    Heating,
    Cooling,
    Growing,
}

impl DegreeDayKind {
    pub fn name(self) -> &'static str {
        match self {
            DegreeDayKind::Heating => "heatdeg",
            DegreeDayKind::Cooling => "cooldeg",
            DegreeDayKind::Growing => "growdeg",
        }
    }

    /// Degrees contributed by a day with mean temperature `mean`
    pub fn degrees(self, mean: f64, base: f64) -> f64 {
        match self {
            DegreeDayKind::Heating => (base - mean).max(0.0),
            DegreeDayKind::Cooling | DegreeDayKind::Growing => (mean - base).max(0.0),
        }
    }
}

/// A field name resolved to how its values are obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObsField {
    Scalar(String),
    Vector(VectorField),
    DegreeDay(DegreeDayKind),
}

impl ObsField {
    pub fn parse(name: &str) -> Self {
        match name {
            "wind" => ObsField::Vector(WIND),
            "heatdeg" => ObsField::DegreeDay(DegreeDayKind::Heating),
            "cooldeg" => ObsField::DegreeDay(DegreeDayKind::Cooling),
            "growdeg" => ObsField::DegreeDay(DegreeDayKind::Growing),
            other => ObsField::Scalar(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ObsField::Scalar(name) => name.as_str(),
            ObsField::Vector(v) => v.name,
            ObsField::DegreeDay(kind) => kind.name(),
        }
    }

    pub fn unit_group(&self) -> Option<UnitGroup> {
        match self {
            ObsField::Scalar(name) => get_unit_group(name),
            ObsField::Vector(_) => Some(UnitGroup::Speed),
            ObsField::DegreeDay(_) => Some(UnitGroup::DegreeDay),
        }
    }

    /// Archive columns this field must find in the store
    pub fn required_columns(&self) -> Vec<&str> {
        match self {
            ObsField::Scalar(name) => vec![name.as_str()],
            ObsField::Vector(v) => vec![v.magnitude, v.direction],
            ObsField::DegreeDay(_) => vec!["outTemp"],
        }
    }

    /// Value used by record-level aggregates (first, last, diff, ...)
    pub fn value(&self, record: &ObservationRecord) -> Option<f64> {
        match self {
            ObsField::Scalar(name) => record.value(name),
            ObsField::Vector(v) => record.value(v.magnitude),
            ObsField::DegreeDay(_) => None,
        }
    }

    /// Fold one record into a rollup. Records must arrive in ascending
    /// time order.
    pub fn accumulate(&self, record: &ObservationRecord, rollup: &mut Rollup) {
        let ts = record.date_time;
        match self {
            ObsField::Scalar(name) => {
                if let Some(v) = record.value(name) {
                    rollup.scalar.add(ts, v);
                }
            }
            ObsField::Vector(v) => {
                let dir = record.value(v.direction);
                if let Some(speed) = record.value(v.magnitude) {
                    rollup.scalar.add_sum(speed);
                    rollup.scalar.add_extreme(ts, speed, dir);
                    rollup.vector.add(speed, dir);
                }
                if let Some(gust) = record.value(v.gust) {
                    rollup
                        .scalar
                        .add_extreme(ts, gust, record.value(v.gust_direction));
                }
            }
            ObsField::DegreeDay(_) => {}
        }
    }
}

impl fmt::Display for ObsField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ObservationValue;

    #[test]
    fn test_parse() {
        assert_eq!(ObsField::parse("wind"), ObsField::Vector(WIND));
        assert_eq!(
            ObsField::parse("heatdeg"),
            ObsField::DegreeDay(DegreeDayKind::Heating)
        );
        assert_eq!(
            ObsField::parse("outTemp"),
            ObsField::Scalar("outTemp".to_string())
        );
        assert_eq!(ObsField::parse("wind").unit_group(), Some(UnitGroup::Speed));
    }

    #[test]
    fn test_wind_extremes_include_gusts() {
        let mut rollup = Rollup::default();
        let field = ObsField::parse("wind");
        let r1 = ObservationRecord::new(600, 1, 10)
            .with("windSpeed", 10.0)
            .with("windDir", 90.0)
            .with("windGust", 12.0)
            .with("windGustDir", 100.0);
        let r2 = ObservationRecord::new(1200, 1, 10)
            .with("windSpeed", 4.0)
            .with("windDir", ObservationValue::Null)
            .with("windGust", 4.8)
            .with("windGustDir", ObservationValue::Null);
        field.accumulate(&r1, &mut rollup);
        field.accumulate(&r2, &mut rollup);

        let max = rollup.scalar.max.unwrap();
        assert_eq!(max.value, 12.0);
        assert_eq!(max.dir, Some(100.0));
        assert_eq!(rollup.scalar.min.unwrap().value, 4.0);
        assert_eq!(rollup.scalar.avg(), Some(7.0));
        assert_eq!(rollup.vector.count, 2);
    }

    #[test]
    fn test_degree_days() {
        assert_eq!(DegreeDayKind::Heating.degrees(60.0, 65.0), 5.0);
        assert_eq!(DegreeDayKind::Heating.degrees(70.0, 65.0), 0.0);
        assert_eq!(DegreeDayKind::Cooling.degrees(70.0, 65.0), 5.0);
        assert_eq!(DegreeDayKind::Growing.degrees(45.0, 50.0), 0.0);
    }
}
