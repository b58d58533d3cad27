//! Unit-tagged values returned by aggregate computations

use crate::units::{convert, Unit, UnitError, UnitGroup};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A value bound to its unit and unit group. A `None` value is a valid
/// result (an aggregate over no data).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub value: Option<f64>,
    pub unit: Unit,
    pub group: UnitGroup,
}

impl Measurement {
    pub fn new(value: Option<f64>, unit: Unit, group: UnitGroup) -> Self {
        Self { value, unit, group }
    }

    /// A measurement whose group is the natural group of `unit`
    pub fn of(value: f64, unit: Unit) -> Self {
        Self::new(Some(value), unit, unit.group())
    }

    pub fn null(unit: Unit, group: UnitGroup) -> Self {
        Self::new(None, unit, group)
    }

    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }

    /// Express the measurement in another unit of the same group
    pub fn convert_to(&self, unit: Unit) -> Result<Measurement, UnitError> {
        let value = self.value.map(|v| convert(v, self.unit, unit)).transpose()?;
        Ok(Measurement::new(value, unit, self.group))
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(v) => write!(f, "{} {} ({})", v, self.unit, self.group),
            None => write!(f, "None {} ({})", self.unit, self.group),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_keeps_null() {
        let m = Measurement::null(Unit::DegreeF, UnitGroup::Temperature);
        let c = m.convert_to(Unit::DegreeC).unwrap();
        assert!(c.is_null());
        assert_eq!(c.unit, Unit::DegreeC);
    }

    #[test]
    fn test_convert_base_temperature() {
        let base = Measurement::of(65.0, Unit::DegreeF);
        let c = base.convert_to(Unit::DegreeC).unwrap();
        assert!((c.value.unwrap() - 18.333).abs() < 0.001);
        assert_eq!(c.group, UnitGroup::Temperature);
    }

    #[test]
    fn test_display() {
        let m = Measurement::of(7.5, Unit::Inch);
        assert_eq!(m.to_string(), "7.5 inch (group_rain)");
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#"{"value":7.5,"unit":"inch","group":"group_rain"}"#);
    }
}
