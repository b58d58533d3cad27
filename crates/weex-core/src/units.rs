//! Unit systems, unit groups and conversion utilities
//!
//! Maintains parity with the Python WeeWX unit tables: every observation
//! belongs to a unit group, and each unit system fixes the unit a group is
//! stored in.

use crate::types::unit_systems;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit conversion error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UnitError {
    #[error("Unknown unit system: {0}")]
    UnknownUnitSystem(i32),

    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    #[error("Cannot convert {from} to {to}: different unit groups")]
    GroupMismatch { from: Unit, to: Unit },

    #[error("Conversion not supported")]
    ConversionNotSupported,
}

/// Unit system of a database (the `usUnits` column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum UnitSystem {
    Us,
    Metric,
    MetricWx,
}

impl UnitSystem {
    pub fn code(self) -> i32 {
        match self {
            UnitSystem::Us => unit_systems::US,
            UnitSystem::Metric => unit_systems::METRIC,
            UnitSystem::MetricWx => unit_systems::METRICWX,
        }
    }

    /// The unit a group is stored in under this unit system
    pub fn unit_for(self, group: UnitGroup) -> Unit {
        use UnitSystem::*;
        match (group, self) {
            (UnitGroup::Temperature, Us) => Unit::DegreeF,
            (UnitGroup::Temperature, Metric | MetricWx) => Unit::DegreeC,
            (UnitGroup::Pressure, Us) => Unit::InHg,
            (UnitGroup::Pressure, Metric | MetricWx) => Unit::Mbar,
            (UnitGroup::Rain, Us) => Unit::Inch,
            (UnitGroup::Rain, Metric) => Unit::Cm,
            (UnitGroup::Rain, MetricWx) => Unit::Mm,
            (UnitGroup::RainRate, Us) => Unit::InchPerHour,
            (UnitGroup::RainRate, Metric) => Unit::CmPerHour,
            (UnitGroup::RainRate, MetricWx) => Unit::MmPerHour,
            (UnitGroup::Speed, Us) => Unit::MilePerHour,
            (UnitGroup::Speed, Metric) => Unit::KmPerHour,
            (UnitGroup::Speed, MetricWx) => Unit::MeterPerSecond,
            (UnitGroup::Direction, _) => Unit::DegreeCompass,
            (UnitGroup::Humidity, _) => Unit::Percent,
            (UnitGroup::Radiation, _) => Unit::WattPerMeterSquared,
            (UnitGroup::Uv, _) => Unit::UvIndex,
            (UnitGroup::Count, _) => Unit::Count,
            (UnitGroup::Time, _) => Unit::UnixEpoch,
            (UnitGroup::Interval, _) => Unit::Minute,
            (UnitGroup::DegreeDay, Us) => Unit::DegreeFDay,
            (UnitGroup::DegreeDay, Metric | MetricWx) => Unit::DegreeCDay,
        }
    }
}

impl TryFrom<i32> for UnitSystem {
    type Error = UnitError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            unit_systems::US => Ok(UnitSystem::Us),
            unit_systems::METRIC => Ok(UnitSystem::Metric),
            unit_systems::METRICWX => Ok(UnitSystem::MetricWx),
            other => Err(UnitError::UnknownUnitSystem(other)),
        }
    }
}

impl From<UnitSystem> for i32 {
    fn from(system: UnitSystem) -> Self {
        system.code()
    }
}

/// Unit group for observation types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum UnitGroup {
    Temperature,
    Pressure,
    Rain,
    RainRate,
    Speed,
    Direction,
    Humidity,
    Radiation,
    Uv,
    Count,
    Time,
    Interval,
    DegreeDay,
}

impl UnitGroup {
    const ALL: [UnitGroup; 13] = [
        UnitGroup::Temperature,
        UnitGroup::Pressure,
        UnitGroup::Rain,
        UnitGroup::RainRate,
        UnitGroup::Speed,
        UnitGroup::Direction,
        UnitGroup::Humidity,
        UnitGroup::Radiation,
        UnitGroup::Uv,
        UnitGroup::Count,
        UnitGroup::Time,
        UnitGroup::Interval,
        UnitGroup::DegreeDay,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            UnitGroup::Temperature => "group_temperature",
            UnitGroup::Pressure => "group_pressure",
            UnitGroup::Rain => "group_rain",
            UnitGroup::RainRate => "group_rainrate",
            UnitGroup::Speed => "group_speed",
            UnitGroup::Direction => "group_direction",
            UnitGroup::Humidity => "group_percent",
            UnitGroup::Radiation => "group_radiation",
            UnitGroup::Uv => "group_uv",
            UnitGroup::Count => "group_count",
            UnitGroup::Time => "group_time",
            UnitGroup::Interval => "group_interval",
            UnitGroup::DegreeDay => "group_degree_day",
        }
    }
}

impl fmt::Display for UnitGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<UnitGroup> for &'static str {
    fn from(group: UnitGroup) -> Self {
        group.as_str()
    }
}

impl TryFrom<String> for UnitGroup {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        UnitGroup::ALL
            .iter()
            .copied()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| format!("unknown unit group: {s}"))
    }
}

/// Concrete unit a value is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Unit {
    DegreeF,
    DegreeC,
    InHg,
    Mbar,
    Inch,
    Cm,
    Mm,
    InchPerHour,
    CmPerHour,
    MmPerHour,
    MilePerHour,
    KmPerHour,
    MeterPerSecond,
    DegreeCompass,
    Percent,
    WattPerMeterSquared,
    UvIndex,
    Count,
    UnixEpoch,
    Minute,
    DegreeFDay,
    DegreeCDay,
}

impl Unit {
    const ALL: [Unit; 22] = [
        Unit::DegreeF,
        Unit::DegreeC,
        Unit::InHg,
        Unit::Mbar,
        Unit::Inch,
        Unit::Cm,
        Unit::Mm,
        Unit::InchPerHour,
        Unit::CmPerHour,
        Unit::MmPerHour,
        Unit::MilePerHour,
        Unit::KmPerHour,
        Unit::MeterPerSecond,
        Unit::DegreeCompass,
        Unit::Percent,
        Unit::WattPerMeterSquared,
        Unit::UvIndex,
        Unit::Count,
        Unit::UnixEpoch,
        Unit::Minute,
        Unit::DegreeFDay,
        Unit::DegreeCDay,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Unit::DegreeF => "degree_F",
            Unit::DegreeC => "degree_C",
            Unit::InHg => "inHg",
            Unit::Mbar => "mbar",
            Unit::Inch => "inch",
            Unit::Cm => "cm",
            Unit::Mm => "mm",
            Unit::InchPerHour => "inch_per_hour",
            Unit::CmPerHour => "cm_per_hour",
            Unit::MmPerHour => "mm_per_hour",
            Unit::MilePerHour => "mile_per_hour",
            Unit::KmPerHour => "km_per_hour",
            Unit::MeterPerSecond => "meter_per_second",
            Unit::DegreeCompass => "degree_compass",
            Unit::Percent => "percent",
            Unit::WattPerMeterSquared => "watt_per_meter_squared",
            Unit::UvIndex => "uv_index",
            Unit::Count => "count",
            Unit::UnixEpoch => "unix_epoch",
            Unit::Minute => "minute",
            Unit::DegreeFDay => "degree_F_day",
            Unit::DegreeCDay => "degree_C_day",
        }
    }

    pub fn group(self) -> UnitGroup {
        match self {
            Unit::DegreeF | Unit::DegreeC => UnitGroup::Temperature,
            Unit::InHg | Unit::Mbar => UnitGroup::Pressure,
            Unit::Inch | Unit::Cm | Unit::Mm => UnitGroup::Rain,
            Unit::InchPerHour | Unit::CmPerHour | Unit::MmPerHour => UnitGroup::RainRate,
            Unit::MilePerHour | Unit::KmPerHour | Unit::MeterPerSecond => UnitGroup::Speed,
            Unit::DegreeCompass => UnitGroup::Direction,
            Unit::Percent => UnitGroup::Humidity,
            Unit::WattPerMeterSquared => UnitGroup::Radiation,
            Unit::UvIndex => UnitGroup::Uv,
            Unit::Count => UnitGroup::Count,
            Unit::UnixEpoch => UnitGroup::Time,
            Unit::Minute => UnitGroup::Interval,
            Unit::DegreeFDay | Unit::DegreeCDay => UnitGroup::DegreeDay,
        }
    }

    /// Scale of a linear unit relative to the base unit of its group
    /// (mbar, mm, mm/h, km/h, degree_C_day)
    fn scale(self) -> Option<f64> {
        match self {
            Unit::Mbar => Some(1.0),
            Unit::InHg => Some(33.8639),
            Unit::Mm | Unit::MmPerHour => Some(1.0),
            Unit::Cm | Unit::CmPerHour => Some(10.0),
            Unit::Inch | Unit::InchPerHour => Some(25.4),
            Unit::KmPerHour => Some(1.0),
            Unit::MilePerHour => Some(1.60934),
            Unit::MeterPerSecond => Some(3.6),
            Unit::DegreeCDay => Some(1.0),
            Unit::DegreeFDay => Some(5.0 / 9.0),
            _ => None,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Unit::ALL
            .iter()
            .copied()
            .find(|u| u.as_str() == s)
            .ok_or_else(|| UnitError::UnknownUnit(s.to_string()))
    }
}

impl From<Unit> for &'static str {
    fn from(unit: Unit) -> Self {
        unit.as_str()
    }
}

impl TryFrom<String> for Unit {
    type Error = UnitError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Get unit group for an observation type
pub fn get_unit_group(obs_type: &str) -> Option<UnitGroup> {
    match obs_type {
        "outTemp" | "inTemp" | "extraTemp1" | "extraTemp2" | "extraTemp3" | "dewpoint"
        | "heatindex" | "windchill" | "appTemp" => Some(UnitGroup::Temperature),
        "barometer" | "pressure" | "altimeter" => Some(UnitGroup::Pressure),
        "rain" => Some(UnitGroup::Rain),
        "rainRate" => Some(UnitGroup::RainRate),
        "windSpeed" | "windGust" | "wind" => Some(UnitGroup::Speed),
        "windDir" | "windGustDir" => Some(UnitGroup::Direction),
        "outHumidity" | "inHumidity" | "rxCheckPercent" => Some(UnitGroup::Humidity),
        "radiation" => Some(UnitGroup::Radiation),
        "UV" => Some(UnitGroup::Uv),
        "dateTime" => Some(UnitGroup::Time),
        "interval" => Some(UnitGroup::Interval),
        "heatdeg" | "cooldeg" | "growdeg" => Some(UnitGroup::DegreeDay),
        _ => None,
    }
}

/// Convert a value between two units of the same group
pub fn convert(value: f64, from: Unit, to: Unit) -> Result<f64, UnitError> {
    if from == to {
        return Ok(value);
    }
    if from.group() != to.group() {
        return Err(UnitError::GroupMismatch { from, to });
    }

    match (from, to) {
        // F to C
        (Unit::DegreeF, Unit::DegreeC) => Ok((value - 32.0) * 5.0 / 9.0),
        // C to F
        (Unit::DegreeC, Unit::DegreeF) => Ok(value * 9.0 / 5.0 + 32.0),
        _ => match (from.scale(), to.scale()) {
            (Some(f), Some(t)) => Ok(value * f / t),
            _ => Err(UnitError::ConversionNotSupported),
        },
    }
}
