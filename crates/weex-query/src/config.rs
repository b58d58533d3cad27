//! Query configuration: the TOML file plus command-line overrides

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use std::str::FromStr;
use weex_aggregate::DegreeDayBases;
use weex_core::{DayCalendar, Measurement, Timestamp, Unit, UnitGroup};
use weewx_config::{AppConfig, BaseSetting};

#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// MySQL database connection URL
    pub database_url: String,

    /// Station day boundaries
    pub calendar: DayCalendar,

    /// Default degree-day bases
    pub bases: DegreeDayBases,
}

impl QueryConfig {
    /// Combine the application config with a URL given on the command
    /// line (or in `DATABASE_URL`), which takes precedence
    pub fn resolve(app: &AppConfig, database_url: Option<String>) -> Result<Self> {
        let database_url = database_url
            .or_else(|| app.database_url().map(String::from))
            .context("No database URL: set DATABASE_URL or [database] url")?;

        let offset = app.utc_offset_seconds()?;
        let calendar = DayCalendar::from_offset_seconds(offset)
            .ok_or_else(|| anyhow!("UTC offset out of range: {offset}s"))?;

        let dd = app.degree_days();
        let defaults = DegreeDayBases::default();
        let bases = DegreeDayBases {
            heating: base_or(dd.heating_base.as_ref(), defaults.heating)?,
            cooling: base_or(dd.cooling_base.as_ref(), defaults.cooling)?,
            growing: base_or(dd.growing_base.as_ref(), defaults.growing)?,
        };

        Ok(Self {
            database_url,
            calendar,
            bases,
        })
    }
}

fn base_or(setting: Option<&BaseSetting>, default: Measurement) -> Result<Measurement> {
    match setting {
        None => Ok(default),
        Some(s) => temperature(s.value, &s.unit),
    }
}

/// A temperature given as a value and a unit name
pub fn temperature(value: f64, unit: &str) -> Result<Measurement> {
    let unit = Unit::from_str(unit)?;
    if unit.group() != UnitGroup::Temperature {
        return Err(anyhow!("{unit} is not a temperature unit"));
    }
    Ok(Measurement::of(value, unit))
}

/// A span bound: epoch seconds, or a date meaning the station midnight
/// opening it
pub fn parse_bound(arg: &str, calendar: &DayCalendar) -> Result<Timestamp> {
    if let Ok(ts) = arg.parse::<Timestamp>() {
        return Ok(ts);
    }
    let date = NaiveDate::parse_from_str(arg, "%Y-%m-%d")
        .with_context(|| format!("Invalid time '{arg}': expected epoch seconds or YYYY-MM-DD"))?;
    Ok(calendar.start_of_day(date))
}
