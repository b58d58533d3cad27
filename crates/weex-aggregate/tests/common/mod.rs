//! Synthetic archive shared by the integration tests
//!
//! A station on Pacific Standard Time reporting every ten minutes from
//! mid February to mid April 2010. Values follow smooth daily and
//! monthly cycles; every 71st record carries nulls.

#![allow(dead_code)]

use std::f64::consts::PI;
use weex_core::{
    DayCalendar, ObservationRecord, ObservationValue, TimeSpan, Timestamp, UnitSystem,
};
use weex_db::MemoryStore;

pub const DAY: i64 = 86_400;
pub const INTERVAL: i64 = 600;
pub const PST_OFFSET: i32 = -8 * 3600;

/// 2010-03-01 00:00 PST
pub const MARCH_START: Timestamp = 1_267_430_400;
/// 2010-04-01 00:00 PST
pub const APRIL_START: Timestamp = MARCH_START + 31 * DAY;

pub const ARCHIVE_START: Timestamp = MARCH_START - 10 * DAY;
pub const ARCHIVE_STOP: Timestamp = APRIL_START + 10 * DAY;

pub fn calendar() -> DayCalendar {
    DayCalendar::from_offset_seconds(PST_OFFSET).unwrap()
}

pub fn span(start: Timestamp, stop: Timestamp) -> TimeSpan {
    TimeSpan::new(start, stop).unwrap()
}

pub fn march() -> TimeSpan {
    span(MARCH_START, APRIL_START)
}

fn value(v: f64, null: bool) -> ObservationValue {
    if null {
        ObservationValue::Null
    } else {
        ObservationValue::Float(v)
    }
}

/// The record stamped `ts`; `n` is its position in the archive
pub fn record(n: i64, ts: Timestamp) -> ObservationRecord {
    let elapsed = (ts - MARCH_START) as f64;
    let daily = 2.0 * PI * elapsed / DAY as f64;
    let monthly = 2.0 * PI * elapsed / (30.0 * DAY as f64);
    let null = n % 71 == 0;

    let out_temp = 40.0 - 15.0 * daily.cos() + 5.0 * monthly.sin();
    let barometer = 30.0 + 0.4 * monthly.sin() + 0.05 * daily.sin();
    let wind_speed = 8.0 + 6.0 * (3.0 * daily).sin() + 2.0 * monthly.cos();
    let wind_dir = (n * 37 % 360) as f64;
    let rain = if n % 53 == 0 { 0.02 } else { 0.0 };

    ObservationRecord::new(ts, UnitSystem::Us.code(), (INTERVAL / 60) as i32)
        .with("outTemp", value(out_temp, null))
        .with("barometer", value(barometer, null))
        .with("windSpeed", value(wind_speed, null))
        .with("windDir", value(wind_dir, null))
        .with("windGust", value(wind_speed * 1.3, null))
        .with("windGustDir", value((wind_dir + 10.0) % 360.0, null))
        .with("rain", value(rain, null))
}

pub fn records() -> impl Iterator<Item = ObservationRecord> {
    (ARCHIVE_START..=ARCHIVE_STOP)
        .step_by(INTERVAL as usize)
        .enumerate()
        .map(|(n, ts)| record(n as i64, ts))
}

/// The synthetic archive, with daily summaries for every field when
/// `backfill` is set
pub fn archive(backfill: bool) -> MemoryStore {
    let mut store = MemoryStore::from_records(UnitSystem::Us, records());
    if backfill {
        store.backfill(&calendar());
    }
    store
}

pub fn assert_close(a: Option<f64>, b: Option<f64>, context: &str) {
    match (a, b) {
        (Some(a), Some(b)) => {
            let tolerance = 1e-9 * a.abs().max(b.abs()).max(1.0);
            assert!((a - b).abs() <= tolerance, "{context}: {a} != {b}");
        }
        (a, b) => assert_eq!(a, b, "{context}"),
    }
}
