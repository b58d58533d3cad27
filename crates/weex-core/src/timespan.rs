//! Time spans and the station's day calendar

use crate::types::Timestamp;
use chrono::{FixedOffset, NaiveDate, NaiveTime, Offset, Utc};
use serde::Serialize;
use std::fmt;

const SECONDS_PER_DAY: i64 = 86_400;

/// Span construction error
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Invalid time span: start {start} is not before stop {stop}")]
pub struct SpanError {
    pub start: Timestamp,
    pub stop: Timestamp,
}

/// Interval `(start, stop]`: a record stamped `ts` is inside when
/// `start < ts <= stop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeSpan {
    start: Timestamp,
    stop: Timestamp,
}

impl TimeSpan {
    pub fn new(start: Timestamp, stop: Timestamp) -> Result<Self, SpanError> {
        if start >= stop {
            return Err(SpanError { start, stop });
        }
        Ok(Self { start, stop })
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn stop(&self) -> Timestamp {
        self.stop
    }

    pub fn contains(&self, ts: Timestamp) -> bool {
        self.start < ts && ts <= self.stop
    }

    /// Length in seconds, always positive
    pub fn duration(&self) -> i64 {
        self.stop - self.start
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}]", self.start, self.stop)
    }
}

/// Calendar days of the station, at a fixed UTC offset.
///
/// An archive day runs from one local midnight (exclusive) to the next
/// (inclusive), so a record stamped exactly at midnight closes the
/// previous day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCalendar {
    offset: FixedOffset,
}

impl Default for DayCalendar {
    fn default() -> Self {
        Self::utc()
    }
}

impl DayCalendar {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    /// Offset east of UTC in seconds; `None` when out of range
    pub fn from_offset_seconds(seconds: i32) -> Option<Self> {
        FixedOffset::east_opt(seconds).map(Self::new)
    }

    fn offset_seconds(&self) -> i64 {
        i64::from(self.offset.local_minus_utc())
    }

    /// Largest local midnight `<= ts`
    pub fn prev_midnight(&self, ts: Timestamp) -> Timestamp {
        let local = ts + self.offset_seconds();
        local.div_euclid(SECONDS_PER_DAY) * SECONDS_PER_DAY - self.offset_seconds()
    }

    /// Smallest local midnight `>= ts`
    pub fn next_midnight(&self, ts: Timestamp) -> Timestamp {
        let prev = self.prev_midnight(ts);
        if prev == ts {
            ts
        } else {
            prev + SECONDS_PER_DAY
        }
    }

    /// Start (the opening midnight) of the archive day holding a record
    /// stamped `ts`
    pub fn day_start_of(&self, ts: Timestamp) -> Timestamp {
        self.prev_midnight(ts - 1)
    }

    /// The archive day holding a record stamped `ts`
    pub fn day_span_of(&self, ts: Timestamp) -> TimeSpan {
        let start = self.day_start_of(ts);
        TimeSpan {
            start,
            stop: start + SECONDS_PER_DAY,
        }
    }

    /// Local calendar date of the archive day holding `ts`
    pub fn day_of(&self, ts: Timestamp) -> NaiveDate {
        let local_start = self.day_start_of(ts) + self.offset_seconds();
        epoch_date() + chrono::Duration::days(local_start.div_euclid(SECONDS_PER_DAY))
    }

    /// Timestamp of the local midnight opening `date`
    pub fn start_of_day(&self, date: NaiveDate) -> Timestamp {
        date.and_time(NaiveTime::MIN).and_utc().timestamp() - self.offset_seconds()
    }

    /// Successive day spans covering `span`, clipped to it
    pub fn day_spans(&self, span: &TimeSpan) -> Vec<TimeSpan> {
        let mut spans = Vec::new();
        let mut cursor = span.start;
        while cursor < span.stop {
            let end = (self.prev_midnight(cursor) + SECONDS_PER_DAY).min(span.stop);
            spans.push(TimeSpan {
                start: cursor,
                stop: end,
            });
            cursor = end;
        }
        spans
    }
}

fn epoch_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2010-03-01 00:00:00 PST
    const MARCH_1_PST: Timestamp = 1_267_430_400;

    fn pst() -> DayCalendar {
        DayCalendar::from_offset_seconds(-8 * 3600).unwrap()
    }

    #[test]
    fn test_span_membership() {
        let span = TimeSpan::new(100, 200).unwrap();
        assert!(!span.contains(100));
        assert!(span.contains(101));
        assert!(span.contains(200));
        assert!(!span.contains(201));
        assert_eq!(span.duration(), 100);
    }

    #[test]
    fn test_invalid_span() {
        assert_eq!(
            TimeSpan::new(200, 200),
            Err(SpanError {
                start: 200,
                stop: 200
            })
        );
        assert!(TimeSpan::new(300, 200).is_err());
    }

    #[test]
    fn test_midnights() {
        let cal = pst();
        assert_eq!(cal.prev_midnight(MARCH_1_PST), MARCH_1_PST);
        assert_eq!(cal.prev_midnight(MARCH_1_PST + 5), MARCH_1_PST);
        assert_eq!(cal.next_midnight(MARCH_1_PST), MARCH_1_PST);
        assert_eq!(cal.next_midnight(MARCH_1_PST + 5), MARCH_1_PST + 86_400);
        // A record stamped at midnight belongs to the day before
        assert_eq!(cal.day_start_of(MARCH_1_PST), MARCH_1_PST - 86_400);
        assert_eq!(cal.day_start_of(MARCH_1_PST + 600), MARCH_1_PST);

        let day = cal.day_span_of(MARCH_1_PST);
        assert_eq!(day.start(), MARCH_1_PST - 86_400);
        assert_eq!(day.stop(), MARCH_1_PST);
        assert_eq!(cal.day_span_of(MARCH_1_PST + 1).start(), MARCH_1_PST);
    }

    #[test]
    fn test_dates() {
        let cal = pst();
        let march_1 = NaiveDate::from_ymd_opt(2010, 3, 1).unwrap();
        assert_eq!(cal.start_of_day(march_1), MARCH_1_PST);
        assert_eq!(cal.day_of(MARCH_1_PST + 600), march_1);
        assert_eq!(
            cal.day_of(MARCH_1_PST),
            NaiveDate::from_ymd_opt(2010, 2, 28).unwrap()
        );
    }

    #[test]
    fn test_day_spans_clip() {
        let cal = pst();
        let span = TimeSpan::new(MARCH_1_PST + 3600, MARCH_1_PST + 2 * 86_400 + 60).unwrap();
        let days = cal.day_spans(&span);
        assert_eq!(days.len(), 3);
        assert_eq!(days[0].start(), MARCH_1_PST + 3600);
        assert_eq!(days[0].stop(), MARCH_1_PST + 86_400);
        assert_eq!(days[1].duration(), 86_400);
        assert_eq!(days[2].stop(), span.stop());
    }
}
