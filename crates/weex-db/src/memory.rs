//! In-memory archive store
//!
//! Holds records in timestamp order and derives its own daily summaries,
//! which makes it the reference store for checking the aggregation
//! strategies against each other.

use crate::schema::{DailySummaryRow, RECORD_COLUMNS};
use crate::store::ArchiveStore;
use crate::DbResult;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ops::Bound;
use tracing::debug;
use weex_core::{
    DayCalendar, DayRollup, ObsField, ObservationRecord, Rollup, TimeSpan, Timestamp, UnitSystem,
    WIND,
};

#[derive(Debug, Clone)]
pub struct MemoryStore {
    unit_system: UnitSystem,
    records: BTreeMap<Timestamp, ObservationRecord>,
    columns: BTreeSet<String>,
    daily: HashMap<String, BTreeMap<Timestamp, DailySummaryRow>>,
}

impl MemoryStore {
    pub fn new(unit_system: UnitSystem) -> Self {
        Self {
            unit_system,
            records: BTreeMap::new(),
            columns: RECORD_COLUMNS.iter().map(|c| c.to_string()).collect(),
            daily: HashMap::new(),
        }
    }

    pub fn from_records(
        unit_system: UnitSystem,
        records: impl IntoIterator<Item = ObservationRecord>,
    ) -> Self {
        let mut store = Self::new(unit_system);
        for record in records {
            store.insert(record);
        }
        store
    }

    /// Insert or replace the record at its timestamp. Daily summaries are
    /// not touched; call [`MemoryStore::backfill`] to rebuild them.
    pub fn insert(&mut self, record: ObservationRecord) {
        self.columns.extend(record.fields().map(|f| f.to_string()));
        self.records.insert(record.date_time, record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// (Re)build the daily summaries of every observation column, plus
    /// `wind` when speed and direction are present. Returns the number of
    /// tables built.
    pub fn backfill(&mut self, calendar: &DayCalendar) -> usize {
        let mut fields: Vec<ObsField> = self
            .columns
            .iter()
            .filter(|c| !RECORD_COLUMNS.contains(&c.as_str()))
            .map(|c| ObsField::Scalar(c.clone()))
            .collect();
        if self.columns.contains(WIND.magnitude) && self.columns.contains(WIND.direction) {
            fields.push(ObsField::Vector(WIND));
        }

        for field in &fields {
            self.backfill_field(calendar, field);
        }
        fields.len()
    }

    /// Build the daily summary table of one field
    pub fn backfill_field(&mut self, calendar: &DayCalendar, field: &ObsField) {
        let mut days: BTreeMap<Timestamp, Rollup> = BTreeMap::new();
        for record in self.records.values() {
            let day = days.entry(calendar.day_start_of(record.date_time)).or_default();
            field.accumulate(record, day);
        }

        let vector = matches!(field, ObsField::Vector(_));
        let rows = days
            .into_iter()
            .map(|(day_start, rollup)| {
                let row = DailySummaryRow::from_rollup(
                    field.name(),
                    &DayRollup { day_start, rollup },
                    vector,
                );
                (day_start, row)
            })
            .collect::<BTreeMap<_, _>>();

        debug!("Backfilled {} days for {}", rows.len(), field);
        self.daily.insert(field.name().to_string(), rows);
    }

    /// Forget the daily summaries of `field`
    pub fn drop_daily_summary(&mut self, field: &str) {
        self.daily.remove(field);
    }

    /// Replace a single summary row, e.g. to model a stale rollup
    pub fn put_daily_summary(&mut self, row: DailySummaryRow) {
        self.daily
            .entry(row.obs_type.clone())
            .or_default()
            .insert(row.date_time, row);
    }
}

#[async_trait::async_trait]
impl ArchiveStore for MemoryStore {
    fn unit_system(&self) -> UnitSystem {
        self.unit_system
    }

    fn has_column(&self, name: &str) -> bool {
        self.columns.contains(name)
    }

    fn has_daily_summary(&self, field: &str) -> bool {
        self.daily.contains_key(field)
    }

    async fn get_record(
        &self,
        ts: Timestamp,
        max_delta: Option<i64>,
    ) -> DbResult<Option<ObservationRecord>> {
        let Some(delta) = max_delta.map(i64::abs) else {
            return Ok(self.records.get(&ts).cloned());
        };
        let nearest = self
            .records
            .range(ts - delta..=ts + delta)
            .min_by_key(|(t, _)| ((*t - ts).abs(), **t))
            .map(|(_, r)| r.clone());
        Ok(nearest)
    }

    async fn records(&self, span: &TimeSpan) -> DbResult<Vec<ObservationRecord>> {
        Ok(self
            .records
            .range((Bound::Excluded(span.start()), Bound::Included(span.stop())))
            .map(|(_, r)| r.clone())
            .collect())
    }

    async fn daily_summaries(
        &self,
        field: &str,
        first_day: Timestamp,
        end: Timestamp,
    ) -> DbResult<Vec<DailySummaryRow>> {
        if first_day >= end {
            return Ok(Vec::new());
        }
        Ok(self
            .daily
            .get(field)
            .map(|rows| rows.range(first_day..end).map(|(_, r)| r.clone()).collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryStore {
        let records = (1..=6).map(|i| {
            ObservationRecord::new(i * 3600 * 6, 1, 360)
                .with("outTemp", i as f64 * 10.0)
                .with("windSpeed", 5.0)
                .with("windDir", 90.0)
        });
        MemoryStore::from_records(UnitSystem::Us, records)
    }

    #[tokio::test]
    async fn test_records_use_half_open_span() {
        let store = store();
        let span = TimeSpan::new(6 * 3600, 24 * 3600).unwrap();
        let records = store.records(&span).await.unwrap();
        let times: Vec<_> = records.iter().map(|r| r.date_time).collect();
        assert_eq!(times, vec![12 * 3600, 18 * 3600, 24 * 3600]);
    }

    #[tokio::test]
    async fn test_get_record_exact_and_nearest() {
        let store = store();
        assert!(store.get_record(6 * 3600, None).await.unwrap().is_some());
        assert!(store.get_record(6 * 3600 + 1, None).await.unwrap().is_none());

        let near = store
            .get_record(12 * 3600 - 100, Some(600))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(near.date_time, 12 * 3600);
        assert!(store.get_record(9 * 3600, Some(60)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_backfill_groups_by_archive_day() {
        let mut store = store();
        let tables = store.backfill(&DayCalendar::utc());
        // outTemp, windDir, windSpeed and wind
        assert_eq!(tables, 4);
        assert!(store.has_daily_summary("wind"));
        assert!(store.has_daily_summary("outTemp"));
        assert!(!store.has_daily_summary("dateTime"));

        let rows = store.daily_summaries("outTemp", 0, 2 * 86_400).await.unwrap();
        // The record at 24:00 closes the first day
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].count, Some(4));
        assert_eq!(rows[0].max, Some(40.0));
        assert_eq!(rows[0].maxtime, Some(24 * 3600));
        assert_eq!(rows[1].count, Some(2));
        assert_eq!(rows[1].min, Some(50.0));
    }
}
