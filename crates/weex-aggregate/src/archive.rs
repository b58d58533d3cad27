//! Aggregates computed by scanning raw archive records

use crate::eval::{self, shape, Shape};
use crate::strategy::{check_kind, resolve_field, tag, threshold_for, AggregateStrategy};
use crate::{AggregateError, AggregateOptions, AggregateResult};
use std::collections::BTreeMap;
use tracing::{debug, instrument};
use weex_core::{
    AggregateType, DayCalendar, DayRollup, Measurement, ObsField, ObservationRecord, Rollup,
    TimeSpan,
};
use weex_db::ArchiveStore;

/// Scans every record of the span. Supports every kind, so it is also the
/// fallback of the other strategies.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveScan {
    calendar: DayCalendar,
}

impl ArchiveScan {
    pub fn new(calendar: DayCalendar) -> Self {
        Self { calendar }
    }

    pub fn calendar(&self) -> &DayCalendar {
        &self.calendar
    }

    /// Fold the records of `span` into one rollup
    pub async fn rollup(
        &self,
        field: &ObsField,
        span: &TimeSpan,
        store: &dyn ArchiveStore,
    ) -> AggregateResult<Rollup> {
        let mut rollup = Rollup::default();
        for record in store.records(span).await? {
            field.accumulate(&record, &mut rollup);
        }
        Ok(rollup)
    }

    /// Fold the records of `span` into one rollup per archive day, keyed
    /// the way daily summary rows are
    pub async fn day_rollups(
        &self,
        field: &ObsField,
        span: &TimeSpan,
        store: &dyn ArchiveStore,
    ) -> AggregateResult<Vec<DayRollup>> {
        let mut days: BTreeMap<i64, Rollup> = BTreeMap::new();
        for record in store.records(span).await? {
            let day = days
                .entry(self.calendar.day_start_of(record.date_time))
                .or_default();
            field.accumulate(&record, day);
        }
        Ok(days
            .into_iter()
            .map(|(day_start, rollup)| DayRollup { day_start, rollup })
            .collect())
    }

    async fn record_aggregate(
        &self,
        field: &ObsField,
        span: &TimeSpan,
        kind: AggregateType,
        store: &dyn ArchiveStore,
    ) -> AggregateResult<Option<f64>> {
        let records = store.records(span).await?;
        let with_value = |r: &&ObservationRecord| field.value(r).is_some();

        let value = match kind {
            AggregateType::First => records
                .iter()
                .find(with_value)
                .and_then(|r| field.value(r)),
            AggregateType::FirstTime => records
                .iter()
                .find(with_value)
                .map(|r| r.date_time as f64),
            AggregateType::Last => records
                .iter()
                .rev()
                .find(with_value)
                .and_then(|r| field.value(r)),
            AggregateType::LastTime => records
                .iter()
                .rev()
                .find(with_value)
                .map(|r| r.date_time as f64),
            AggregateType::Diff | AggregateType::TDeriv => {
                // The record stamped at the opening boundary, when there
                // is one, anchors the difference
                let first = match store.get_record(span.start(), None).await? {
                    Some(record) => Some(record),
                    None => records.first().cloned(),
                };
                let (Some(first), Some(last)) = (first, records.last()) else {
                    return Ok(None);
                };
                let (Some(v0), Some(v1)) = (field.value(&first), field.value(last)) else {
                    return Ok(None);
                };
                if kind == AggregateType::Diff {
                    Some(v1 - v0)
                } else {
                    let dt = last.date_time - first.date_time;
                    if dt == 0 {
                        return Err(AggregateError::DivisionByZero(format!(
                            "tderiv of {} with both ends at {}",
                            field, last.date_time
                        )));
                    }
                    Some((v1 - v0) / dt as f64)
                }
            }
            _ => None,
        };
        Ok(value)
    }
}

#[async_trait::async_trait]
impl AggregateStrategy for ArchiveScan {
    fn name(&self) -> &'static str {
        "archive"
    }

    #[instrument(skip(self, store, options))]
    async fn compute(
        &self,
        field: &str,
        span: &TimeSpan,
        kind: AggregateType,
        store: &dyn ArchiveStore,
        options: &AggregateOptions,
    ) -> AggregateResult<Measurement> {
        let obs = resolve_field(field, store)?;
        if let ObsField::DegreeDay(_) = obs {
            return Err(AggregateError::UnsupportedAggregate(format!(
                "{kind} of {obs} from archive records"
            )));
        }
        check_kind(&obs, kind)?;
        let threshold = threshold_for(&obs, kind, store, options)?;

        let value = match shape(kind) {
            Shape::Record => self.record_aggregate(&obs, span, kind, store).await?,
            Shape::Days => {
                let days = self.day_rollups(&obs, span, store).await?;
                debug!("Scanned {} archive days", days.len());
                eval::over_days(kind, &days, threshold)
            }
            Shape::Span => eval::total(kind, &self.rollup(&obs, span, store).await?),
        };
        Ok(tag(value, &obs, kind, store))
    }
}
