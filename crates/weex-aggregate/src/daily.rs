//! Aggregates computed from the daily summary tables
//!
//! Whole days inside the span come from their summary rows. The partial
//! days at either end are scanned raw and merged with the same rule the
//! rows were built with.

use crate::eval::{self, shape, Shape};
use crate::strategy::{check_kind, resolve_field, tag, threshold_for, AggregateStrategy};
use crate::{AggregateError, AggregateOptions, AggregateResult, ArchiveScan};
use tracing::{debug, instrument};
use weex_core::{
    merge_rollups, AggregateType, DayCalendar, DayRollup, Measurement, ObsField, TimeSpan,
};
use weex_db::ArchiveStore;

#[derive(Debug, Clone, Copy, Default)]
pub struct DailySummaries {
    archive: ArchiveScan,
}

impl DailySummaries {
    pub fn new(calendar: DayCalendar) -> Self {
        Self {
            archive: ArchiveScan::new(calendar),
        }
    }

    /// The raw scan used for boundary days and record kinds
    pub fn archive(&self) -> &ArchiveScan {
        &self.archive
    }

    /// Whether `kind` can be answered from summary rows
    pub fn has_rollup(kind: AggregateType) -> bool {
        shape(kind) != Shape::Record
    }

    /// One rollup per archive day of `span`: summary rows for the days
    /// that lie wholly inside it, raw scans for the partial days at its
    /// ends
    #[instrument(skip(self, field, store), fields(field = %field))]
    pub async fn day_rollups(
        &self,
        field: &ObsField,
        span: &TimeSpan,
        store: &dyn ArchiveStore,
    ) -> AggregateResult<Vec<DayRollup>> {
        let calendar = self.archive.calendar();
        let first_midnight = calendar.next_midnight(span.start());
        let last_midnight = calendar.prev_midnight(span.stop());

        // No midnight inside the span: it is a single partial day
        if first_midnight > span.stop() {
            return self.archive.day_rollups(field, span, store).await;
        }

        let mut days = Vec::new();
        if span.start() < first_midnight {
            let head = TimeSpan::new(span.start(), first_midnight)?;
            days.extend(self.archive.day_rollups(field, &head, store).await?);
        }
        if first_midnight < last_midnight {
            let rows = store
                .daily_summaries(field.name(), first_midnight, last_midnight)
                .await?;
            debug!("Read {} daily summary rows", rows.len());
            days.extend(rows.iter().map(|row| row.to_rollup()));
        }
        if last_midnight < span.stop() {
            let tail = TimeSpan::new(last_midnight, span.stop())?;
            days.extend(self.archive.day_rollups(field, &tail, store).await?);
        }
        Ok(days)
    }
}

#[async_trait::async_trait]
impl AggregateStrategy for DailySummaries {
    fn name(&self) -> &'static str {
        "daily"
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
                "{kind} of {obs} from daily summaries"
            )));
        }
        check_kind(&obs, kind)?;

        if !Self::has_rollup(kind) {
            return self.archive.compute(field, span, kind, store, options).await;
        }
        if !store.has_daily_summary(obs.name()) {
            debug!("No daily summary for {}, scanning the archive", obs);
            return self.archive.compute(field, span, kind, store, options).await;
        }

        let threshold = threshold_for(&obs, kind, store, options)?;
        let days = self.day_rollups(&obs, span, store).await?;
        let value = match shape(kind) {
            Shape::Days => eval::over_days(kind, &days, threshold),
            _ => eval::total(kind, &merge_rollups(days.iter().map(|d| &d.rollup))),
        };
        Ok(tag(value, &obs, kind, store))
    }
}
