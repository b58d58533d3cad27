//! Request routing between the aggregation strategies

use crate::strategy::{check_kind, resolve_field, AggregateStrategy};
use crate::{
    AggregateOptions, AggregateResult, ArchiveScan, DailySummaries, DegreeDayBases, DegreeDays,
};
use tracing::{debug, instrument};
use weex_core::{AggregateType, DayCalendar, Measurement, ObsField, TimeSpan, Timestamp};
use weex_db::ArchiveStore;

/// Entry point of the engine: validates a request and hands it to the
/// strategy best suited to the field, the kind and the store's tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct AggregateDispatcher {
    archive: ArchiveScan,
    daily: DailySummaries,
    degree_days: DegreeDays,
}

impl AggregateDispatcher {
    pub fn new(calendar: DayCalendar, bases: DegreeDayBases) -> Self {
        Self {
            archive: ArchiveScan::new(calendar),
            daily: DailySummaries::new(calendar),
            degree_days: DegreeDays::new(calendar, bases),
        }
    }

    pub fn archive_scan(&self) -> &ArchiveScan {
        &self.archive
    }

    pub fn daily_summaries(&self) -> &DailySummaries {
        &self.daily
    }

    pub fn degree_days(&self) -> &DegreeDays {
        &self.degree_days
    }

    /// Strategy for a validated request
    pub fn route(
        &self,
        field: &ObsField,
        kind: AggregateType,
        store: &dyn ArchiveStore,
    ) -> &dyn AggregateStrategy {
        match field {
            ObsField::DegreeDay(_) => &self.degree_days,
            _ if store.has_daily_summary(field.name()) && DailySummaries::has_rollup(kind) => {
                &self.daily
            }
            _ => &self.archive,
        }
    }

    /// Compute `kind` of `field` over `span`
    #[instrument(skip(self, store, options))]
    pub async fn get_aggregate(
        &self,
        field: &str,
        span: &TimeSpan,
        kind: AggregateType,
        store: &dyn ArchiveStore,
        options: &AggregateOptions,
    ) -> AggregateResult<Measurement> {
        // Routing needs the resolved field. Strategies validate again since
        // they are also called directly.
        let obs = resolve_field(field, store)?;
        check_kind(&obs, kind)?;

        let strategy = self.route(&obs, kind, store);
        debug!(strategy = strategy.name(), "Routing {} of {}", kind, obs);
        strategy.compute(field, span, kind, store, options).await
    }

    /// Like [`AggregateDispatcher::get_aggregate`], with the kind given by
    /// name and the span by its bounds
    pub async fn get_aggregate_str(
        &self,
        field: &str,
        start: Timestamp,
        stop: Timestamp,
        kind: &str,
        store: &dyn ArchiveStore,
        options: &AggregateOptions,
    ) -> AggregateResult<Measurement> {
        let kind: AggregateType = kind.parse()?;
        let span = TimeSpan::new(start, stop)?;
        self.get_aggregate(field, &span, kind, store, options).await
    }
}
