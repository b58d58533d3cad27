//! The read-only storage contract consumed by the aggregation engine

use crate::schema::DailySummaryRow;
use crate::DbResult;
use weex_core::{ObservationRecord, TimeSpan, Timestamp, UnitSystem};

/// Read access to an archive and its daily summaries.
///
/// Schema lookups are answered from metadata loaded when the store was
/// opened, so callers can validate a request before any query runs.
#[async_trait::async_trait]
pub trait ArchiveStore: Send + Sync {
    /// Unit system the archive is stored in
    fn unit_system(&self) -> UnitSystem;

    /// Whether the archive table has the given column
    fn has_column(&self, name: &str) -> bool;

    /// Whether a daily summary table exists for the given field
    fn has_daily_summary(&self, field: &str) -> bool;

    /// Record stamped exactly `ts` (`max_delta` = `None`), or the record
    /// nearest to `ts` within `max_delta` seconds
    async fn get_record(
        &self,
        ts: Timestamp,
        max_delta: Option<i64>,
    ) -> DbResult<Option<ObservationRecord>>;

    /// Records with `span.start() < dateTime <= span.stop()`, ascending
    async fn records(&self, span: &TimeSpan) -> DbResult<Vec<ObservationRecord>>;

    /// Daily summary rows of `field` whose day starts in
    /// `[first_day, end)`, ascending
    async fn daily_summaries(
        &self,
        field: &str,
        first_day: Timestamp,
        end: Timestamp,
    ) -> DbResult<Vec<DailySummaryRow>>;
}
