//! Database query operations for WeeWX tables

use crate::client::ArchiveSchema;
use crate::schema::{tables, DailySummaryRow};
use crate::store::ArchiveStore;
use crate::{DbClient, DbError, DbResult};
use sqlx::mysql::{MySqlPool, MySqlRow};
use sqlx::Row;
use tracing::{debug, instrument};
use weex_core::{ObservationRecord, ObservationValue, TimeSpan, Timestamp, UnitSystem};

impl DbClient {
    /// Discover the archive columns and the daily summary tables
    pub(crate) async fn load_schema(pool: &MySqlPool) -> DbResult<ArchiveSchema> {
        let columns: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT COLUMN_NAME FROM information_schema.COLUMNS
            WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?
            "#,
        )
        .bind(tables::ARCHIVE)
        .fetch_all(pool)
        .await?;

        if columns.is_empty() {
            return Err(DbError::NotFound(tables::ARCHIVE.to_string()));
        }

        let day_tables: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT TABLE_NAME FROM information_schema.TABLES
            WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME LIKE 'archive\_day\_%'
            "#,
        )
        .fetch_all(pool)
        .await?;

        let daily_summaries = day_tables
            .iter()
            .filter_map(|t| t.strip_prefix(tables::DAILY_SUMMARY_PREFIX))
            // archive_day__metadata is bookkeeping, not a summary
            .filter(|obs| !obs.starts_with('_'))
            .map(String::from)
            .collect();

        Ok(ArchiveSchema {
            columns: columns.into_iter().collect(),
            daily_summaries,
        })
    }

    /// The unit system of the archive is that of its first record
    pub(crate) async fn load_unit_system(pool: &MySqlPool) -> DbResult<UnitSystem> {
        let code: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT usUnits FROM archive
            ORDER BY dateTime ASC
            LIMIT 1
            "#,
        )
        .fetch_optional(pool)
        .await?;

        match code {
            None => Ok(UnitSystem::Us),
            Some(code) => UnitSystem::try_from(code as i32)
                .map_err(|e| DbError::ConfigError(e.to_string())),
        }
    }

    fn select_list(&self) -> String {
        self.schema()
            .columns
            .iter()
            .map(|c| format!("`{c}`"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn record_from_row(&self, row: &MySqlRow) -> DbResult<ObservationRecord> {
        let date_time: i64 = row.try_get("dateTime")?;
        let us_units: Option<i64> = row.try_get("usUnits")?;
        let interval: Option<i64> = row.try_get("interval")?;

        let mut record = ObservationRecord::new(
            date_time,
            us_units.map_or(self.unit_system().code(), |u| u as i32),
            interval.unwrap_or(0) as i32,
        );
        for column in self.schema().observation_columns() {
            let value = decode_f64(row, column)?;
            record
                .values
                .insert(column.to_string(), ObservationValue::from(value));
        }
        Ok(record)
    }

    /// Get archive records within `(start, stop]`
    #[instrument(skip(self))]
    pub async fn get_archive_range(&self, span: &TimeSpan) -> DbResult<Vec<ObservationRecord>> {
        let sql = format!(
            r#"
            SELECT {} FROM archive
            WHERE dateTime > ? AND dateTime <= ?
            ORDER BY dateTime ASC
            "#,
            self.select_list()
        );
        let rows = sqlx::query(&sql)
            .bind(span.start())
            .bind(span.stop())
            .fetch_all(self.pool())
            .await?;

        let records = rows
            .iter()
            .map(|row| self.record_from_row(row))
            .collect::<DbResult<Vec<_>>>()?;

        debug!("Retrieved {} archive records in {}", records.len(), span);
        Ok(records)
    }

    /// Get the record at `ts`, or the nearest one within `max_delta` seconds
    #[instrument(skip(self))]
    pub async fn get_archive_record(
        &self,
        ts: Timestamp,
        max_delta: Option<i64>,
    ) -> DbResult<Option<ObservationRecord>> {
        let row = match max_delta {
            None => {
                let sql = format!(
                    "SELECT {} FROM archive WHERE dateTime = ?",
                    self.select_list()
                );
                sqlx::query(&sql)
                    .bind(ts)
                    .fetch_optional(self.pool())
                    .await?
            }
            Some(delta) => {
                let sql = format!(
                    r#"
                    SELECT {} FROM archive
                    WHERE dateTime >= ? AND dateTime <= ?
                    ORDER BY ABS(dateTime - ?) ASC, dateTime ASC
                    LIMIT 1
                    "#,
                    self.select_list()
                );
                sqlx::query(&sql)
                    .bind(ts - delta)
                    .bind(ts + delta)
                    .bind(ts)
                    .fetch_optional(self.pool())
                    .await?
            }
        };

        row.as_ref().map(|r| self.record_from_row(r)).transpose()
    }

    /// Get the daily summary rows of `field` for days starting in `[first_day, end)`
    #[instrument(skip(self))]
    pub async fn get_daily_summaries(
        &self,
        field: &str,
        first_day: Timestamp,
        end: Timestamp,
    ) -> DbResult<Vec<DailySummaryRow>> {
        let table = self
            .daily_table(field)
            .ok_or_else(|| DbError::NotFound(tables::daily_summary(field)))?;

        let sql = format!(
            r#"
            SELECT * FROM `{table}`
            WHERE dateTime >= ? AND dateTime < ?
            ORDER BY dateTime ASC
            "#
        );
        let mut rows = sqlx::query_as::<_, DailySummaryRow>(&sql)
            .bind(first_day)
            .bind(end)
            .fetch_all(self.pool())
            .await?;

        for row in &mut rows {
            row.obs_type = field.to_string();
        }

        debug!("Retrieved {} rows from {}", rows.len(), table);
        Ok(rows)
    }
}

/// Observation columns are REAL in WeeWX schemas, but older or custom
/// schemas carry INTEGER columns too.
fn decode_f64(row: &MySqlRow, column: &str) -> DbResult<Option<f64>> {
    match row.try_get::<Option<f64>, _>(column) {
        Ok(value) => Ok(value),
        Err(sqlx::Error::ColumnDecode { .. }) => {
            let value: Option<i64> = row.try_get(column)?;
            Ok(value.map(|v| v as f64))
        }
        Err(e) => Err(e.into()),
    }
}

#[async_trait::async_trait]
impl ArchiveStore for DbClient {
    fn unit_system(&self) -> UnitSystem {
        DbClient::unit_system(self)
    }

    fn has_column(&self, name: &str) -> bool {
        self.schema().columns.contains(name)
    }

    fn has_daily_summary(&self, field: &str) -> bool {
        self.schema().daily_summaries.contains(field)
    }

    async fn get_record(
        &self,
        ts: Timestamp,
        max_delta: Option<i64>,
    ) -> DbResult<Option<ObservationRecord>> {
        self.get_archive_record(ts, max_delta).await
    }

    async fn records(&self, span: &TimeSpan) -> DbResult<Vec<ObservationRecord>> {
        self.get_archive_range(span).await
    }

    async fn daily_summaries(
        &self,
        field: &str,
        first_day: Timestamp,
        end: Timestamp,
    ) -> DbResult<Vec<DailySummaryRow>> {
        self.get_daily_summaries(field, first_day, end).await
    }
}
