//! Database client and connection management

use crate::schema::{tables, RECORD_COLUMNS};
use crate::DbResult;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use weex_core::UnitSystem;

/// Archive layout discovered when the client connects
#[derive(Debug, Clone, Default)]
pub struct ArchiveSchema {
    /// Columns of the `archive` table
    pub columns: BTreeSet<String>,
    /// Observation types with an `archive_day_<obs>` table
    pub daily_summaries: BTreeSet<String>,
}

impl ArchiveSchema {
    /// Observation columns, i.e. everything but the record metadata
    pub fn observation_columns(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .map(String::as_str)
            .filter(|c| !RECORD_COLUMNS.contains(c))
    }
}

/// Read-only database client wrapping a sqlx connection pool.
///
/// Opening the client loads the archive schema and unit system; `close`
/// ends its scope.
#[derive(Clone)]
pub struct DbClient {
    pool: MySqlPool,
    schema: Arc<ArchiveSchema>,
    unit_system: UnitSystem,
}

impl DbClient {
    /// Create a new database client from connection string
    pub async fn new(database_url: &str) -> DbResult<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(30))
            .connect(database_url)
            .await?;

        Self::from_pool(pool).await
    }

    async fn from_pool(pool: MySqlPool) -> DbResult<Self> {
        let schema = Self::load_schema(&pool).await?;
        let unit_system = Self::load_unit_system(&pool).await?;
        info!(
            columns = schema.columns.len(),
            daily_summaries = schema.daily_summaries.len(),
            ?unit_system,
            "Loaded archive schema"
        );
        Ok(Self {
            pool,
            schema: Arc::new(schema),
            unit_system,
        })
    }

    /// Get reference to underlying pool for direct queries
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    pub fn schema(&self) -> &ArchiveSchema {
        &self.schema
    }

    pub fn unit_system(&self) -> UnitSystem {
        self.unit_system
    }

    /// Close the connection pool gracefully
    pub async fn close(self) {
        self.pool.close().await;
    }

    /// Name of the daily summary table of `field`, if the archive has one
    pub(crate) fn daily_table(&self, field: &str) -> Option<String> {
        self.schema
            .daily_summaries
            .contains(field)
            .then(|| tables::daily_summary(field))
    }
}
