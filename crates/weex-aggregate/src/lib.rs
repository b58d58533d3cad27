//! Aggregate computations over the weather archive
//!
//! Computes statistical summaries of an observation field over a time
//! span. Three strategies implement [`AggregateStrategy`]:
//! [`ArchiveScan`] reads raw records, [`DailySummaries`] reads the
//! per-day rollup tables and scans only partial boundary days, and
//! [`DegreeDays`] integrates heating, cooling and growing degrees.
//! [`AggregateDispatcher`] picks one per request.

pub mod archive;
pub mod daily;
pub mod dispatcher;
pub mod eval;
pub mod heatcool;
pub mod options;
pub mod strategy;

pub use archive::*;
pub use daily::*;
pub use dispatcher::*;
pub use heatcool::*;
pub use options::*;
pub use strategy::*;

use thiserror::Error;
use weex_core::{SpanError, UnitError, UnknownAggregate};

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("Aggregation type '{0}' is not supported")]
    UnsupportedAggregate(String),

    #[error("Unknown observation field: {0}")]
    UnknownField(String),

    #[error(transparent)]
    InvalidSpan(#[from] SpanError),

    #[error("Division by zero: {0}")]
    DivisionByZero(String),

    #[error("Storage error: {0}")]
    Storage(#[from] weex_db::DbError),

    #[error("Missing aggregate option: {0}")]
    MissingOption(&'static str),

    #[error("Unit error: {0}")]
    Unit(#[from] UnitError),
}

impl From<UnknownAggregate> for AggregateError {
    fn from(err: UnknownAggregate) -> Self {
        AggregateError::UnsupportedAggregate(err.0)
    }
}

pub type AggregateResult<T> = Result<T, AggregateError>;
