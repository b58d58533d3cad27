//! Database access layer for the WeeWX archive schema
//!
//! Uses existing schema from Python WeeWX - NO migrations, and no writes.
//! The aggregation engine talks to storage only through [`ArchiveStore`];
//! [`DbClient`] implements it over MySQL and [`MemoryStore`] over records
//! held in memory.

pub mod client;
pub mod memory;
pub mod queries;
pub mod schema;
pub mod store;

pub use client::*;
pub use memory::*;
pub use schema::*;
pub use store::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    ConnectionError(#[from] sqlx::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Table not found: {0}")]
    NotFound(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

pub type DbResult<T> = Result<T, DbError>;
