//! Core data types, units, and rollup calculations for WeeWX
//!
//! This crate provides the fundamental data structures shared by the
//! storage layer and the aggregation engine: observation records, time
//! spans and day boundaries, unit-tagged measurements, and the rollup
//! accumulators both aggregation strategies fold data into.

pub mod fields;
pub mod measurement;
pub mod rollups;
pub mod timespan;
pub mod types;
pub mod units;
pub mod vector;

pub use fields::*;
pub use measurement::*;
pub use rollups::*;
pub use timespan::*;
pub use types::*;
pub use units::*;
pub use vector::*;
