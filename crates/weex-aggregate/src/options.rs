//! Per-request aggregate options and configured defaults

use weex_core::{DegreeDayKind, Measurement, Unit};

/// Optional parameters of an aggregate request
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AggregateOptions {
    /// Comparison value of the `*_ge` / `*_le` kinds
    pub threshold: Option<Measurement>,
    /// Base temperature overriding the configured degree-day base
    pub degree_day_base: Option<Measurement>,
}

impl AggregateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, threshold: Measurement) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn with_degree_day_base(mut self, base: Measurement) -> Self {
        self.degree_day_base = Some(base);
        self
    }
}

/// Default base temperatures of the degree-day fields
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DegreeDayBases {
    pub heating: Measurement,
    pub cooling: Measurement,
    pub growing: Measurement,
}

impl Default for DegreeDayBases {
    fn default() -> Self {
        Self {
            heating: Measurement::of(65.0, Unit::DegreeF),
            cooling: Measurement::of(65.0, Unit::DegreeF),
            growing: Measurement::of(50.0, Unit::DegreeF),
        }
    }
}

impl DegreeDayBases {
    pub fn base_for(&self, kind: DegreeDayKind) -> Measurement {
        match kind {
            DegreeDayKind::Heating => self.heating,
            DegreeDayKind::Cooling => self.cooling,
            DegreeDayKind::Growing => self.growing,
        }
    }
}
