//! Heating, cooling and growing degree days

use crate::strategy::{check_kind, resolve_field, tag, AggregateStrategy};
use crate::{AggregateError, AggregateOptions, AggregateResult, DailySummaries, DegreeDayBases};
use tracing::{debug, instrument};
use weex_core::{
    AggregateType, DayCalendar, DegreeDayKind, Measurement, ObsField, TimeSpan, UnitGroup,
};
use weex_db::ArchiveStore;

const TEMPERATURE: &str = "outTemp";

/// Integrates degree days from the mean outside temperature of each day
/// span, clipped to the request
#[derive(Debug, Clone, Copy, Default)]
pub struct DegreeDays {
    daily: DailySummaries,
    bases: DegreeDayBases,
}

impl DegreeDays {
    pub fn new(calendar: DayCalendar, bases: DegreeDayBases) -> Self {
        Self {
            daily: DailySummaries::new(calendar),
            bases,
        }
    }

    pub fn bases(&self) -> &DegreeDayBases {
        &self.bases
    }

    /// Base temperature in the store's temperature unit
    fn base(
        &self,
        kind: DegreeDayKind,
        store: &dyn ArchiveStore,
        options: &AggregateOptions,
    ) -> AggregateResult<f64> {
        let unit = store.unit_system().unit_for(UnitGroup::Temperature);
        options
            .degree_day_base
            .unwrap_or_else(|| self.bases.base_for(kind))
            .convert_to(unit)?
            .value
            .ok_or(AggregateError::MissingOption("degree_day_base"))
    }

    /// Degrees of every day span of `span` that has a mean temperature,
    /// scaled by the share of the day the span covers
    pub async fn daily_degrees(
        &self,
        kind: DegreeDayKind,
        span: &TimeSpan,
        store: &dyn ArchiveStore,
        options: &AggregateOptions,
    ) -> AggregateResult<Vec<DayDegrees>> {
        let base = self.base(kind, store, options)?;
        let temperature = ObsField::parse(TEMPERATURE);
        let days = if store.has_daily_summary(TEMPERATURE) {
            self.daily.day_rollups(&temperature, span, store).await?
        } else {
            self.daily
                .archive()
                .day_rollups(&temperature, span, store)
                .await?
        };

        let calendar = self.daily.archive().calendar();
        Ok(days
            .iter()
            .filter_map(|d| {
                let mean = d.rollup.scalar.avg()?;
                let day = calendar.day_span_of(d.day_start + 1);
                let covered = day.stop().min(span.stop()) - day.start().max(span.start());
                let fraction = covered as f64 / day.duration() as f64;
                Some(DayDegrees {
                    fraction,
                    degrees: kind.degrees(mean, base) * fraction,
                })
            })
            .collect())
    }
}

/// Degree days contributed by one (possibly partial) day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayDegrees {
    /// Share of the day inside the request, in `(0, 1]`
    pub fraction: f64,
    pub degrees: f64,
}

#[async_trait::async_trait]
impl AggregateStrategy for DegreeDays {
    fn name(&self) -> &'static str {
        "degree_days"
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
        let ObsField::DegreeDay(dd) = obs else {
            return Err(AggregateError::UnknownField(format!(
                "{field} is not a degree-day field"
            )));
        };
        check_kind(&obs, kind)?;

        let degrees = self.daily_degrees(dd, span, store, options).await?;
        debug!("{} days contribute {}", degrees.len(), obs);
        let total: f64 = degrees.iter().map(|d| d.degrees).sum();
        let covered: f64 = degrees.iter().map(|d| d.fraction).sum();
        let value = match kind {
            _ if degrees.is_empty() => None,
            AggregateType::Avg => Some(total / covered),
            _ => Some(total),
        };
        Ok(tag(value, &obs, kind, store))
    }
}
