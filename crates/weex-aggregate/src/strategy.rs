//! The strategy seam and the request checks every strategy shares

use crate::eval::{shape, Shape, Threshold};
use crate::{AggregateError, AggregateOptions, AggregateResult};
use weex_core::{AggregateType, Measurement, ObsField, TimeSpan, UnitGroup};
use weex_db::ArchiveStore;

/// A way of computing aggregates from an archive store
#[async_trait::async_trait]
pub trait AggregateStrategy: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Compute `kind` of `field` over `span`. Empty data yields a null
    /// measurement, never an error.
    async fn compute(
        &self,
        field: &str,
        span: &TimeSpan,
        kind: AggregateType,
        store: &dyn ArchiveStore,
        options: &AggregateOptions,
    ) -> AggregateResult<Measurement>;
}

/// Resolve a field name against the store's schema. Answered from schema
/// metadata only, so it never touches storage.
pub fn resolve_field(name: &str, store: &dyn ArchiveStore) -> AggregateResult<ObsField> {
    let field = ObsField::parse(name);
    let known = field.unit_group().is_some()
        && field
            .required_columns()
            .iter()
            .all(|column| store.has_column(column));
    if !known {
        return Err(AggregateError::UnknownField(name.to_string()));
    }
    Ok(field)
}

/// Reject kinds that make no sense for the field
pub fn check_kind(field: &ObsField, kind: AggregateType) -> AggregateResult<()> {
    let supported = match field {
        ObsField::Scalar(_) => !kind.is_vector_only(),
        ObsField::Vector(_) => shape(kind) != Shape::Record,
        ObsField::DegreeDay(_) => matches!(kind, AggregateType::Sum | AggregateType::Avg),
    };
    if !supported {
        return Err(AggregateError::UnsupportedAggregate(kind.to_string()));
    }
    Ok(())
}

/// Unit group of the result of `kind` over a field of group `field_group`
pub fn result_group(field_group: UnitGroup, kind: AggregateType) -> UnitGroup {
    use AggregateType::*;
    match kind {
        Count | NotNull => UnitGroup::Count,
        _ if kind.threshold().is_some() => UnitGroup::Count,
        MinTime | MaxTime | FirstTime | LastTime | MaxSumTime => UnitGroup::Time,
        VecDir | GustDir => UnitGroup::Direction,
        _ => field_group,
    }
}

/// Bind a computed value to the unit the store keeps its group in
pub fn tag(
    value: Option<f64>,
    field: &ObsField,
    kind: AggregateType,
    store: &dyn ArchiveStore,
) -> Measurement {
    let field_group = field.unit_group().unwrap_or(UnitGroup::Count);
    let group = result_group(field_group, kind);
    Measurement::new(value, store.unit_system().unit_for(group), group)
}

/// The threshold of a `*_ge` / `*_le` kind, converted to the field's unit
pub fn threshold_for(
    field: &ObsField,
    kind: AggregateType,
    store: &dyn ArchiveStore,
    options: &AggregateOptions,
) -> AggregateResult<Option<Threshold>> {
    let Some((stat, comparison)) = kind.threshold() else {
        return Ok(None);
    };
    let group = field
        .unit_group()
        .ok_or_else(|| AggregateError::UnknownField(field.name().to_string()))?;
    let threshold = options
        .threshold
        .ok_or(AggregateError::MissingOption("threshold"))?
        .convert_to(store.unit_system().unit_for(group))?;
    let value = threshold
        .value
        .ok_or(AggregateError::MissingOption("threshold"))?;
    Ok(Some(Threshold {
        stat,
        comparison,
        value,
    }))
}
