//! Relations every archive must satisfy, checked through the dispatcher

mod common;

use common::*;
use weex_aggregate::{
    AggregateDispatcher, AggregateOptions, AggregateStrategy, DegreeDayBases, DegreeDays,
};
use weex_core::{AggregateType, Measurement, Unit, UnitGroup};

fn dispatcher() -> AggregateDispatcher {
    AggregateDispatcher::new(calendar(), DegreeDayBases::default())
}

#[tokio::test]
async fn test_vector_mean_never_exceeds_scalar_mean() {
    let store = archive(true);
    let options = AggregateOptions::new();
    for span in [march(), span(MARCH_START + 3600, MARCH_START + 5 * DAY)] {
        let avg = dispatcher()
            .get_aggregate("wind", &span, AggregateType::Avg, &store, &options)
            .await
            .unwrap();
        let vecavg = dispatcher()
            .get_aggregate("wind", &span, AggregateType::VecAvg, &store, &options)
            .await
            .unwrap();
        assert_eq!(avg.unit, Unit::MilePerHour);
        assert_eq!(vecavg.unit, Unit::MilePerHour);
        assert!(vecavg.value.unwrap() <= avg.value.unwrap());
    }
}

#[tokio::test]
async fn test_wind_max_includes_gusts() {
    let store = archive(true);
    let options = AggregateOptions::new();
    let max = dispatcher()
        .get_aggregate("wind", &march(), AggregateType::Max, &store, &options)
        .await
        .unwrap();
    let speed = dispatcher()
        .get_aggregate("windSpeed", &march(), AggregateType::Max, &store, &options)
        .await
        .unwrap();
    let gust = dispatcher()
        .get_aggregate("windGust", &march(), AggregateType::Max, &store, &options)
        .await
        .unwrap();
    assert!(max.value.unwrap() > speed.value.unwrap());
    assert_eq!(max.value, gust.value);

    let gustdir = dispatcher()
        .get_aggregate("wind", &march(), AggregateType::GustDir, &store, &options)
        .await
        .unwrap();
    assert_eq!(gustdir.group, UnitGroup::Direction);
    assert!((0.0..360.0).contains(&gustdir.value.unwrap()));
}

#[tokio::test]
async fn test_time_difference_is_span_duration() {
    let store = archive(true);
    let options = AggregateOptions::new();
    for span in [
        march(),
        span(MARCH_START + 600, MARCH_START + 600 * 7),
        span(MARCH_START - DAY, MARCH_START + 3 * DAY),
    ] {
        let diff = dispatcher()
            .get_aggregate("dateTime", &span, AggregateType::Diff, &store, &options)
            .await
            .unwrap();
        assert_eq!(diff.value, Some(span.duration() as f64));

        let tderiv = dispatcher()
            .get_aggregate("dateTime", &span, AggregateType::TDeriv, &store, &options)
            .await
            .unwrap();
        assert_eq!(tderiv.value, Some(1.0));
    }
}

#[tokio::test]
async fn test_heating_degree_days_grow_with_base() {
    let store = archive(true);
    let mut previous = 0.0;
    for base in [40.0, 45.0, 50.0, 55.0, 60.0, 65.0, 70.0] {
        let options =
            AggregateOptions::new().with_degree_day_base(Measurement::of(base, Unit::DegreeF));
        let heat = dispatcher()
            .get_aggregate("heatdeg", &march(), AggregateType::Sum, &store, &options)
            .await
            .unwrap();
        let heat = heat.value.unwrap();
        assert!(heat >= previous, "base {base}: {heat} < {previous}");
        previous = heat;
    }
}

#[tokio::test]
async fn test_heating_base_shift_adds_a_day_each() {
    // Every March day averages well below 60 degF, so moving the base from
    // 60 to 65 adds 5 degree days per day
    let store = archive(true);
    let default = dispatcher()
        .get_aggregate(
            "heatdeg",
            &march(),
            AggregateType::Sum,
            &store,
            &AggregateOptions::new(),
        )
        .await
        .unwrap();
    let options =
        AggregateOptions::new().with_degree_day_base(Measurement::of(60.0, Unit::DegreeF));
    let lowered = dispatcher()
        .get_aggregate("heatdeg", &march(), AggregateType::Sum, &store, &options)
        .await
        .unwrap();
    assert_eq!(default.unit, Unit::DegreeFDay);
    assert_close(
        default.value,
        lowered.value.map(|v| v + 31.0 * 5.0),
        "heatdeg base shift",
    );
}

#[tokio::test]
async fn test_degree_days_agree_with_and_without_rollups() {
    let options = AggregateOptions::new();
    let span = span(MARCH_START + 7 * 3600, MARCH_START + 12 * DAY + 3 * 3600);
    let strategy = DegreeDays::new(calendar(), DegreeDayBases::default());
    for field in ["heatdeg", "cooldeg", "growdeg"] {
        let with = strategy
            .compute(field, &span, AggregateType::Sum, &archive(true), &options)
            .await
            .unwrap();
        let without = strategy
            .compute(field, &span, AggregateType::Sum, &archive(false), &options)
            .await
            .unwrap();
        assert_close(with.value, without.value, field);
    }
}

#[tokio::test]
async fn test_threshold_counts_partition_days() {
    let store = archive(true);
    let threshold = Measurement::of(27.123_456, Unit::DegreeF);
    let options = AggregateOptions::new().with_threshold(threshold);
    let dispatcher = dispatcher();
    let month = march();
    let count = |kind| dispatcher.get_aggregate("outTemp", &month, kind, &store, &options);

    let ge = count(AggregateType::MinGe).await.unwrap();
    let le = count(AggregateType::MinLe).await.unwrap();
    assert_eq!(ge.unit, Unit::Count);
    assert_eq!(ge.value.unwrap() + le.value.unwrap(), 31.0);

    let ge = count(AggregateType::MaxGe).await.unwrap();
    let le = count(AggregateType::MaxLe).await.unwrap();
    assert_eq!(ge.value.unwrap() + le.value.unwrap(), 31.0);
}

#[tokio::test]
async fn test_threshold_in_other_units() {
    let store = archive(true);
    let fahrenheit = AggregateOptions::new().with_threshold(Measurement::of(41.0, Unit::DegreeF));
    let celsius = AggregateOptions::new().with_threshold(Measurement::of(5.0, Unit::DegreeC));
    let f = dispatcher()
        .get_aggregate("outTemp", &march(), AggregateType::MaxGe, &store, &fahrenheit)
        .await
        .unwrap();
    let c = dispatcher()
        .get_aggregate("outTemp", &march(), AggregateType::MaxGe, &store, &celsius)
        .await
        .unwrap();
    assert_eq!(f, c);
}
