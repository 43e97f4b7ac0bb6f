//! Unit normalization tests

use proptest::prelude::*;
use road_netgen::generation::{
    normalize_lanes, normalize_length, normalize_speed, GenerationError, LaneSpec, Pipeline, RawDraft,
    SpeedUnit, MIN_LENGTH,
};

#[test]
fn test_bidirectional_total_is_split() {
    assert_eq!(normalize_lanes(LaneSpec::bidirectional(4)), Ok(2));
    assert_eq!(normalize_lanes(LaneSpec::bidirectional(2)), Ok(1));
}

#[test]
fn test_per_direction_is_kept() {
    assert_eq!(normalize_lanes(LaneSpec::per_direction(3)), Ok(3));
}

#[test]
fn test_odd_bidirectional_total_is_malformed() {
    let err = normalize_lanes(LaneSpec::bidirectional(3)).unwrap_err();
    assert!(matches!(err, GenerationError::MalformedQuantity { .. }));
    assert_eq!(err.field(), "lanes");
}

#[test]
fn test_zero_and_negative_lanes_are_malformed() {
    for count in [0, -2] {
        assert!(matches!(
            normalize_lanes(LaneSpec::per_direction(count)),
            Err(GenerationError::MalformedQuantity { .. })
        ));
        assert!(matches!(
            normalize_lanes(LaneSpec::bidirectional(count)),
            Err(GenerationError::MalformedQuantity { .. })
        ));
    }
}

#[test]
fn test_length_must_be_positive_and_finite() {
    assert_eq!(normalize_length(250.0), Ok(250.0));
    for length in [0.0, -10.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            normalize_length(length),
            Err(GenerationError::MalformedQuantity { .. })
        ));
    }
}

#[test]
fn test_length_below_coordinate_resolution_is_malformed() {
    assert_eq!(normalize_length(MIN_LENGTH), Ok(MIN_LENGTH));
    assert!(matches!(
        normalize_length(1e-7),
        Err(GenerationError::MalformedQuantity { .. })
    ));

    // Would otherwise snap the terminal onto the center node
    let err = Pipeline::default()
        .generate(&RawDraft::junction(4).with_length(1e-7))
        .unwrap_err();
    assert!(matches!(err, GenerationError::MalformedQuantity { .. }));
    assert_eq!(err.field(), "length");
}

#[test]
fn test_speed_units() {
    assert_eq!(normalize_speed(13.9, SpeedUnit::MetersPerSecond), Ok(13.9));
    let converted = normalize_speed(36.0, SpeedUnit::KilometersPerHour).unwrap();
    assert!((converted - 10.0).abs() < 1e-9);
    assert!(normalize_speed(0.0, SpeedUnit::KilometersPerHour).is_err());
}

proptest! {
    #[test]
    fn test_even_totals_halve(half in 1i64..500) {
        prop_assert_eq!(normalize_lanes(LaneSpec::bidirectional(half * 2)), Ok(half as u32));
    }

    #[test]
    fn test_odd_totals_fail(half in 0i64..500) {
        let result = normalize_lanes(LaneSpec::bidirectional(half * 2 + 1));
        prop_assert!(
            matches!(result, Err(GenerationError::MalformedQuantity { .. })),
            "odd total {} was accepted",
            half * 2 + 1
        );
    }
}
