//! Unit normalization
//!
//! Turns lane, length and speed phrasing into canonical values: lanes per
//! direction, meters and meters per second.

use super::draft::{LaneSpec, Phrasing, SpeedUnit};
use super::error::{GenerationError, Result};
use super::types::COORDINATE_RESOLUTION;

/// Shortest segment that still moves a node off its neighbor once snapped
pub const MIN_LENGTH: f64 = 1.0 / COORDINATE_RESOLUTION;

/// Lanes per direction for a lane count in either phrasing.
/// Odd bidirectional totals are rejected rather than rounded.
pub fn normalize_lanes(spec: LaneSpec) -> Result<u32> {
    normalize_lanes_for("lanes", spec)
}

/// Same as [`normalize_lanes`], reporting errors against `field`
pub fn normalize_lanes_for(field: &str, spec: LaneSpec) -> Result<u32> {
    if spec.count <= 0 {
        return Err(GenerationError::malformed(
            field,
            spec.count,
            "a positive lane count",
        ));
    }

    let per_direction = match spec.phrasing {
        Phrasing::PerDirection => spec.count,
        Phrasing::BidirectionalTotal => {
            if spec.count % 2 != 0 {
                return Err(GenerationError::malformed(
                    field,
                    spec.count,
                    "an even bidirectional total (it is split evenly between both directions)",
                ));
            }
            spec.count / 2
        }
    };

    u32::try_from(per_direction)
        .map_err(|_| GenerationError::malformed(field, spec.count, "a lane count below 2^32"))
}

/// Segment length in meters; must be finite and at least `MIN_LENGTH`
pub fn normalize_length(length: f64) -> Result<f64> {
    normalize_length_for("length", length)
}

pub fn normalize_length_for(field: &str, length: f64) -> Result<f64> {
    if !length.is_finite() || length < MIN_LENGTH {
        return Err(GenerationError::malformed(
            field,
            length,
            "a finite length of at least 1 micrometer",
        ));
    }
    Ok(length)
}

/// Speed limit in meters per second
pub fn normalize_speed(value: f64, unit: SpeedUnit) -> Result<f64> {
    normalize_speed_for("speed", value, unit)
}

pub fn normalize_speed_for(field: &str, value: f64, unit: SpeedUnit) -> Result<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(GenerationError::malformed(
            field,
            value,
            "a finite speed above 0",
        ));
    }

    Ok(match unit {
        SpeedUnit::MetersPerSecond => value,
        SpeedUnit::KilometersPerHour => value / 3.6,
    })
}
