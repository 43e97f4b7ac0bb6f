//! Raw parameter drafts produced by description parsers
//!
//! Every field is optional: `None` means the parser did not extract it, which
//! is different from a present value of zero. Serde aliases accept the
//! parameter names used by SUMO's `netgenerate` so language-model replies in
//! that vocabulary deserialize directly.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::types::{JunctionControl, JunctionShape, NetworkKind};

/// How a lane count in a description is meant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phrasing {
    /// "bidirectional 4 lanes": both directions combined
    #[serde(alias = "bidirectional", alias = "total")]
    BidirectionalTotal,
    /// "2 lanes per direction", or a bare "2 lanes"
    #[default]
    #[serde(alias = "per_lane", alias = "directional")]
    PerDirection,
}

/// A lane count together with its phrasing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LaneInput")]
pub struct LaneSpec {
    pub count: i64,
    pub phrasing: Phrasing,
}

impl LaneSpec {
    pub fn per_direction(count: i64) -> Self {
        Self {
            count,
            phrasing: Phrasing::PerDirection,
        }
    }

    pub fn bidirectional(count: i64) -> Self {
        Self {
            count,
            phrasing: Phrasing::BidirectionalTotal,
        }
    }
}

/// A bare number is read as a per-direction count
#[derive(Deserialize)]
#[serde(untagged)]
enum LaneInput {
    Count(i64),
    Spec {
        count: i64,
        #[serde(default)]
        phrasing: Phrasing,
    },
}

impl From<LaneInput> for LaneSpec {
    fn from(input: LaneInput) -> Self {
        match input {
            LaneInput::Count(count) => LaneSpec::per_direction(count),
            LaneInput::Spec { count, phrasing } => LaneSpec { count, phrasing },
        }
    }
}

/// Unit a speed value was given in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedUnit {
    #[default]
    MetersPerSecond,
    KilometersPerHour,
}

/// Attribute an override changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeField {
    #[serde(alias = "lanenumber", alias = "lane_number")]
    Lanes,
    Length,
    Speed,
}

impl fmt::Display for AttributeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeField::Lanes => write!(f, "lanes"),
            AttributeField::Length => write!(f, "length"),
            AttributeField::Speed => write!(f, "speed"),
        }
    }
}

/// An attribute set for one named approach or edge class, e.g. "west edge 6 lanes"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Override {
    /// Approach or edge class label, like `west`, `arm2` or `horizontal`
    pub target: String,
    pub attribute: AttributeField,
    pub value: f64,
    /// Only meaningful for lane overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phrasing: Option<Phrasing>,
}

impl Override {
    pub fn lanes(target: impl Into<String>, lanes: LaneSpec) -> Self {
        Self {
            target: target.into(),
            attribute: AttributeField::Lanes,
            value: lanes.count as f64,
            phrasing: Some(lanes.phrasing),
        }
    }

    pub fn length(target: impl Into<String>, length: f64) -> Self {
        Self {
            target: target.into(),
            attribute: AttributeField::Length,
            value: length,
            phrasing: None,
        }
    }

    pub fn speed(target: impl Into<String>, speed: f64) -> Self {
        Self {
            target: target.into(),
            attribute: AttributeField::Speed,
            value: speed,
            phrasing: None,
        }
    }
}

/// Parameters extracted from a description, before reconciliation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawDraft {
    #[serde(alias = "network_type", alias = "kind")]
    pub network_kind: Option<NetworkKind>,

    #[serde(alias = "arm_number")]
    pub arity: Option<i64>,

    #[serde(alias = "grid.y-number")]
    pub rows: Option<i64>,

    #[serde(alias = "grid.x-number")]
    pub columns: Option<i64>,

    #[serde(alias = "spider.circle-number")]
    pub ring_count: Option<i64>,

    #[serde(alias = "spider.arm-number")]
    pub spoke_count: Option<i64>,

    #[serde(alias = "default.lanenumber")]
    pub lanes: Option<LaneSpec>,

    /// Meters
    #[serde(alias = "default.street-length", alias = "default.length")]
    pub length: Option<f64>,

    /// Meters per second
    #[serde(alias = "default.speed")]
    pub speed: Option<f64>,

    #[serde(alias = "shape")]
    pub junction_shape: Option<JunctionShape>,

    #[serde(alias = "junctions.type", alias = "junction-type")]
    pub control: Option<JunctionControl>,

    pub one_way: Option<bool>,

    pub overrides: Vec<Override>,
}

impl RawDraft {
    pub fn junction(arity: i64) -> Self {
        Self {
            network_kind: Some(NetworkKind::Junction),
            arity: Some(arity),
            ..Default::default()
        }
    }

    pub fn grid(rows: i64, columns: i64) -> Self {
        Self {
            network_kind: Some(NetworkKind::Grid),
            rows: Some(rows),
            columns: Some(columns),
            ..Default::default()
        }
    }

    pub fn radial(ring_count: i64, spoke_count: i64) -> Self {
        Self {
            network_kind: Some(NetworkKind::Radial),
            ring_count: Some(ring_count),
            spoke_count: Some(spoke_count),
            ..Default::default()
        }
    }

    pub fn with_lanes(mut self, lanes: LaneSpec) -> Self {
        self.lanes = Some(lanes);
        self
    }

    pub fn with_length(mut self, length: f64) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn with_override(mut self, entry: Override) -> Self {
        self.overrides.push(entry);
        self
    }

    pub fn one_way(mut self) -> Self {
        self.one_way = Some(true);
        self
    }
}
