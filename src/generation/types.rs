//! Core types for network generation
//!
//! Ids, coordinates and the attribute set shared by every topology kind.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a node in a generated network
/// Ids are assigned in insertion order and never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

/// Identifier of a directed edge in a generated network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EdgeId(pub usize);

/// A 2D position in meters, x to the east and y to the north
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: snap(x),
            y: snap(y),
        }
    }

    /// Position at `radius` meters from the origin, `angle` radians counter clockwise from east
    pub fn polar(radius: f64, angle: f64) -> Self {
        Self::new(radius * angle.cos(), radius * angle.sin())
    }

    pub fn distance(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Rounds to the nearest micrometer so trig noise like `cos(90°)` lands on zero.
fn snap(value: f64) -> f64 {
    // Adding 0.0 folds -0.0 into 0.0
    (value * COORDINATE_RESOLUTION).round() / COORDINATE_RESOLUTION + 0.0
}

/// Topology kind of a network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkKind {
    /// A single junction with three or more approaches
    #[serde(alias = "intersection", alias = "multi_junction")]
    Junction,
    /// A rectangular lattice of junctions
    Grid,
    /// Concentric rings connected by spokes
    #[serde(alias = "spider", alias = "ring")]
    Radial,
}

impl fmt::Display for NetworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkKind::Junction => write!(f, "junction"),
            NetworkKind::Grid => write!(f, "grid"),
            NetworkKind::Radial => write!(f, "radial"),
        }
    }
}

impl std::str::FromStr for NetworkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "junction" | "intersection" => Ok(NetworkKind::Junction),
            "grid" => Ok(NetworkKind::Grid),
            "radial" | "spider" | "ring" => Ok(NetworkKind::Radial),
            other => Err(format!("unknown network kind `{other}`")),
        }
    }
}

/// Layout of a single junction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JunctionShape {
    /// Four approaches on the compass axes
    Cross,
    /// Three approaches, two of them on a straight line
    #[serde(rename = "t", alias = "T")]
    T,
    /// Any number of evenly spaced approaches
    #[serde(alias = "multi")]
    MultiWay,
}

impl JunctionShape {
    /// Shape implied by an arity when the description does not name one
    pub fn for_arity(arity: u32) -> Self {
        match arity {
            3 => JunctionShape::T,
            4 => JunctionShape::Cross,
            _ => JunctionShape::MultiWay,
        }
    }

    /// Label and heading (degrees counter clockwise from east) of every approach.
    /// Cross and T junctions use compass names, other shapes `arm0`, `arm1`, ...
    pub fn approach_layout(&self, arity: u32) -> Vec<(String, f64)> {
        match self {
            JunctionShape::Cross => [("east", 0.0), ("north", 90.0), ("west", 180.0), ("south", 270.0)]
                .into_iter()
                .map(|(label, angle)| (label.to_string(), angle))
                .collect(),
            // Two arms on one straight line, the third perpendicular to it
            JunctionShape::T => [("east", 0.0), ("west", 180.0), ("north", 90.0)]
                .into_iter()
                .map(|(label, angle)| (label.to_string(), angle))
                .collect(),
            JunctionShape::MultiWay => (0..arity)
                .map(|index| (format!("arm{index}"), 360.0 / arity as f64 * index as f64))
                .collect(),
        }
    }

    /// Number of approaches the shape requires, if it fixes one
    pub fn required_arity(&self) -> Option<u32> {
        match self {
            JunctionShape::Cross => Some(4),
            JunctionShape::T => Some(3),
            JunctionShape::MultiWay => None,
        }
    }
}

impl fmt::Display for JunctionShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JunctionShape::Cross => write!(f, "cross"),
            JunctionShape::T => write!(f, "T"),
            JunctionShape::MultiWay => write!(f, "multi-way"),
        }
    }
}

/// How right of way is decided at a junction node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JunctionControl {
    #[default]
    TrafficLight,
    Priority,
    RightBeforeLeft,
    Unregulated,
    AllwayStop,
}

impl JunctionControl {
    /// Node type name used by SUMO plain XML
    pub fn as_str(&self) -> &'static str {
        match self {
            JunctionControl::TrafficLight => "traffic_light",
            JunctionControl::Priority => "priority",
            JunctionControl::RightBeforeLeft => "right_before_left",
            JunctionControl::Unregulated => "unregulated",
            JunctionControl::AllwayStop => "allway_stop",
        }
    }
}

/// Lane, length and speed bound to one approach or edge class.
/// Lanes are always counted per direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AttributeSet {
    pub lanes: u32,
    /// Meters
    pub length: f64,
    /// Meters per second
    pub speed: f64,
}

/// Default lanes per direction
pub const DEFAULT_LANES: u32 = 1;

/// Default segment length in meters
pub const DEFAULT_LENGTH: f64 = 100.0;

/// Default speed limit in m/s (50 km/h)
pub const DEFAULT_SPEED: f64 = 13.9;

/// Coordinates are snapped to 1 / COORDINATE_RESOLUTION meters
pub const COORDINATE_RESOLUTION: f64 = 1_000_000.0;
