//! Network generation core
//!
//! Turns a raw parameter draft into an immutable road network model. Nothing
//! in here performs I/O: parsing descriptions and rendering models happen in
//! the `parser` and `render` modules around it.

mod draft;
mod error;
mod network;
mod normalize;
mod pipeline;
mod reconcile;
mod topology;
mod types;

pub use draft::{AttributeField, LaneSpec, Override, Phrasing, RawDraft, SpeedUnit};
pub use error::{GenerationError, Result};
pub use network::{Connection, Edge, NetworkBuilder, NetworkModel, NetworkSnapshot, Node};
pub use normalize::{
    normalize_lanes, normalize_lanes_for, normalize_length, normalize_length_for, normalize_speed,
    normalize_speed_for, MIN_LENGTH,
};
pub use pipeline::Pipeline;
pub use reconcile::{
    reconcile, Approach, Defaults, GridSpec, JunctionSpec, NetworkSpec, RadialSpec,
};
pub use topology::{
    build, Topology, CENTER_LABEL, MAX_NODES, MIN_GRID_SIDE, MIN_JUNCTION_ARITY, MIN_RINGS,
    MIN_SPOKES,
};
pub use types::{
    AttributeSet, EdgeId, JunctionControl, JunctionShape, NetworkKind, NodeId, Position,
    COORDINATE_RESOLUTION, DEFAULT_LANES, DEFAULT_LENGTH, DEFAULT_SPEED,
};
