//! Topology builders
//!
//! One `Topology` implementation per network kind. Every coordinate is computed
//! straight from integer indices, never from a previously placed node, so the
//! same `NetworkSpec` always yields bit-identical positions.

use log::debug;
use std::f64::consts::PI;

use super::error::{GenerationError, Result};
use super::network::{NetworkBuilder, NetworkModel};
use super::reconcile::{GridSpec, JunctionSpec, NetworkSpec, RadialSpec};
use super::types::{AttributeSet, JunctionControl, NodeId, Position};

/// Fewest approaches a junction can have
pub const MIN_JUNCTION_ARITY: u32 = 3;

/// Fewest rows and columns a grid can have
pub const MIN_GRID_SIDE: u32 = 2;

/// Fewest spokes a radial network can have, so each ring is a polygon
pub const MIN_SPOKES: u32 = 3;

/// Fewest rings a radial network can have
pub const MIN_RINGS: u32 = 1;

/// Most nodes a generated network may have
pub const MAX_NODES: u64 = 100_000;

/// Label of the center node of junctions and radial networks
pub const CENTER_LABEL: &str = "C";

/// Builds a network model from a reconciled spec
pub trait Topology {
    fn build(&self) -> Result<NetworkModel>;
}

/// Dispatches on the spec's kind
pub fn build(spec: &NetworkSpec) -> Result<NetworkModel> {
    match spec {
        NetworkSpec::Junction(junction) => junction.build(),
        NetworkSpec::Grid(grid) => grid.build(),
        NetworkSpec::Radial(radial) => radial.build(),
    }
}

/// Rejects structural counts whose network would exceed `MAX_NODES`.
/// `nodes` is `None` when the count itself overflowed.
pub(crate) fn check_node_limit(field: &str, value: impl ToString, nodes: Option<u64>) -> Result<()> {
    match nodes {
        Some(nodes) if nodes <= MAX_NODES => Ok(()),
        _ => Err(GenerationError::invalid_topology(
            field,
            value,
            format!("the network would have more than {MAX_NODES} nodes"),
        )),
    }
}

impl Topology for JunctionSpec {
    fn build(&self) -> Result<NetworkModel> {
        if self.arity < MIN_JUNCTION_ARITY {
            return Err(GenerationError::invalid_topology(
                "arity",
                self.arity,
                format!("a junction needs at least {MIN_JUNCTION_ARITY} approaches"),
            ));
        }
        check_node_limit("arity", self.arity, u64::from(self.arity).checked_add(1))?;
        if self.approaches.len() != self.arity as usize {
            return Err(GenerationError::invalid_topology(
                "approaches",
                self.approaches.len(),
                format!("expected one approach per arm ({})", self.arity),
            ));
        }

        debug!("Building {} junction with {} approaches", self.shape, self.arity);

        let mut network = NetworkBuilder::new();
        let center = network.add_node(CENTER_LABEL, Position::new(0.0, 0.0), self.control);

        for (index, approach) in self.approaches.iter().enumerate() {
            let position = Position::polar(approach.attributes.length, approach.angle.to_radians());
            // Dead ends never need signal control
            let terminal = network.add_node(format!("N{index}"), position, JunctionControl::Priority);
            network.add_two_way(center, terminal, &approach.attributes, approach.attributes.length)?;
        }

        network.finish(false)
    }
}

impl Topology for GridSpec {
    fn build(&self) -> Result<NetworkModel> {
        for (field, value) in [("rows", self.rows), ("columns", self.columns)] {
            if value < MIN_GRID_SIDE {
                return Err(GenerationError::invalid_topology(
                    field,
                    value,
                    format!("a grid needs at least {MIN_GRID_SIDE} {field}"),
                ));
            }
        }

        let node_count = u64::from(self.rows).checked_mul(u64::from(self.columns));
        check_node_limit("rows", format!("{}x{}", self.rows, self.columns), node_count)?;

        debug!("Building {}x{} grid", self.rows, self.columns);

        let mut network = NetworkBuilder::new();
        let mut ids: Vec<NodeId> = Vec::with_capacity(node_count.unwrap_or_default() as usize);
        for row in 0..self.rows {
            for col in 0..self.columns {
                let position = Position::new(
                    col as f64 * self.horizontal.length,
                    row as f64 * self.vertical.length,
                );
                ids.push(network.add_node(format!("r{row}c{col}"), position, self.control));
            }
        }
        let at = |row: u32, col: u32| ids[row as usize * self.columns as usize + col as usize];

        // Connect grid horizontally
        for row in 0..self.rows {
            for col in 0..self.columns - 1 {
                self.connect(&mut network, at(row, col), at(row, col + 1), true)?;
            }
        }

        // Connect grid vertically
        for row in 0..self.rows - 1 {
            for col in 0..self.columns {
                self.connect(&mut network, at(row, col), at(row + 1, col), false)?;
            }
        }

        network.finish(self.one_way)
    }
}

impl GridSpec {
    /// One-way grids only run towards increasing column / row
    fn connect(&self, network: &mut NetworkBuilder, a: NodeId, b: NodeId, horizontal: bool) -> Result<()> {
        let attributes = if horizontal { &self.horizontal } else { &self.vertical };
        if self.one_way {
            network.add_edge(a, b, attributes, attributes.length)?;
        } else {
            network.add_two_way(a, b, attributes, attributes.length)?;
        }
        Ok(())
    }
}

impl Topology for RadialSpec {
    fn build(&self) -> Result<NetworkModel> {
        if self.ring_count < MIN_RINGS {
            return Err(GenerationError::invalid_topology(
                "ring_count",
                self.ring_count,
                format!("a radial network needs at least {MIN_RINGS} ring"),
            ));
        }
        if self.spoke_count < MIN_SPOKES {
            return Err(GenerationError::invalid_topology(
                "spoke_count",
                self.spoke_count,
                format!("each ring must be split evenly into at least {MIN_SPOKES} spoke sectors"),
            ));
        }

        let node_count = u64::from(self.ring_count)
            .checked_mul(u64::from(self.spoke_count))
            .and_then(|ring_nodes| ring_nodes.checked_add(1));
        check_node_limit(
            "ring_count",
            format!("{} rings of {} spokes", self.ring_count, self.spoke_count),
            node_count,
        )?;

        debug!(
            "Building radial network with {} rings and {} spokes",
            self.ring_count, self.spoke_count
        );

        let spacing = self.spoke.length;
        let sector = 2.0 * PI / self.spoke_count as f64;

        let mut network = NetworkBuilder::new();
        let center = network.add_node(CENTER_LABEL, Position::new(0.0, 0.0), self.control);

        // ring_nodes[r][s] is the node of ring r + 1 on spoke s
        let mut ring_nodes: Vec<Vec<NodeId>> = Vec::with_capacity(self.ring_count as usize);
        for ring in 1..=self.ring_count {
            let radius = ring as f64 * spacing;
            let nodes = (0..self.spoke_count)
                .map(|spoke| {
                    let position = Position::polar(radius, sector * spoke as f64);
                    network.add_node(format!("R{ring}S{spoke}"), position, self.control)
                })
                .collect();
            ring_nodes.push(nodes);
        }

        // Spokes, outward from the center
        let mut inner: Vec<NodeId> = vec![center; self.spoke_count as usize];
        for ring in &ring_nodes {
            for (from, to) in inner.iter().zip(ring) {
                self.connect(&mut network, *from, *to, &self.spoke, spacing)?;
            }
            inner = ring.clone();
        }

        // Rings, counter clockwise
        for (index, ring) in ring_nodes.iter().enumerate() {
            let radius = (index + 1) as f64 * spacing;
            let chord = 2.0 * radius * (sector / 2.0).sin();
            for spoke in 0..ring.len() {
                let next = (spoke + 1) % ring.len();
                self.connect(&mut network, ring[spoke], ring[next], &self.ring, chord)?;
            }
        }

        network.finish(self.one_way)
    }
}

impl RadialSpec {
    fn connect(
        &self,
        network: &mut NetworkBuilder,
        a: NodeId,
        b: NodeId,
        attributes: &AttributeSet,
        length: f64,
    ) -> Result<()> {
        if self.one_way {
            network.add_edge(a, b, attributes, length)?;
        } else {
            network.add_two_way(a, b, attributes, length)?;
        }
        Ok(())
    }
}
