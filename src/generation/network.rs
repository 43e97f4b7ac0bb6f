//! Generated road network graph
//!
//! A `NetworkModel` is assembled once by a `NetworkBuilder`, checked, and then
//! only read. Nothing in its public API mutates it.

use log::debug;
use ordered_float::OrderedFloat;
use petgraph::algo::{astar, connected_components};
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;
use std::collections::HashSet;

use super::error::{GenerationError, Result};
use super::types::{AttributeSet, EdgeId, JunctionControl, NodeId, Position};

/// A junction or dead end of the network
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: NodeId,
    /// Stable name used by exporters, e.g. `C`, `N2`, `r1c0`
    pub label: String,
    pub position: Position,
    pub control: JunctionControl,
}

/// A directed road segment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub id: EdgeId,
    pub label: String,
    pub from: NodeId,
    pub to: NodeId,
    /// Lanes in this edge's direction
    pub lanes: u32,
    /// Meters
    pub length: f64,
    /// Meters per second
    pub speed: f64,
}

/// A permitted movement from one edge onto the next at their shared node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Connection {
    pub from_edge: EdgeId,
    pub to_edge: EdgeId,
}

/// Immutable node/edge graph ready for export or rendering
#[derive(Debug, Clone)]
pub struct NetworkModel {
    /// Node and edge indices coincide with `NodeId` / `EdgeId` since nothing is ever removed
    graph: DiGraph<Node, Edge>,

    /// One-way networks are exempt from the reverse-edge invariant
    one_way: bool,
}

impl PartialEq for NetworkModel {
    fn eq(&self, other: &Self) -> bool {
        self.one_way == other.one_way
            && self.nodes().eq(other.nodes())
            && self.edges().eq(other.edges())
    }
}

impl NetworkModel {
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.graph.edge_weights()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.graph.node_weight(NodeIndex::new(id.0))
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.graph.edge_weight(EdgeIndex::new(id.0))
    }

    /// Looks a node up by its exporter label
    pub fn node_by_label(&self, label: &str) -> Option<&Node> {
        self.nodes().find(|node| node.label == label)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_one_way(&self) -> bool {
        self.one_way
    }

    /// Finds the edge running from `from` to `to`
    pub fn find_edge_between(&self, from: NodeId, to: NodeId) -> Option<&Edge> {
        self.graph
            .find_edge(NodeIndex::new(from.0), NodeIndex::new(to.0))
            .and_then(|index| self.graph.edge_weight(index))
    }

    /// Edges leaving a node
    pub fn outgoing(&self, node: NodeId) -> impl Iterator<Item = &Edge> {
        self.graph
            .edges_directed(NodeIndex::new(node.0), Direction::Outgoing)
            .map(|edge| edge.weight())
    }

    /// Edges arriving at a node
    pub fn incoming(&self, node: NodeId) -> impl Iterator<Item = &Edge> {
        self.graph
            .edges_directed(NodeIndex::new(node.0), Direction::Incoming)
            .map(|edge| edge.weight())
    }

    /// Number of distinct nodes adjacent to `node`, ignoring direction
    pub fn degree(&self, node: NodeId) -> usize {
        let index = NodeIndex::new(node.0);
        self.graph
            .neighbors_undirected(index)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Turning movements at every node: each incoming edge may continue onto
    /// every outgoing edge except the one leading straight back.
    pub fn connections(&self) -> Vec<Connection> {
        let mut connections = Vec::new();
        for node in self.graph.node_indices() {
            for incoming in self.graph.edges_directed(node, Direction::Incoming) {
                for outgoing in self.graph.edges_directed(node, Direction::Outgoing) {
                    if outgoing.target() == incoming.source() {
                        continue;
                    }
                    connections.push(Connection {
                        from_edge: incoming.weight().id,
                        to_edge: outgoing.weight().id,
                    });
                }
            }
        }
        connections
    }

    /// Shortest path by length, returning the total length and the visited
    /// nodes including both ends
    pub fn shortest_path(&self, start: NodeId, end: NodeId) -> Option<(f64, Vec<NodeId>)> {
        self.node(start)?;
        self.node(end)?;
        let goal = NodeIndex::new(end.0);

        let (cost, path) = astar(
            &self.graph,
            NodeIndex::new(start.0),
            |node| node == goal,
            |edge| edge.weight().length,
            |_| 0.0, // Null heuristic = Dijkstra
        )?;

        Some((cost, path.into_iter().map(|index| NodeId(index.index())).collect()))
    }

    /// Bounding box as (min, max) corners
    pub fn bounds(&self) -> Option<(Position, Position)> {
        let mut nodes = self.nodes();
        let first = nodes.next()?.position;
        let (mut min, mut max) = (first, first);
        for node in nodes {
            min.x = min.x.min(node.position.x);
            min.y = min.y.min(node.position.y);
            max.x = max.x.max(node.position.x);
            max.y = max.y.max(node.position.y);
        }
        Some((min, max))
    }

    /// Flat copy of the model for serializers
    pub fn snapshot(&self) -> NetworkSnapshot<'_> {
        NetworkSnapshot {
            one_way: self.one_way,
            nodes: self.nodes().collect(),
            edges: self.edges().collect(),
        }
    }
}

/// Serializable view of a model
#[derive(Debug, Serialize)]
pub struct NetworkSnapshot<'a> {
    pub one_way: bool,
    pub nodes: Vec<&'a Node>,
    pub edges: Vec<&'a Edge>,
}

/// Assembles a `NetworkModel` and checks its invariants when finished
#[derive(Default)]
pub struct NetworkBuilder {
    graph: DiGraph<Node, Edge>,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node to the network graph
    pub fn add_node(
        &mut self,
        label: impl Into<String>,
        position: Position,
        control: JunctionControl,
    ) -> NodeId {
        let id = NodeId(self.graph.node_count());
        let index = self.graph.add_node(Node {
            id,
            label: label.into(),
            position,
            control,
        });
        debug_assert_eq!(index.index(), id.0);
        id
    }

    /// Adds a directed edge. The label is derived from the endpoint labels.
    pub fn add_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        attributes: &AttributeSet,
        length: f64,
    ) -> Result<EdgeId> {
        let from_label = self.label_of(from)?;
        let to_label = self.label_of(to)?;
        let id = EdgeId(self.graph.edge_count());
        let index = self.graph.add_edge(
            NodeIndex::new(from.0),
            NodeIndex::new(to.0),
            Edge {
                id,
                label: format!("{from_label}_{to_label}"),
                from,
                to,
                lanes: attributes.lanes,
                length,
                speed: attributes.speed,
            },
        );
        debug_assert_eq!(index.index(), id.0);
        Ok(id)
    }

    /// Adds a two-way road (creates two directed edges)
    pub fn add_two_way(
        &mut self,
        a: NodeId,
        b: NodeId,
        attributes: &AttributeSet,
        length: f64,
    ) -> Result<(EdgeId, EdgeId)> {
        let forward = self.add_edge(a, b, attributes, length)?;
        let backward = self.add_edge(b, a, attributes, length)?;
        Ok((forward, backward))
    }

    fn label_of(&self, id: NodeId) -> Result<String> {
        self.graph
            .node_weight(NodeIndex::new(id.0))
            .map(|node| node.label.clone())
            .ok_or_else(|| GenerationError::invalid_topology("node", id.0, "edge endpoints must exist"))
    }

    /// Validates the graph and freezes it
    pub fn finish(self, one_way: bool) -> Result<NetworkModel> {
        let graph = self.graph;

        let mut seen = HashSet::new();
        for node in graph.node_weights() {
            let key = (OrderedFloat(node.position.x), OrderedFloat(node.position.y));
            if !seen.insert(key) {
                return Err(GenerationError::invalid_topology(
                    "position",
                    format!("({}, {}) at node {}", node.position.x, node.position.y, node.label),
                    "node coordinates must be unique",
                ));
            }
        }

        for edge in graph.edge_references() {
            let data = edge.weight();
            if data.lanes == 0 {
                return Err(GenerationError::malformed(
                    format!("lanes of edge {}", data.label),
                    data.lanes,
                    "a positive lane count",
                ));
            }
            if !data.length.is_finite() || data.length <= 0.0 {
                return Err(GenerationError::malformed(
                    format!("length of edge {}", data.label),
                    data.length,
                    "a finite length above 0 meters",
                ));
            }
            if !one_way && graph.find_edge(edge.target(), edge.source()).is_none() {
                return Err(GenerationError::invalid_topology(
                    "edge",
                    &data.label,
                    "every edge of a two-way network needs a reverse counterpart",
                ));
            }
        }

        if graph.node_count() > 1 && connected_components(&graph) != 1 {
            return Err(GenerationError::invalid_topology(
                "network",
                format!("{} components", connected_components(&graph)),
                "all nodes must be connected",
            ));
        }

        debug!(
            "Network finished: {} nodes, {} edges, one_way={}",
            graph.node_count(),
            graph.edge_count(),
            one_way
        );

        Ok(NetworkModel { graph, one_way })
    }
}
