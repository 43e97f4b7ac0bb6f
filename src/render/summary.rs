//! Plain text listing of nodes and edges

use anyhow::Result;
use std::fmt::Write;

use super::{Artifact, NetworkRenderer};
use crate::generation::{NetworkModel, NodeId};

#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryRenderer;

impl SummaryRenderer {
    pub fn summarize(&self, model: &NetworkModel) -> Result<String> {
        let label = |id: NodeId| model.node(id).map_or("?", |node| node.label.as_str());

        let mut out = String::new();
        writeln!(out, "=== Road Network Summary ===")?;
        writeln!(
            out,
            "Nodes: {}, Edges: {}, Connections: {}",
            model.node_count(),
            model.edge_count(),
            model.connections().len()
        )?;
        writeln!(out, "One-way: {}", if model.is_one_way() { "yes" } else { "no" })?;
        if let Some((min, max)) = model.bounds() {
            writeln!(
                out,
                "Extent: ({:.1}, {:.1}) to ({:.1}, {:.1})",
                min.x, min.y, max.x, max.y
            )?;
        }
        writeln!(out)?;

        writeln!(out, "--- Nodes ---")?;
        for node in model.nodes() {
            writeln!(
                out,
                "  {}: position=({:.1}, {:.1}), control={}, degree={}",
                node.label,
                node.position.x,
                node.position.y,
                node.control.as_str(),
                model.degree(node.id)
            )?;
        }

        writeln!(out, "--- Edges ---")?;
        for edge in model.edges() {
            writeln!(
                out,
                "  {}: {} -> {}, lanes={}, length={:.1}m, speed={:.1}m/s",
                edge.label,
                label(edge.from),
                label(edge.to),
                edge.lanes,
                edge.length,
                edge.speed
            )?;
        }

        Ok(out)
    }
}

impl NetworkRenderer for SummaryRenderer {
    fn render(&self, model: &NetworkModel) -> Result<Vec<Artifact>> {
        Ok(vec![Artifact::new("summary.txt", self.summarize(model)?)])
    }
}
