//! SUMO plain XML export
//!
//! Produces the three files `netconvert` reads: `.nod.xml`, `.edg.xml` and
//! `.con.xml`. Connections are listed lane by lane, every lane of the
//! incoming edge to every lane of the outgoing one.

use anyhow::{Context, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use super::{Artifact, NetworkRenderer};
use crate::generation::{NetworkModel, NodeId};

#[derive(Debug, Clone, Copy, Default)]
pub struct PlainXmlExporter;

impl PlainXmlExporter {
    pub fn nodes_xml(&self, model: &NetworkModel) -> Result<String> {
        let mut doc = XmlDocument::new("nodes")?;
        for node in model.nodes() {
            let mut element = BytesStart::new("node");
            element.push_attribute(("id", node.label.as_str()));
            element.push_attribute(("x", format!("{:.2}", node.position.x).as_str()));
            element.push_attribute(("y", format!("{:.2}", node.position.y).as_str()));
            element.push_attribute(("type", node.control.as_str()));
            doc.empty(element)?;
        }
        doc.finish()
    }

    pub fn edges_xml(&self, model: &NetworkModel) -> Result<String> {
        let mut doc = XmlDocument::new("edges")?;
        for edge in model.edges() {
            let mut element = BytesStart::new("edge");
            element.push_attribute(("id", edge.label.as_str()));
            element.push_attribute(("from", node_label(model, edge.from)?));
            element.push_attribute(("to", node_label(model, edge.to)?));
            element.push_attribute(("numLanes", edge.lanes.to_string().as_str()));
            element.push_attribute(("speed", format!("{:.2}", edge.speed).as_str()));
            element.push_attribute(("length", format!("{:.2}", edge.length).as_str()));
            doc.empty(element)?;
        }
        doc.finish()
    }

    pub fn connections_xml(&self, model: &NetworkModel) -> Result<String> {
        let mut doc = XmlDocument::new("connections")?;
        for connection in model.connections() {
            let (Some(from), Some(to)) = (model.edge(connection.from_edge), model.edge(connection.to_edge))
            else {
                continue;
            };
            for from_lane in 0..from.lanes {
                for to_lane in 0..to.lanes {
                    let mut element = BytesStart::new("connection");
                    element.push_attribute(("from", from.label.as_str()));
                    element.push_attribute(("to", to.label.as_str()));
                    element.push_attribute(("fromLane", from_lane.to_string().as_str()));
                    element.push_attribute(("toLane", to_lane.to_string().as_str()));
                    doc.empty(element)?;
                }
            }
        }
        doc.finish()
    }
}

impl NetworkRenderer for PlainXmlExporter {
    fn render(&self, model: &NetworkModel) -> Result<Vec<Artifact>> {
        Ok(vec![
            Artifact::new("nod.xml", self.nodes_xml(model)?),
            Artifact::new("edg.xml", self.edges_xml(model)?),
            Artifact::new("con.xml", self.connections_xml(model)?),
        ])
    }
}

fn node_label(model: &NetworkModel, id: NodeId) -> Result<&str> {
    model
        .node(id)
        .map(|node| node.label.as_str())
        .with_context(|| format!("Edge refers to missing node {}", id.0))
}

/// An indented document with a single root element
struct XmlDocument {
    writer: Writer<Vec<u8>>,
    root: &'static str,
}

impl XmlDocument {
    fn new(root: &'static str) -> Result<Self> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        writer.write_event(Event::Start(BytesStart::new(root)))?;
        Ok(Self { writer, root })
    }

    fn empty(&mut self, element: BytesStart<'_>) -> Result<()> {
        self.writer.write_event(Event::Empty(element))?;
        Ok(())
    }

    fn finish(mut self) -> Result<String> {
        self.writer.write_event(Event::End(BytesEnd::new(self.root)))?;
        let mut xml = String::from_utf8(self.writer.into_inner()).context("XML output is not UTF-8")?;
        xml.push('\n');
        Ok(xml)
    }
}
