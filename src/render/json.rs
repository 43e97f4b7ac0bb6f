//! JSON export of the network snapshot

use anyhow::{Context, Result};

use super::{Artifact, NetworkRenderer};
use crate::generation::NetworkModel;

/// Pretty-printed JSON of the model's nodes and edges
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl NetworkRenderer for JsonExporter {
    fn render(&self, model: &NetworkModel) -> Result<Vec<Artifact>> {
        let json = serde_json::to_string_pretty(&model.snapshot()).context("Failed to serialize network")?;
        Ok(vec![Artifact::new("json", json)])
    }
}
