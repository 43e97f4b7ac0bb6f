//! Renderers and exporters
//!
//! Everything that consumes a finished `NetworkModel` goes through
//! `NetworkRenderer`, so new output formats never touch generation.

mod ascii;
mod json;
mod plain_xml;
mod summary;

use anyhow::{Context, Result};
use clap::ValueEnum;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::generation::NetworkModel;

pub use ascii::AsciiRenderer;
pub use json::JsonExporter;
pub use plain_xml::PlainXmlExporter;
pub use summary::SummaryRenderer;

/// One rendered output. Written as `<stem>.<suffix>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub suffix: String,
    pub contents: String,
}

impl Artifact {
    pub fn new(suffix: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            contents: contents.into(),
        }
    }
}

pub trait NetworkRenderer {
    fn render(&self, model: &NetworkModel) -> Result<Vec<Artifact>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RenderMethod {
    /// Character map of the network
    Ascii,
    /// Node and edge listing
    #[default]
    Summary,
    /// SUMO plain XML (nodes, edges, connections)
    #[serde(alias = "plain_xml", alias = "sumo")]
    PlainXml,
    /// JSON dump of the model
    Json,
}

impl RenderMethod {
    pub fn renderer(self) -> Box<dyn NetworkRenderer> {
        match self {
            RenderMethod::Ascii => Box::new(AsciiRenderer::default()),
            RenderMethod::Summary => Box::new(SummaryRenderer),
            RenderMethod::PlainXml => Box::new(PlainXmlExporter),
            RenderMethod::Json => Box::new(JsonExporter),
        }
    }

    /// Terminal renderers print their output instead of writing files
    pub fn is_terminal(self) -> bool {
        matches!(self, RenderMethod::Ascii | RenderMethod::Summary)
    }
}

/// Writes every artifact into `dir`, creating it if needed, and returns the written paths
pub fn write_artifacts(dir: &Path, stem: &str, artifacts: &[Artifact]) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let path = dir.join(format!("{stem}.{}", artifact.suffix));
        std::fs::write(&path, &artifact.contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}
