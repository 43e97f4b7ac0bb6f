//! Generation pipeline: reconcile, then build
//!
//! Strictly linear and fail-fast. The first error from any stage is returned
//! unchanged and no partial network ever escapes.

use anyhow::Context;
use log::info;

use super::draft::RawDraft;
use super::error::Result;
use super::network::NetworkModel;
use super::reconcile::{reconcile, Defaults, NetworkSpec};
use super::topology;
use super::types::NetworkKind;
use crate::parser::DescriptionParser;

/// Entry point shared by the CLI and any other caller.
/// Holds only read-only configuration, so one pipeline can serve many threads.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    defaults: Defaults,
    /// Applied to parsed descriptions that name no network kind
    fallback_kind: Option<NetworkKind>,
}

impl Pipeline {
    pub fn new(defaults: Defaults) -> Self {
        Self {
            defaults,
            fallback_kind: None,
        }
    }

    pub fn with_fallback_kind(mut self, kind: Option<NetworkKind>) -> Self {
        self.fallback_kind = kind;
        self
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    /// Reconciles a draft without building it
    pub fn reconcile(&self, draft: &RawDraft) -> Result<NetworkSpec> {
        reconcile(draft, &draft.overrides, &self.defaults)
    }

    /// Generates a network from a fully parsed draft
    pub fn generate(&self, draft: &RawDraft) -> Result<NetworkModel> {
        let spec = self.reconcile(draft)?;
        let model = topology::build(&spec)?;
        info!(
            "Generated {} network: {} nodes, {} edges",
            spec.kind(),
            model.node_count(),
            model.edge_count()
        );
        Ok(model)
    }

    /// Parses a description, filling in the configured kind when it names none
    pub fn parse_description(
        &self,
        parser: &dyn DescriptionParser,
        description: &str,
    ) -> anyhow::Result<RawDraft> {
        let mut draft = parser
            .parse(description)
            .with_context(|| format!("Failed to parse description {description:?}"))?;

        if draft.network_kind.is_none() {
            if let Some(kind) = self.fallback_kind {
                info!("Description names no network kind, using configured default {kind}");
                draft.network_kind = Some(kind);
            }
        }

        Ok(draft)
    }

    /// Parses a description and generates a network from it
    pub fn generate_from_description(
        &self,
        parser: &dyn DescriptionParser,
        description: &str,
    ) -> anyhow::Result<NetworkModel> {
        let draft = self.parse_description(parser, description)?;
        Ok(self.generate(&draft)?)
    }
}
