//! Generated dashboard artifacts and the inputs they are built from.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ChartLibrary;
use crate::dataset::DataRepresentation;
use crate::insights::DataSummary;
use crate::layout::LayoutConfig;
use crate::recommend::ChartSpecification;
use crate::request::GenerationRequest;

/// Shape of a generated artifact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// A standalone HTML document.
    #[default]
    Document,
    /// Component source with a default export.
    Component,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Document => "document",
            ArtifactKind::Component => "component",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who produced an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactOrigin {
    /// The code-generation capability.
    Synthesized,
    /// The deterministic template renderer.
    Template,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub code: String,
    pub origin: ArtifactOrigin,
}

impl Artifact {
    pub fn synthesized(kind: ArtifactKind, code: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            origin: ArtifactOrigin::Synthesized,
        }
    }

    pub fn template(kind: ArtifactKind, code: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            origin: ArtifactOrigin::Template,
        }
    }
}

/// Everything a renderer or provider needs to build a dashboard.
#[derive(Debug, Clone, Copy)]
pub struct SynthesisInput<'a> {
    pub title: &'a str,
    pub request: &'a GenerationRequest,
    pub summary: &'a DataSummary,
    pub data: &'a DataRepresentation,
    pub layout: &'a LayoutConfig,
    /// Materialized charts, in display order.
    pub charts: &'a [ChartSpecification],
    pub insights: &'a [String],
    pub library: ChartLibrary,
}

impl SynthesisInput<'_> {
    /// Container ids the artifact must render into.
    pub fn container_ids(&self) -> Vec<String> {
        self.charts.iter().filter_map(ChartSpecification::container_id).collect()
    }
}
