//! What a finished run hands back to the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::layout::LayoutConfig;
use crate::recommend::ChartSpecification;
use crate::synthesis::{ArtifactKind, ArtifactOrigin, VerificationReport};

/// Outcome of one dashboard generation.
///
/// When `success` is false the artifact is empty and `error_messages` says
/// why; callers must not render it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub success: bool,
    pub session_id: String,
    pub artifact: String,
    pub artifact_kind: ArtifactKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_origin: Option<ArtifactOrigin>,
    pub chart_specifications: Vec<ChartSpecification>,
    pub insights: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_report: Option<VerificationReport>,
    /// Critical issues seen across every verification attempt, including a
    /// synthesized artifact that was replaced.
    #[serde(default)]
    pub verification_issues: Vec<String>,
    pub error_messages: Vec<String>,
    pub warnings: Vec<String>,
    pub diagnostics: Vec<String>,
    pub generation_timestamp: DateTime<Utc>,
}

impl PipelineResult {
    /// A failed run carrying only its diagnostics.
    pub fn failure(session_id: impl Into<String>, error_messages: Vec<String>) -> Self {
        Self {
            success: false,
            session_id: session_id.into(),
            artifact: String::new(),
            artifact_kind: ArtifactKind::default(),
            artifact_origin: None,
            chart_specifications: Vec::new(),
            insights: Vec::new(),
            layout: None,
            verification_report: None,
            verification_issues: Vec::new(),
            error_messages,
            warnings: Vec::new(),
            diagnostics: Vec::new(),
            generation_timestamp: Utc::now(),
        }
    }
}
