//! Typed pipeline state and the partial updates stages return.

use crate::characteristics::CharacteristicsProfile;
use crate::dataset::DataRepresentation;
use crate::insights::DataSummary;
use crate::layout::LayoutConfig;
use crate::recommend::ChartSpecification;
use crate::synthesis::{Artifact, VerificationReport};

/// State threaded through one workflow run.
///
/// `Option` fields are replaced by the last stage that sets them. `Vec` fields
/// accumulate: each update appends after what earlier stages contributed.
#[derive(Debug, Clone, Default)]
pub struct PipelineState {
    pub session_id: Option<String>,
    pub data_representation: Option<DataRepresentation>,
    pub profile: Option<CharacteristicsProfile>,
    pub data_summary: Option<DataSummary>,
    pub layout: Option<LayoutConfig>,
    pub artifact: Option<Artifact>,
    pub verification: Option<VerificationReport>,
    /// Set once the code-generation capability has failed in this run.
    pub capability_failure: Option<String>,

    pub chart_specifications: Vec<ChartSpecification>,
    pub insights: Vec<String>,
    pub error_messages: Vec<String>,
    pub warnings: Vec<String>,
    pub diagnostics: Vec<String>,
    pub verification_issues: Vec<String>,
}

/// A stage's contribution. Fields left at their default are untouched.
#[derive(Debug, Clone, Default)]
pub struct StateUpdate {
    pub session_id: Option<String>,
    pub data_representation: Option<DataRepresentation>,
    pub profile: Option<CharacteristicsProfile>,
    pub data_summary: Option<DataSummary>,
    pub layout: Option<LayoutConfig>,
    pub artifact: Option<Artifact>,
    pub verification: Option<VerificationReport>,
    pub capability_failure: Option<String>,

    pub chart_specifications: Vec<ChartSpecification>,
    pub insights: Vec<String>,
    pub error_messages: Vec<String>,
    pub warnings: Vec<String>,
    pub diagnostics: Vec<String>,
    pub verification_issues: Vec<String>,
}

impl StateUpdate {
    /// True when the update sets no field at all.
    pub fn is_empty(&self) -> bool {
        self.session_id.is_none()
            && self.data_representation.is_none()
            && self.profile.is_none()
            && self.data_summary.is_none()
            && self.layout.is_none()
            && self.artifact.is_none()
            && self.verification.is_none()
            && self.capability_failure.is_none()
            && self.chart_specifications.is_empty()
            && self.insights.is_empty()
            && self.error_messages.is_empty()
            && self.warnings.is_empty()
            && self.diagnostics.is_empty()
            && self.verification_issues.is_empty()
    }

    pub fn warning(mut self, message: impl Into<String>) -> Self {
        self.warnings.push(message.into());
        self
    }
}

impl PipelineState {
    /// Merge an update: replace-fields are overwritten, accumulate-fields appended.
    pub fn apply(&mut self, update: StateUpdate) {
        fn replace<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }

        replace(&mut self.session_id, update.session_id);
        replace(&mut self.data_representation, update.data_representation);
        replace(&mut self.profile, update.profile);
        replace(&mut self.data_summary, update.data_summary);
        replace(&mut self.layout, update.layout);
        replace(&mut self.artifact, update.artifact);
        replace(&mut self.verification, update.verification);
        replace(&mut self.capability_failure, update.capability_failure);

        self.chart_specifications.extend(update.chart_specifications);
        self.insights.extend(update.insights);
        self.error_messages.extend(update.error_messages);
        self.warnings.extend(update.warnings);
        self.diagnostics.extend(update.diagnostics);
        self.verification_issues.extend(update.verification_issues);
    }
}
