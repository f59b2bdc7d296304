//! The stages of the standard dashboard workflow.

use std::borrow::Cow;

use chrono::Utc;
use uuid::Uuid;

use super::result::PipelineResult;
use super::stage::{Finalizer, Stage, StageContext, StageError};
use super::state::{PipelineState, StateUpdate};
use crate::characteristics::CharacteristicsAnalyzer;
use crate::dataset::DataRepresentation;
use crate::insights::{self, DataSummary};
use crate::layout::LayoutConfig;
use crate::recommend::{ChartMaterializer, RecommendationEngine};
use crate::request::GenerationRequest;
use crate::synthesis::{
    Artifact, ArtifactOrigin, ArtifactVerifier, SynthesisInput, VerificationReport, template,
};

type StageResult = Result<StateUpdate, StageError>;

/// Stages in execution order.
pub(crate) fn standard() -> Vec<Box<dyn Stage>> {
    vec![
        Box::new(Initialize),
        Box::new(LoadDataRepresentation),
        Box::new(AnalyzeRequirements),
        Box::new(BuildLayout),
        Box::new(BuildChartSpecs),
        Box::new(SummarizeInsights),
        Box::new(LlmAugmentedInsights),
        Box::new(SynthesizeArtifact),
        Box::new(VerifyArtifact),
    ]
}

fn dashboard_title(request: &GenerationRequest) -> String {
    format!("{} Dashboard", request.dashboard_type.title())
}

/// Inputs for rendering, taken from the state or rebuilt when an upstream
/// stage failed to provide them.
struct RenderParts<'s> {
    title: String,
    summary: Cow<'s, DataSummary>,
    data: Cow<'s, DataRepresentation>,
    layout: Cow<'s, LayoutConfig>,
}

impl<'s> RenderParts<'s> {
    fn gather(ctx: &StageContext<'_>, state: &'s PipelineState) -> Self {
        let summary = match (&state.data_summary, &state.profile) {
            (Some(summary), _) => Cow::Borrowed(summary),
            (None, Some(profile)) => Cow::Owned(DataSummary::from_profile(profile)),
            (None, None) => Cow::Owned(DataSummary::from_profile(
                &CharacteristicsAnalyzer::new().analyze(ctx.dataset),
            )),
        };
        let data = match &state.data_representation {
            Some(data) => Cow::Borrowed(data),
            None => Cow::Owned(DataRepresentation::from_dataset(
                ctx.dataset,
                ctx.config.sample_rows,
            )),
        };
        let layout = match &state.layout {
            Some(layout) => Cow::Borrowed(layout),
            None => Cow::Owned(LayoutConfig::for_dashboard(ctx.request.dashboard_type)),
        };

        Self {
            title: dashboard_title(ctx.request),
            summary,
            data,
            layout,
        }
    }

    fn input<'a>(&'a self, ctx: &StageContext<'a>, state: &'a PipelineState) -> SynthesisInput<'a> {
        SynthesisInput {
            title: &self.title,
            request: ctx.request,
            summary: &self.summary,
            data: &self.data,
            layout: &self.layout,
            charts: &state.chart_specifications,
            insights: &state.insights,
            library: ctx.config.chart_library,
        }
    }
}

/// Result of verifying an artifact, with at most one template substitution.
struct Verified {
    artifact: Artifact,
    report: VerificationReport,
    issues: Vec<String>,
    warnings: Vec<String>,
}

/// Verify `artifact`; if a synthesized artifact fails, substitute the template
/// output and verify that once. The second report is final.
fn verify_with_fallback(
    ctx: &StageContext<'_>,
    input: &SynthesisInput<'_>,
    artifact: Artifact,
) -> Result<Verified, StageError> {
    let verifier = ArtifactVerifier::new(ctx.config.chart_library);
    let ids = input.container_ids();
    let report = verifier.verify(&artifact.code, artifact.kind, &ids);

    if report.passed() || artifact.origin == ArtifactOrigin::Template {
        return Ok(Verified {
            issues: report.critical_issues.clone(),
            artifact,
            report,
            warnings: Vec::new(),
        });
    }

    tracing::warn!(
        issues = report.critical_issues.len(),
        "synthesized artifact failed verification; substituting template output"
    );
    let mut issues: Vec<String> = report
        .critical_issues
        .iter()
        .map(|issue| format!("synthesized artifact: {issue}"))
        .collect();
    let fallback = template::render(input)?;
    let report = verifier.verify(&fallback.code, fallback.kind, &ids);
    issues.extend(report.critical_issues.iter().cloned());

    Ok(Verified {
        artifact: fallback,
        report,
        issues,
        warnings: vec![
            "Synthesized artifact failed verification; substituted the template renderer's output"
                .to_string(),
        ],
    })
}

// ============================================================================
// Stages
// ============================================================================

pub struct Initialize;

impl Stage for Initialize {
    fn name(&self) -> &str {
        "initialize"
    }

    fn run(&self, _ctx: &StageContext<'_>, _state: &PipelineState) -> StageResult {
        Ok(StateUpdate {
            session_id: Some(Uuid::new_v4().simple().to_string()),
            ..Default::default()
        })
    }
}

pub struct LoadDataRepresentation;

impl Stage for LoadDataRepresentation {
    fn name(&self) -> &str {
        "load-data-representation"
    }

    fn run(&self, ctx: &StageContext<'_>, _state: &PipelineState) -> StageResult {
        Ok(StateUpdate {
            data_representation: Some(DataRepresentation::from_dataset(
                ctx.dataset,
                ctx.config.sample_rows,
            )),
            ..Default::default()
        })
    }
}

/// Profiles the dataset.
pub struct AnalyzeRequirements;

impl Stage for AnalyzeRequirements {
    fn name(&self) -> &str {
        "analyze-requirements"
    }

    fn run(&self, ctx: &StageContext<'_>, _state: &PipelineState) -> StageResult {
        let profile = CharacteristicsAnalyzer::new().analyze(ctx.dataset);
        let summary = DataSummary::from_profile(&profile);
        Ok(StateUpdate {
            profile: Some(profile),
            data_summary: Some(summary),
            ..Default::default()
        })
    }
}

pub struct BuildLayout;

impl Stage for BuildLayout {
    fn name(&self) -> &str {
        "build-layout"
    }

    fn run(&self, ctx: &StageContext<'_>, _state: &PipelineState) -> StageResult {
        Ok(StateUpdate {
            layout: Some(LayoutConfig::for_dashboard(ctx.request.dashboard_type)),
            ..Default::default()
        })
    }
}

/// Recommends, ranks and materializes charts.
pub struct BuildChartSpecs;

impl Stage for BuildChartSpecs {
    fn name(&self) -> &str {
        "build-chart-specs"
    }

    fn run(&self, ctx: &StageContext<'_>, state: &PipelineState) -> StageResult {
        let profile = state
            .profile
            .as_ref()
            .ok_or(StageError::MissingInput("characteristics profile"))?;
        let cap = ctx.config.max_recommendations.min(ctx.request.max_charts);
        let specs = RecommendationEngine::with_max_recommendations(cap).recommend(
            profile,
            ctx.request.chart_purpose,
            &ctx.request.target_audience,
        );
        let materialized =
            ChartMaterializer::new(ctx.config.scatter_point_limit).materialize(&specs, ctx.dataset);

        Ok(StateUpdate {
            chart_specifications: materialized.charts,
            error_messages: materialized.errors,
            ..Default::default()
        })
    }
}

pub struct SummarizeInsights;

impl Stage for SummarizeInsights {
    fn name(&self) -> &str {
        "summarize-insights"
    }

    fn run(&self, ctx: &StageContext<'_>, state: &PipelineState) -> StageResult {
        let profile = state
            .profile
            .as_ref()
            .ok_or(StageError::MissingInput("characteristics profile"))?;
        Ok(StateUpdate {
            insights: insights::summarize(
                profile,
                ctx.request.dashboard_type,
                &state.chart_specifications,
            ),
            ..Default::default()
        })
    }
}

/// Asks the provider for extra bullets. A no-op without a provider.
pub struct LlmAugmentedInsights;

impl Stage for LlmAugmentedInsights {
    fn name(&self) -> &str {
        "llm-augmented-insights"
    }

    fn run(&self, ctx: &StageContext<'_>, state: &PipelineState) -> StageResult {
        let Some(llm) = ctx.llm else {
            return Ok(StateUpdate::default());
        };
        if state.capability_failure.is_some() {
            return Ok(StateUpdate::default());
        }
        let summary = state
            .data_summary
            .as_ref()
            .ok_or(StageError::MissingInput("data summary"))?;

        match llm.suggest_insights(summary, ctx.request) {
            Ok(extra) => Ok(StateUpdate {
                insights: extra,
                ..Default::default()
            }),
            Err(err) if err.is_capability_failure() => {
                tracing::warn!(provider = llm.name(), error = %err, "insight augmentation unavailable");
                Ok(StateUpdate {
                    capability_failure: Some(err.to_string()),
                    ..Default::default()
                }
                .warning(format!("Insight augmentation unavailable: {err}")))
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Requests an artifact from the provider, or renders the template.
pub struct SynthesizeArtifact;

impl Stage for SynthesizeArtifact {
    fn name(&self) -> &str {
        "synthesize-artifact"
    }

    fn run(&self, ctx: &StageContext<'_>, state: &PipelineState) -> StageResult {
        let parts = RenderParts::gather(ctx, state);
        let input = parts.input(ctx, state);
        let mut update = StateUpdate::default();

        let synthesized = match (ctx.llm, &state.capability_failure) {
            (None, _) => {
                update.warnings.push(
                    "No code-generation capability configured; rendered with the template generator"
                        .to_string(),
                );
                None
            }
            (Some(_), Some(reason)) => {
                update.warnings.push(format!(
                    "Code generation skipped after an earlier capability failure ({reason}); \
                     rendered with the template generator"
                ));
                None
            }
            (Some(llm), None) => match llm.generate_artifact(&input) {
                Ok(artifact) => {
                    tracing::debug!(provider = llm.name(), kind = %artifact.kind, "artifact synthesized");
                    Some(artifact)
                }
                Err(err) => {
                    tracing::warn!(provider = llm.name(), error = %err, "synthesis failed; using template");
                    if err.is_capability_failure() {
                        update.capability_failure = Some(err.to_string());
                    }
                    update.warnings.push(format!(
                        "Code generation unavailable ({err}); rendered with the template generator"
                    ));
                    None
                }
            },
        };

        let artifact = match synthesized {
            Some(artifact) => artifact,
            None => template::render(&input)?,
        };
        update.artifact = Some(artifact);
        Ok(update)
    }
}

/// Verifies the artifact, substituting the template once on failure.
pub struct VerifyArtifact;

impl Stage for VerifyArtifact {
    fn name(&self) -> &str {
        "verify-artifact"
    }

    fn run(&self, ctx: &StageContext<'_>, state: &PipelineState) -> StageResult {
        let artifact = state
            .artifact
            .clone()
            .ok_or(StageError::MissingInput("artifact"))?;
        let parts = RenderParts::gather(ctx, state);
        let input = parts.input(ctx, state);
        let verified = verify_with_fallback(ctx, &input, artifact)?;

        let mut update = StateUpdate {
            verification_issues: verified.issues,
            warnings: verified.warnings,
            ..Default::default()
        };
        let mut report = verified.report;

        let reviewer = ctx
            .llm
            .filter(|llm| ctx.config.semantic_review && llm.config().review_artifacts);
        if let (Some(llm), None) = (reviewer, &state.capability_failure) {
            match llm.review_artifact(&verified.artifact, &input.container_ids()) {
                Ok(review) => report = report.with_review(review),
                Err(err) => {
                    tracing::debug!(provider = llm.name(), error = %err, "semantic review skipped");
                    update.diagnostics.push(format!("semantic review skipped: {err}"));
                }
            }
        }

        tracing::debug!(status = %report.overall_status, "artifact verified");
        update.artifact = Some(verified.artifact);
        update.verification = Some(report);
        Ok(update)
    }
}

// ============================================================================
// Finalize
// ============================================================================

/// Concatenates the state into a [`PipelineResult`].
///
/// Missing artifacts or reports are filled in from the template renderer; a
/// template that fails verification is the one fatal outcome.
pub struct DefaultFinalizer;

impl Finalizer for DefaultFinalizer {
    fn finalize(
        &self,
        ctx: &StageContext<'_>,
        state: &PipelineState,
    ) -> Result<PipelineResult, StageError> {
        let parts = RenderParts::gather(ctx, state);
        let input = parts.input(ctx, state);
        let mut warnings = state.warnings.clone();
        let mut issues = state.verification_issues.clone();

        let (artifact, report) = match (&state.artifact, &state.verification) {
            (Some(artifact), Some(report))
                if report.passed() || artifact.origin == ArtifactOrigin::Template =>
            {
                (artifact.clone(), report.clone())
            }
            (artifact, _) => {
                let artifact = match artifact {
                    Some(artifact) => artifact.clone(),
                    None => {
                        warnings.push("No artifact reached finalize; rendered with the template generator".to_string());
                        template::render(&input)?
                    }
                };
                let verified = verify_with_fallback(ctx, &input, artifact)?;
                warnings.extend(verified.warnings);
                issues.extend(verified.issues);
                (verified.artifact, verified.report)
            }
        };

        if !report.passed() {
            return Err(StageError::Failed(format!(
                "template output failed verification: {}",
                report.critical_issues.join("; ")
            )));
        }

        let session_id = state
            .session_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().simple().to_string());
        tracing::info!(
            session_id = %session_id,
            charts = state.chart_specifications.len(),
            status = %report.overall_status,
            origin = ?artifact.origin,
            errors = state.error_messages.len(),
            "dashboard generated"
        );

        Ok(PipelineResult {
            success: true,
            session_id,
            artifact_kind: artifact.kind,
            artifact_origin: Some(artifact.origin),
            artifact: artifact.code,
            chart_specifications: state.chart_specifications.clone(),
            insights: state.insights.clone(),
            layout: Some(parts.layout.into_owned()),
            verification_report: Some(report),
            verification_issues: issues,
            error_messages: state.error_messages.clone(),
            warnings,
            diagnostics: state.diagnostics.clone(),
            generation_timestamp: Utc::now(),
        })
    }
}
