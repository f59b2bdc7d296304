//! Main pipeline struct and public API.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::characteristics::{CharacteristicsAnalyzer, CharacteristicsProfile};
use crate::config::PipelineConfig;
use crate::dataset::Dataset;
use crate::error::{DashforgeError, Result};
use crate::input::{Parser, SourceMetadata};
use crate::llm::LlmProvider;
use crate::recommend::{ChartMaterializer, Materialized, RecommendationEngine};
use crate::request::GenerationRequest;
use crate::workflow::{PipelineResult, StageContext, Workflow};

/// The dashboard generation pipeline.
///
/// Cheap to clone; clones share the provider. A pipeline holds no per-run
/// state, so one instance may serve concurrent [`generate`](Self::generate)
/// calls.
#[derive(Clone)]
pub struct DashboardPipeline {
    config: PipelineConfig,
    workflow: Arc<Workflow>,
    llm_provider: Option<Arc<dyn LlmProvider>>,
}

impl DashboardPipeline {
    /// Create a pipeline with default configuration and no provider.
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    pub fn with_config(config: PipelineConfig) -> Self {
        Self {
            config,
            workflow: Arc::new(Workflow::standard()),
            llm_provider: None,
        }
    }

    /// Add a code-generation provider.
    ///
    /// With a provider configured the pipeline asks it for extra insights,
    /// the dashboard artifact and a semantic review. Any failure falls back to
    /// the template renderer.
    pub fn with_llm(mut self, provider: impl LlmProvider + 'static) -> Self {
        self.llm_provider = Some(Arc::new(provider));
        self
    }

    /// Share an already-wrapped provider.
    pub fn with_shared_llm(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.llm_provider = Some(provider);
        self
    }

    /// Replace the stage sequence.
    pub fn with_workflow(mut self, workflow: Workflow) -> Self {
        self.workflow = Arc::new(workflow);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Parse a CSV/TSV file into a typed dataset.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<(Dataset, SourceMetadata)> {
        let (table, source) = Parser::with_config(self.config.parser.clone()).parse_file(path)?;
        let dataset = Dataset::from_table(&table)?;
        tracing::debug!(
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            "dataset loaded"
        );
        Ok((dataset, source))
    }

    /// Profile a dataset.
    pub fn profile(&self, dataset: &Dataset) -> CharacteristicsProfile {
        CharacteristicsAnalyzer::new().analyze(dataset)
    }

    /// Recommend and materialize charts without building an artifact.
    pub fn recommend(&self, dataset: &Dataset, request: &GenerationRequest) -> Materialized {
        let profile = self.profile(dataset);
        let cap = self.config.max_recommendations.min(request.max_charts);
        let specs = RecommendationEngine::with_max_recommendations(cap).recommend(
            &profile,
            request.chart_purpose,
            &request.target_audience,
        );
        ChartMaterializer::new(self.config.scatter_point_limit).materialize(&specs, dataset)
    }

    /// Run the full workflow.
    ///
    /// Never fails as a whole: stage failures are reported inside the result,
    /// and `success` is false only when no verified artifact could be built.
    pub fn generate(&self, dataset: &Dataset, request: &GenerationRequest) -> PipelineResult {
        tracing::info!(
            dashboard_type = request.dashboard_type.as_str(),
            rows = dataset.row_count(),
            columns = dataset.column_count(),
            provider = self.llm_provider.as_ref().map(|p| p.name()).unwrap_or("none"),
            "generating dashboard"
        );
        let ctx = StageContext::new(dataset, request, &self.config)
            .with_llm(self.llm_provider.as_deref());
        let result = self.workflow.run(&ctx);

        tracing::info!(
            success = result.success,
            charts = result.chart_specifications.len(),
            errors = result.error_messages.len(),
            warnings = result.warnings.len(),
            "generation finished"
        );
        result
    }

    /// Parse `path` and run the full workflow on it.
    pub fn generate_file(
        &self,
        path: impl AsRef<Path>,
        request: &GenerationRequest,
    ) -> Result<PipelineResult> {
        let (dataset, _) = self.load(path)?;
        Ok(self.generate(&dataset, request))
    }

    /// Run [`generate`](Self::generate) on the blocking pool with a deadline.
    ///
    /// On expiry the caller gets [`DashforgeError::Timeout`]; the abandoned
    /// run finishes in the background and its result is dropped.
    pub async fn generate_with_timeout(
        &self,
        dataset: Arc<Dataset>,
        request: GenerationRequest,
        deadline: Duration,
    ) -> Result<PipelineResult> {
        let pipeline = self.clone();
        let task = tokio::task::spawn_blocking(move || pipeline.generate(&dataset, &request));

        match tokio::time::timeout(deadline, task).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(join)) => Err(DashforgeError::Workflow(format!(
                "generation task failed: {join}"
            ))),
            Err(_) => {
                tracing::warn!(?deadline, "dashboard generation timed out");
                Err(DashforgeError::Timeout(deadline))
            }
        }
    }
}

impl Default for DashboardPipeline {
    fn default() -> Self {
        Self::new()
    }
}
