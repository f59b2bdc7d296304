//! LLM provider trait and types.

use std::time::Duration;

use crate::error::{DashforgeError, Result};
use crate::insights::DataSummary;
use crate::request::GenerationRequest;
use crate::synthesis::{Artifact, SemanticReview, SynthesisInput};

use super::{decode, prompts};

/// Token budget for artifact generation; dashboards are long.
const ARTIFACT_MAX_TOKENS: usize = 8192;

/// One prompt sent to a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System prompt framing the conversation.
    pub system: String,
    /// The user turn.
    pub prompt: String,
    /// Overrides [`LlmConfig::max_tokens`] for this request.
    pub max_tokens: Option<usize>,
}

impl CompletionRequest {
    /// Request with the default system prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system: prompts::system_prompt().to_string(),
            prompt: prompt.into(),
            max_tokens: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Token limit after applying the provider default.
    pub fn token_limit(&self, config: &LlmConfig) -> usize {
        self.max_tokens.unwrap_or(config.max_tokens)
    }
}

/// Configuration for LLM providers.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Model to use (e.g., "claude-sonnet-4-20250514").
    pub model: String,

    /// Maximum tokens in response.
    pub max_tokens: usize,

    /// Temperature for generation (0.0-1.0).
    pub temperature: f64,

    /// Per-request deadline for the HTTP call.
    pub timeout: Duration,

    /// Whether to ask for dashboard artifacts.
    pub synthesize_artifacts: bool,

    /// Whether to ask for extra insight bullets.
    pub augment_insights: bool,

    /// Whether to ask for a semantic review of artifacts.
    pub review_artifacts: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 1024,
            temperature: 0.3,
            timeout: Duration::from_secs(60),
            synthesize_artifacts: true,
            augment_insights: true,
            review_artifacts: true,
        }
    }
}

/// Trait for LLM providers.
///
/// Implementations only supply the transport in [`LlmProvider::complete`];
/// prompting and strict decoding are shared. Implementations must be
/// thread-safe (Send + Sync) so one provider can serve concurrent runs.
pub trait LlmProvider: Send + Sync {
    /// Send one prompt and return the raw text answer.
    ///
    /// Unreachable backends and deadlines must surface as
    /// [`DashforgeError::LlmUnavailable`] or [`DashforgeError::Timeout`].
    fn complete(&self, request: &CompletionRequest) -> Result<String>;

    /// Get the configuration for this provider.
    fn config(&self) -> &LlmConfig;

    /// Short provider name for logs.
    fn name(&self) -> &'static str;

    /// Generate a dashboard artifact.
    ///
    /// Any response that does not decode into a recognized artifact is an
    /// [`DashforgeError::LlmResponse`] error.
    fn generate_artifact(&self, input: &SynthesisInput<'_>) -> Result<Artifact> {
        if !self.config().synthesize_artifacts {
            return Err(DashforgeError::LlmUnavailable(format!(
                "artifact synthesis disabled for {}",
                self.name()
            )));
        }
        let request = CompletionRequest::new(prompts::artifact_prompt(input))
            .with_max_tokens(ARTIFACT_MAX_TOKENS);
        let response = self.complete(&request)?;
        let (kind, code) = decode::artifact(&response)?;
        Ok(Artifact::synthesized(kind, code))
    }

    /// Score an artifact and list its issues and strengths.
    fn review_artifact(&self, artifact: &Artifact, chart_ids: &[String]) -> Result<SemanticReview> {
        if !self.config().review_artifacts {
            return Err(DashforgeError::LlmUnavailable(format!(
                "semantic review disabled for {}",
                self.name()
            )));
        }
        let response = self.complete(&CompletionRequest::new(prompts::review_prompt(
            artifact, chart_ids,
        )))?;
        decode::review(&response)
    }

    /// Extra insight bullets for the dashboard.
    fn suggest_insights(
        &self,
        summary: &DataSummary,
        request: &GenerationRequest,
    ) -> Result<Vec<String>> {
        if !self.config().augment_insights {
            return Ok(Vec::new());
        }
        let response = self.complete(&CompletionRequest::new(prompts::insights_prompt(
            summary, request,
        )))?;
        decode::insights(&response)
    }
}

/// Map a transport failure onto the capability taxonomy.
pub(crate) fn transport_error(provider: &str, timeout: Duration, err: reqwest::Error) -> DashforgeError {
    if err.is_timeout() {
        DashforgeError::Timeout(timeout)
    } else if err.is_decode() {
        DashforgeError::LlmResponse(format!("{provider} returned an unreadable body: {err}"))
    } else {
        DashforgeError::LlmUnavailable(format!("{provider} request failed: {err}"))
    }
}
