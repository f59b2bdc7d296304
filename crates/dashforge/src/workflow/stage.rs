//! The stage contract.

use thiserror::Error;

use super::result::PipelineResult;
use super::state::{PipelineState, StateUpdate};
use crate::config::PipelineConfig;
use crate::dataset::Dataset;
use crate::error::DashforgeError;
use crate::llm::LlmProvider;
use crate::request::GenerationRequest;

/// Why a stage produced no update.
#[derive(Debug, Error)]
pub enum StageError {
    /// An upstream field the stage reads was never set.
    #[error("missing input: {0}")]
    MissingInput(&'static str),

    #[error(transparent)]
    Dashforge(#[from] DashforgeError),

    #[error("panicked: {0}")]
    Panicked(String),

    #[error("{0}")]
    Failed(String),
}

/// Read-only inputs shared by every stage of a run.
#[derive(Clone, Copy)]
pub struct StageContext<'a> {
    pub dataset: &'a Dataset,
    pub request: &'a GenerationRequest,
    pub config: &'a PipelineConfig,
    pub llm: Option<&'a dyn LlmProvider>,
}

impl<'a> StageContext<'a> {
    pub fn new(
        dataset: &'a Dataset,
        request: &'a GenerationRequest,
        config: &'a PipelineConfig,
    ) -> Self {
        Self {
            dataset,
            request,
            config,
            llm: None,
        }
    }

    pub fn with_llm(mut self, llm: Option<&'a dyn LlmProvider>) -> Self {
        self.llm = llm;
        self
    }
}

/// One step of the workflow.
///
/// Stages never mutate the state directly; the engine merges the returned
/// update.
pub trait Stage: Send + Sync {
    /// Unique name, used in logs and error messages.
    fn name(&self) -> &str;

    fn run(&self, ctx: &StageContext<'_>, state: &PipelineState) -> Result<StateUpdate, StageError>;
}

/// Terminal step turning the final state into a result.
///
/// An error here is the only way a run fails as a whole.
pub trait Finalizer: Send + Sync {
    fn finalize(
        &self,
        ctx: &StageContext<'_>,
        state: &PipelineState,
    ) -> Result<PipelineResult, StageError>;
}
