//! Stage-based workflow: typed state, per-field merging and fault isolation.
//!
//! A [`Workflow`] runs its stages in a fixed order. Each stage reads the
//! current [`PipelineState`] and returns a [`StateUpdate`]; the engine merges
//! it (replace-fields overwrite, accumulate-fields append). A stage that
//! errors or panics is logged into `error_messages` and the run moves on.

mod engine;
mod result;
mod stage;
mod stages;
mod state;

pub use engine::{Workflow, WorkflowBuilder};
pub use result::PipelineResult;
pub use stage::{Finalizer, Stage, StageContext, StageError};
pub use stages::{
    AnalyzeRequirements, BuildChartSpecs, BuildLayout, DefaultFinalizer, Initialize,
    LlmAugmentedInsights, LoadDataRepresentation, SummarizeInsights, SynthesizeArtifact,
    VerifyArtifact,
};
pub use state::{PipelineState, StateUpdate};
