//! Sequential, fault-isolated stage runner.

use std::any::Any;
use std::collections::HashSet;
use std::panic::{AssertUnwindSafe, catch_unwind};

use super::result::PipelineResult;
use super::stage::{Finalizer, Stage, StageContext, StageError};
use super::state::PipelineState;
use super::stages::{self, DefaultFinalizer};
use crate::error::{DashforgeError, Result};

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&'static str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Run `f`, turning a panic into a [`StageError`].
fn isolate<T>(
    f: impl FnOnce() -> std::result::Result<T, StageError>,
) -> std::result::Result<T, StageError> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(StageError::Panicked(panic_message(payload.as_ref()))),
    }
}

/// A fixed sequence of stages followed by a finalizer.
pub struct Workflow {
    stages: Vec<Box<dyn Stage>>,
    finalizer: Box<dyn Finalizer>,
}

impl Workflow {
    /// The standard dashboard-generation workflow.
    pub fn standard() -> Self {
        Self {
            stages: stages::standard(),
            finalizer: Box::new(DefaultFinalizer),
        }
    }

    pub fn builder() -> WorkflowBuilder {
        WorkflowBuilder::default()
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Execute every stage in order, then finalize.
    ///
    /// A failing or panicking stage is recorded in `error_messages` and the
    /// run continues with the next stage. Only a finalizer failure yields an
    /// unsuccessful result.
    pub fn run(&self, ctx: &StageContext<'_>) -> PipelineResult {
        let mut state = PipelineState::default();

        for stage in &self.stages {
            let name = stage.name();
            tracing::debug!(stage = name, "stage started");

            match isolate(|| stage.run(ctx, &state)) {
                Ok(update) if update.is_empty() => {
                    tracing::debug!(stage = name, "stage returned no update");
                    state
                        .diagnostics
                        .push(format!("stage '{name}' produced no state update"));
                }
                Ok(update) => {
                    state.apply(update);
                    tracing::debug!(stage = name, "stage finished");
                }
                Err(err) => {
                    tracing::warn!(stage = name, error = %err, "stage failed; continuing");
                    state.error_messages.push(format!("stage '{name}' failed: {err}"));
                }
            }
        }

        match isolate(|| self.finalizer.finalize(ctx, &state)) {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(error = %err, "finalize failed");
                let mut messages = state.error_messages;
                messages.push(format!("finalize failed: {err}"));
                PipelineResult::failure(state.session_id.unwrap_or_default(), messages)
            }
        }
    }
}

/// Assembles a [`Workflow`], rejecting duplicate stage names.
#[derive(Default)]
pub struct WorkflowBuilder {
    stages: Vec<Box<dyn Stage>>,
    finalizer: Option<Box<dyn Finalizer>>,
}

impl WorkflowBuilder {
    pub fn stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn finalizer(mut self, finalizer: impl Finalizer + 'static) -> Self {
        self.finalizer = Some(Box::new(finalizer));
        self
    }

    pub fn build(self) -> Result<Workflow> {
        let mut seen = HashSet::new();
        for stage in &self.stages {
            if !seen.insert(stage.name()) {
                return Err(DashforgeError::Workflow(format!(
                    "duplicate stage name '{}'",
                    stage.name()
                )));
            }
        }
        Ok(Workflow {
            stages: self.stages,
            finalizer: self.finalizer.unwrap_or_else(|| Box::new(DefaultFinalizer)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::dataset::{Column, Dataset};
    use crate::request::GenerationRequest;
    use crate::workflow::StateUpdate;

    struct Failing(&'static str);

    impl Stage for Failing {
        fn name(&self) -> &str {
            self.0
        }

        fn run(&self, _: &StageContext<'_>, _: &PipelineState) -> std::result::Result<StateUpdate, StageError> {
            Err(StageError::Failed("boom".to_string()))
        }
    }

    struct Panicking;

    impl Stage for Panicking {
        fn name(&self) -> &str {
            "panicking"
        }

        fn run(&self, _: &StageContext<'_>, _: &PipelineState) -> std::result::Result<StateUpdate, StageError> {
            panic!("stage exploded")
        }
    }

    struct Silent;

    impl Stage for Silent {
        fn name(&self) -> &str {
            "silent"
        }

        fn run(&self, _: &StageContext<'_>, _: &PipelineState) -> std::result::Result<StateUpdate, StageError> {
            Ok(StateUpdate::default())
        }
    }

    struct BrokenFinalizer;

    impl Finalizer for BrokenFinalizer {
        fn finalize(
            &self,
            _: &StageContext<'_>,
            _: &PipelineState,
        ) -> std::result::Result<PipelineResult, StageError> {
            Err(StageError::Failed("cannot assemble".to_string()))
        }
    }

    fn dataset() -> Dataset {
        Dataset::new(vec![
            Column::numerical("x", (0..10).map(|i| Some(i as f64)).collect()),
            Column::categorical(
                "c",
                (0..10).map(|i| Some(if i % 2 == 0 { "a" } else { "b" })).collect(),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_standard_stage_order() {
        assert_eq!(
            Workflow::standard().stage_names(),
            vec![
                "initialize",
                "load-data-representation",
                "analyze-requirements",
                "build-layout",
                "build-chart-specs",
                "summarize-insights",
                "llm-augmented-insights",
                "synthesize-artifact",
                "verify-artifact",
            ]
        );
    }

    #[test]
    fn test_failures_are_recorded_and_run_continues() {
        let workflow = Workflow::builder()
            .stage(Failing("first"))
            .stage(Panicking)
            .stage(Silent)
            .build()
            .unwrap();
        let ds = dataset();
        let request = GenerationRequest::default();
        let config = PipelineConfig::default();

        let result = workflow.run(&StageContext::new(&ds, &request, &config));
        assert!(result.success);
        assert!(!result.artifact.is_empty());
        assert!(result.error_messages[0].starts_with("stage 'first' failed"));
        assert!(result.error_messages[1].contains("stage exploded"));
        assert_eq!(result.diagnostics, vec!["stage 'silent' produced no state update"]);
    }

    #[test]
    fn test_finalizer_failure_is_fatal() {
        let workflow = Workflow::builder()
            .stage(Failing("only"))
            .finalizer(BrokenFinalizer)
            .build()
            .unwrap();
        let ds = dataset();
        let request = GenerationRequest::default();
        let config = PipelineConfig::default();

        let result = workflow.run(&StageContext::new(&ds, &request, &config));
        assert!(!result.success);
        assert!(result.artifact.is_empty());
        assert_eq!(result.error_messages.len(), 2);
        assert!(result.error_messages[1].starts_with("finalize failed"));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = Workflow::builder()
            .stage(Failing("same"))
            .stage(Failing("same"))
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, DashforgeError::Workflow(_)));
    }
}
