//! Property-based tests for Dashforge.
//!
//! These tests use proptest to generate random datasets and artifacts and
//! check that the analyzer, recommender, verifier and workflow keep their
//! invariants under all of them.
//!
//! # Running Property Tests
//!
//! ```bash
//! # Run all property tests
//! cargo test -p dashforge --test property_tests
//!
//! # Run with more cases (slower but more thorough)
//! PROPTEST_CASES=10000 cargo test -p dashforge --test property_tests
//! ```

use proptest::prelude::*;

use dashforge::characteristics::CharacteristicsAnalyzer;
use dashforge::recommend::RecommendationEngine;
use dashforge::synthesis::ArtifactVerifier;
use dashforge::workflow::{PipelineState, Stage, StageContext, StageError, StateUpdate};
use dashforge::{
    ArtifactKind, Audience, ChartLibrary, ChartPurpose, ChartType, Column, DashboardPipeline,
    Dataset, GenerationRequest, VerificationStatus, Workflow,
};

// =============================================================================
// Test Strategies
// =============================================================================

/// Between 2 and 5 numerical columns of equal length, with some gaps.
fn numerical_columns() -> impl Strategy<Value = Vec<Vec<Option<f64>>>> {
    (2usize..6, 4usize..40).prop_flat_map(|(count, rows)| {
        prop::collection::vec(
            prop::collection::vec(prop::option::weighted(0.9, -1e6f64..1e6), rows),
            count,
        )
    })
}

fn numerical_dataset(columns: Vec<Vec<Option<f64>>>) -> Dataset {
    Dataset::new(
        columns
            .into_iter()
            .enumerate()
            .map(|(i, values)| Column::numerical(format!("n{i}"), values))
            .collect(),
    )
    .expect("columns share a length")
}

fn purpose() -> impl Strategy<Value = ChartPurpose> {
    prop_oneof![
        Just(ChartPurpose::Exploration),
        Just(ChartPurpose::DetailedExploration),
        Just(ChartPurpose::Executive),
        Just(ChartPurpose::Presentation),
    ]
}

fn audience() -> impl Strategy<Value = Audience> {
    prop_oneof![
        Just(Audience::Executive),
        Just(Audience::Analyst),
        Just(Audience::DataScientist),
        Just(Audience::BusinessUser),
        "[a-z]{3,10}".prop_map(Audience::from),
    ]
}

struct Broken(String);

impl Stage for Broken {
    fn name(&self) -> &str {
        &self.0
    }

    fn run(&self, _: &StageContext<'_>, _: &PipelineState) -> Result<StateUpdate, StageError> {
        Err(StageError::Failed("always".to_string()))
    }
}

// =============================================================================
// Analyzer and Recommender
// =============================================================================

proptest! {
    #[test]
    fn heatmap_once_and_scatter_per_pair(columns in numerical_columns(), purpose in purpose()) {
        let count = columns.len();
        let profile = CharacteristicsAnalyzer::new().analyze(&numerical_dataset(columns));
        let candidates = RecommendationEngine::new().generate_candidates(&profile, purpose);

        let heatmaps = candidates
            .iter()
            .filter(|s| s.chart_type == ChartType::CorrelationHeatmap)
            .count();
        prop_assert_eq!(heatmaps, 1);

        for a in 0..count {
            for b in a + 1..count {
                let pair = [format!("n{a}"), format!("n{b}")];
                prop_assert!(candidates
                    .iter()
                    .any(|s| s.chart_type == ChartType::ScatterPlot && s.columns == pair));
            }
        }
    }

    #[test]
    fn outlier_percentage_is_bounded(columns in numerical_columns()) {
        let profile = CharacteristicsAnalyzer::new().analyze(&numerical_dataset(columns));
        for name in &profile.column_types.numerical {
            let pattern = profile.numerical(name).expect("pattern");
            prop_assert!(pattern.outlier_percentage.is_finite());
            prop_assert!((0.0..=100.0).contains(&pattern.outlier_percentage));
        }
    }

    #[test]
    fn high_cardinality_is_always_treemap(distinct in 51usize..150, repeats in 1usize..3) {
        let values: Vec<Option<String>> = (0..distinct * repeats)
            .map(|i| Some(format!("c{}", i % distinct)))
            .collect();
        let dataset = Dataset::new(vec![Column::categorical("code", values)]).unwrap();
        let profile = CharacteristicsAnalyzer::new().analyze(&dataset);

        for purpose in [ChartPurpose::Exploration, ChartPurpose::Presentation] {
            let specs = RecommendationEngine::new().generate_candidates(&profile, purpose);
            prop_assert!(specs.iter().any(|s| s.chart_type == ChartType::Treemap));
            prop_assert!(!specs
                .iter()
                .any(|s| matches!(s.chart_type, ChartType::BarChart | ChartType::PieChart)));
        }
    }

    #[test]
    fn recommendation_is_idempotent(
        columns in numerical_columns(),
        purpose in purpose(),
        audience in audience(),
    ) {
        let profile = CharacteristicsAnalyzer::new().analyze(&numerical_dataset(columns));
        let engine = RecommendationEngine::new();
        prop_assert_eq!(
            engine.recommend(&profile, purpose, &audience),
            engine.recommend(&profile, purpose, &audience)
        );
    }
}

// =============================================================================
// Verification and Workflow
// =============================================================================

proptest! {
    #[test]
    fn missing_library_always_fails(body in "[a-x0-9 <>/=\"]{0,800}") {
        // No 'y' in the alphabet, so the library name cannot appear.
        let code = format!("<!DOCTYPE html><html><body>{body}</body></html>");
        let report = ArtifactVerifier::new(ChartLibrary::Plotly)
            .verify(&code, ArtifactKind::Document, &[]);

        prop_assert_eq!(report.overall_status, VerificationStatus::Fail);
        prop_assert!(report.critical_issues.iter().any(|i| i.contains("charting library")));
    }

    #[test]
    fn failing_stages_never_abort(failing in 0usize..12) {
        let mut builder = Workflow::builder();
        for i in 0..failing {
            builder = builder.stage(Broken(format!("broken-{i}")));
        }
        let dataset = Dataset::new(vec![
            Column::numerical("x", (0..12).map(|i| Some(i as f64)).collect()),
        ])
        .unwrap();
        let pipeline = DashboardPipeline::new().with_workflow(builder.build().unwrap());

        let result = pipeline.generate(&dataset, &GenerationRequest::default());
        prop_assert!(result.success);
        prop_assert!(result.error_messages.len() >= failing);
    }
}
