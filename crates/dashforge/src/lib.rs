//! Dashforge: adaptive dashboard generation for tabular datasets.
//!
//! Dashforge profiles a dataset, recommends charts that suit its shape and
//! the intended audience, and produces a standalone interactive dashboard.
//! An external code-generation provider may write the dashboard; whenever it
//! is missing, slow or wrong, a deterministic template renderer takes over.
//!
//! # Core Principles
//!
//! - **Data-driven**: Chart choices follow from measured characteristics
//! - **Fault-isolated**: A failing stage is recorded, never fatal
//! - **Always renders**: Every successful run carries a verified artifact
//!
//! # Example
//!
//! ```no_run
//! use dashforge::{DashboardPipeline, GenerationRequest};
//!
//! let pipeline = DashboardPipeline::new();
//! let (dataset, _) = pipeline.load("sales.csv").unwrap();
//! let result = pipeline.generate(&dataset, &GenerationRequest::default());
//!
//! println!("Charts: {}", result.chart_specifications.len());
//! println!("Success: {}", result.success);
//! ```

pub mod characteristics;
pub mod config;
pub mod dataset;
pub mod error;
pub mod input;
pub mod insights;
pub mod layout;
pub mod llm;
pub mod recommend;
pub mod request;
pub mod synthesis;
pub mod workflow;

mod pipeline;

pub use crate::pipeline::DashboardPipeline;
pub use characteristics::{CharacteristicsAnalyzer, CharacteristicsProfile};
pub use config::{ChartLibrary, PipelineConfig};
pub use dataset::{Column, ColumnKind, DataRepresentation, Dataset};
pub use error::{DashforgeError, Result};
pub use input::{Parser, ParserConfig, SourceMetadata};
pub use layout::LayoutConfig;
pub use llm::{
    AnthropicProvider, LlmConfig, LlmProvider, MockProvider, MockReply, OllamaProvider,
    OpenAIProvider,
};
pub use recommend::{Audience, ChartPurpose, ChartSpecification, ChartType, Priority};
pub use request::{DashboardType, GenerationRequest};
pub use synthesis::{ArtifactKind, ArtifactOrigin, VerificationReport, VerificationStatus};
pub use workflow::{PipelineResult, Workflow};
