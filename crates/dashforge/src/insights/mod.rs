//! Insight bullets shown alongside the charts.
//!
//! The summarizer is deterministic and always runs; a configured provider may
//! add more bullets afterwards.

mod summary;

pub use summary::{quality_score, summarize, DataSummary, NumericSummary};
