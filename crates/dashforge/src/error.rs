//! Error types for the Dashforge library.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Main error type for Dashforge operations.
#[derive(Debug, Error)]
pub enum DashforgeError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error parsing CSV/TSV data.
    #[error("Parse error at row {row}, column {column}: {message}")]
    Parse {
        row: usize,
        column: usize,
        message: String,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file or no data to analyze.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// A dataset could not be assembled from the given columns.
    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The workflow graph is malformed.
    #[error("Workflow error: {0}")]
    Workflow(String),

    /// The code-generation capability is missing or unreachable.
    #[error("Code-generation capability unavailable: {0}")]
    LlmUnavailable(String),

    /// The code-generation capability answered with something we cannot decode.
    #[error("Unrecognized code-generation response: {0}")]
    LlmResponse(String),

    /// An operation exceeded its deadline.
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation error.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Writing rendered output failed.
    #[error("Render error: {0}")]
    Render(#[from] std::fmt::Error),
}

impl DashforgeError {
    /// Whether this error means the external capability should be treated as absent.
    ///
    /// Unreachable backends, timeouts and undecodable responses all route to the
    /// deterministic fallback path.
    pub fn is_capability_failure(&self) -> bool {
        matches!(
            self,
            DashforgeError::LlmUnavailable(_)
                | DashforgeError::LlmResponse(_)
                | DashforgeError::Timeout(_)
        )
    }
}

/// Result type alias for Dashforge operations.
pub type Result<T> = std::result::Result<T, DashforgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_failures() {
        assert!(DashforgeError::LlmUnavailable("down".into()).is_capability_failure());
        assert!(DashforgeError::LlmResponse("garbage".into()).is_capability_failure());
        assert!(DashforgeError::Timeout(Duration::from_secs(1)).is_capability_failure());
        assert!(!DashforgeError::Config("bad".into()).is_capability_failure());
    }

    #[test]
    fn test_error_display() {
        let err = DashforgeError::InvalidDataset("duplicate column 'age'".into());
        assert_eq!(err.to_string(), "Invalid dataset: duplicate column 'age'");
    }
}
