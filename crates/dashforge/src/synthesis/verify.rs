//! Heuristic verification of generated artifacts.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::artifact::ArtifactKind;
use crate::config::ChartLibrary;

/// Artifacts shorter than this draw a warning.
pub const MIN_ARTIFACT_LENGTH: usize = 500;

static HTML_ROOT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<html[\s>]").expect("valid regex"));
static HTML_BODY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<body[\s>]").expect("valid regex"));
static DEFAULT_EXPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"export\s+default\b").expect("valid regex"));
static RETURN_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"return\s*\(").expect("valid regex"));
static RENDER_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Plotly\.(newPlot|react)\s*\(|<Plot[\s/>]").expect("valid regex")
});
static STYLES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<style[\s>]|style=["{]|className="#).expect("valid regex")
});
static RESPONSIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)@media|display\s*:\s*(grid|flex)|grid-template|useResizeHandler")
        .expect("valid regex")
});
static EVENTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"addEventListener\s*\(|\.on\(\s*['"]plotly_|\bon[A-Z][A-Za-z]+=\{"#)
        .expect("valid regex")
});
static DATA_VARIABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(const|let|var)\s+\w*(data|records|dataset)\w*\s*=").expect("valid regex")
});

/// Whether `id` occurs in `code` as a whole identifier, so `chart-chart_1`
/// is not satisfied by `chart-chart_10`.
fn mentions_id(code: &str, id: &str) -> bool {
    let is_id_char = |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-';
    code.match_indices(id).any(|(start, _)| {
        let before = code[..start].chars().next_back();
        let after = code[start + id.len()..].chars().next();
        !before.is_some_and(is_id_char) && !after.is_some_and(is_id_char)
    })
}

/// Overall outcome of the heuristic checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    Pass,
    Fail,
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VerificationStatus::Pass => "PASS",
            VerificationStatus::Fail => "FAIL",
        })
    }
}

/// Score and remarks from a provider review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticReview {
    pub score: u8,
    pub issues: Vec<String>,
    pub strengths: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub critical_issues: Vec<String>,
    pub warnings: Vec<String>,
    pub passed_checks: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_review: Option<SemanticReview>,
    pub overall_status: VerificationStatus,
}

impl VerificationReport {
    pub fn passed(&self) -> bool {
        self.overall_status == VerificationStatus::Pass
    }

    /// Attach a review. The review never changes `overall_status`.
    pub fn with_review(mut self, review: SemanticReview) -> Self {
        self.semantic_review = Some(review);
        self
    }
}

/// Runs the structural, rendering, styling, interactivity and data checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArtifactVerifier {
    library: ChartLibrary,
}

/// Accumulates check outcomes while verifying.
#[derive(Default)]
struct Checks {
    critical: Vec<String>,
    warnings: Vec<String>,
    passed: Vec<String>,
}

impl Checks {
    fn critical(&mut self, ok: bool, name: &str, failure: impl FnOnce() -> String) {
        if ok {
            self.passed.push(name.to_string());
        } else {
            self.critical.push(failure());
        }
    }

    fn warn(&mut self, ok: bool, name: &str, failure: impl FnOnce() -> String) {
        if ok {
            self.passed.push(name.to_string());
        } else {
            self.warnings.push(failure());
        }
    }
}

impl ArtifactVerifier {
    pub fn new(library: ChartLibrary) -> Self {
        Self { library }
    }

    /// Check `code` as an artifact of `kind` that should render into `chart_ids`.
    pub fn verify(&self, code: &str, kind: ArtifactKind, chart_ids: &[String]) -> VerificationReport {
        let mut checks = Checks::default();

        // Structure
        let (root_ok, root_marker) = match kind {
            ArtifactKind::Document => (HTML_ROOT.is_match(code), "<html> root element"),
            ArtifactKind::Component => (DEFAULT_EXPORT.is_match(code), "default export"),
        };
        checks.critical(root_ok, "structure: root", || format!("Missing {root_marker}"));

        let (body_ok, body_marker) = match kind {
            ArtifactKind::Document => (HTML_BODY.is_match(code), "<body> section"),
            ArtifactKind::Component => (RETURN_BLOCK.is_match(code), "return block"),
        };
        checks.critical(body_ok, "structure: body", || format!("Missing {body_marker}"));

        let length = code.chars().count();
        checks.warn(length >= MIN_ARTIFACT_LENGTH, "structure: length", || {
            format!("Artifact is unusually short ({length} characters)")
        });

        // Rendering
        let library_ok = code.to_ascii_lowercase().contains(self.library.identifier());
        checks.critical(library_ok, "rendering: library", || {
            format!(
                "Missing charting library reference ({})",
                self.library.display_name()
            )
        });
        checks.warn(RENDER_CALL.is_match(code), "rendering: calls", || {
            "No chart rendering calls found".to_string()
        });

        let missing: Vec<&str> = chart_ids
            .iter()
            .map(String::as_str)
            .filter(|id| !mentions_id(code, id))
            .collect();
        checks.warn(missing.is_empty(), "rendering: containers", || {
            format!("Missing chart containers: {}", missing.join(", "))
        });

        // Styling
        checks.warn(STYLES.is_match(code), "styling: rules", || {
            "No style rules found".to_string()
        });
        checks.warn(RESPONSIVE.is_match(code), "styling: responsive", || {
            "No responsive layout (media queries or flexible grid) found".to_string()
        });

        // Interactivity
        checks.warn(EVENTS.is_match(code), "interactivity: events", || {
            "No event handlers found".to_string()
        });

        // Data
        checks.warn(DATA_VARIABLE.is_match(code), "data: variables", || {
            "No data-carrying variables found".to_string()
        });

        let overall_status = if checks.critical.is_empty() {
            VerificationStatus::Pass
        } else {
            VerificationStatus::Fail
        };

        VerificationReport {
            critical_issues: checks.critical,
            warnings: checks.warnings,
            passed_checks: checks.passed,
            semantic_review: None,
            overall_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(extra: &str) -> String {
        format!(
            "<!DOCTYPE html><html><head>\
             <script src=\"https://cdn.plot.ly/plotly-2.27.0.min.js\"></script>\
             <style>.grid {{ display: grid; }}</style></head>\
             <body><div id=\"chart-chart_1\"></div>{extra}<script>\
             const DASHBOARD_DATA = [];\
             Plotly.newPlot('chart-chart_1', [], {{}});\
             window.addEventListener('resize', () => {{}});\
             </script></body></html>"
        )
    }

    #[test]
    fn test_complete_document_passes() {
        let code = document(&" ".repeat(MIN_ARTIFACT_LENGTH));
        let report = ArtifactVerifier::default().verify(
            &code,
            ArtifactKind::Document,
            &["chart-chart_1".to_string()],
        );
        assert_eq!(report.overall_status, VerificationStatus::Pass);
        assert!(report.critical_issues.is_empty());
        assert!(report.warnings.is_empty(), "{:?}", report.warnings);
        assert_eq!(report.passed_checks.len(), 10);
    }

    #[test]
    fn test_missing_library_is_critical() {
        let code = document("")
            .replace("plotly-2.27.0.min.js", "charts.js")
            .replace("Plotly.newPlot", "draw");
        let report = ArtifactVerifier::default().verify(&code, ArtifactKind::Document, &[]);
        assert_eq!(report.overall_status, VerificationStatus::Fail);
        assert!(report.critical_issues.iter().any(|i| i.contains("charting library")));
    }

    #[test]
    fn test_missing_container_is_warning() {
        let report = ArtifactVerifier::default().verify(
            &document(""),
            ArtifactKind::Document,
            &["chart-chart_1".to_string(), "chart-chart_2".to_string()],
        );
        assert!(report.passed());
        assert!(report.warnings.iter().any(|w| w.contains("chart-chart_2")));
        assert!(report.warnings.iter().any(|w| w.contains("unusually short")));
    }

    #[test]
    fn test_container_ids_match_whole() {
        let code = document("")
            .replace("chart-chart_1", "chart-chart_10");
        let report = ArtifactVerifier::default().verify(
            &code,
            ArtifactKind::Document,
            &["chart-chart_1".to_string(), "chart-chart_10".to_string()],
        );
        assert!(!report.passed_checks.iter().any(|c| c == "rendering: containers"));
        assert!(
            report
                .warnings
                .iter()
                .any(|w| w == "Missing chart containers: chart-chart_1"),
            "{:?}",
            report.warnings
        );
    }

    #[test]
    fn test_mentions_id_boundaries() {
        assert!(mentions_id(r#"<div id="chart-chart_1">"#, "chart-chart_1"));
        assert!(mentions_id("getElementById('chart-chart_1')", "chart-chart_1"));
        assert!(!mentions_id(r#"<div id="chart-chart_12">"#, "chart-chart_1"));
        assert!(!mentions_id(r#"<div id="big-chart-chart_1">"#, "chart-chart_1"));
    }

    #[test]
    fn test_component_checks() {
        let code = "import Plot from 'react-plotly.js';\n\
                    export default function Dashboard() {\n  return (<Plot data={[]} />);\n}";
        let report = ArtifactVerifier::default().verify(code, ArtifactKind::Component, &[]);
        assert!(report.passed(), "{:?}", report.critical_issues);

        let report = ArtifactVerifier::default().verify(code, ArtifactKind::Document, &[]);
        assert!(!report.passed());
        assert_eq!(report.critical_issues.len(), 2);
    }

    #[test]
    fn test_status_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&VerificationStatus::Fail).unwrap(), "\"FAIL\"");
    }
}
