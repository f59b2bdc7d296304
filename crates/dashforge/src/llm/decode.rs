//! Strict decoders for provider responses.
//!
//! Each decoder accepts a small, fixed set of shapes and rejects everything
//! else with [`DashforgeError::LlmResponse`]; callers treat that exactly like
//! an unreachable provider.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{DashforgeError, Result};
use crate::synthesis::{ArtifactKind, SemanticReview};

static FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```([A-Za-z]*)[ \t]*\r?\n(.*?)```").expect("fence pattern is valid")
});

/// Structured artifact payload.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ArtifactPayload {
    kind: ArtifactKind,
    code: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ReviewPayload {
    score: u32,
    #[serde(default)]
    issues: Vec<String>,
    #[serde(default)]
    strengths: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct InsightsPayload {
    insights: Vec<String>,
}

fn rejected(what: &str, reason: impl std::fmt::Display) -> DashforgeError {
    DashforgeError::LlmResponse(format!("{what}: {reason}"))
}

/// Fenced blocks as `(language, body)` pairs.
fn fences(text: &str) -> Vec<(String, &str)> {
    FENCE
        .captures_iter(text)
        .filter_map(|c| {
            let body = c.get(2)?.as_str();
            let lang = c.get(1).map(|m| m.as_str().to_ascii_lowercase()).unwrap_or_default();
            Some((lang, body))
        })
        .collect()
}

/// The JSON document in a response: the whole text, or a single `json` fence.
fn json_body<T: DeserializeOwned>(text: &str, what: &str) -> Result<T> {
    let trimmed = text.trim();
    let body = if trimmed.starts_with('{') {
        trimmed
    } else {
        match fences(trimmed).as_slice() {
            [(lang, body)] if lang == "json" || lang.is_empty() => body.trim(),
            [] => return Err(rejected(what, "no JSON object found")),
            _ => return Err(rejected(what, "expected exactly one JSON block")),
        }
    };
    serde_json::from_str(body).map_err(|e| rejected(what, e))
}

/// Decode an artifact response into its kind and code.
///
/// Accepted shapes, in order:
/// 1. raw markup starting with `<!DOCTYPE` or `<html`, kept whole even when
///    it embeds fenced snippets;
/// 2. a `{"kind": ..., "code": ...}` object, bare or in one `json` fence;
/// 3. exactly one `html`, `jsx`, `tsx`, `js` or `javascript` fence;
/// 4. raw component code containing `export default`.
pub fn artifact(text: &str) -> Result<(ArtifactKind, String)> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(rejected("artifact", "empty response"));
    }

    let head = trimmed.chars().take(16).collect::<String>().to_ascii_lowercase();
    if head.starts_with("<!doctype") || head.starts_with("<html") {
        return Ok((ArtifactKind::Document, trimmed.to_string()));
    }

    let blocks = fences(trimmed);
    let is_json = trimmed.starts_with('{')
        || matches!(blocks.as_slice(), [(lang, _)] if lang == "json");
    if is_json {
        let payload: ArtifactPayload = json_body(trimmed, "artifact")?;
        if payload.code.trim().is_empty() {
            return Err(rejected("artifact", "code is empty"));
        }
        return Ok((payload.kind, payload.code));
    }

    match blocks.as_slice() {
        [(lang, body)] => {
            let kind = match lang.as_str() {
                "html" => ArtifactKind::Document,
                "jsx" | "tsx" | "js" | "javascript" => ArtifactKind::Component,
                other => return Err(rejected("artifact", format!("unsupported block '{other}'"))),
            };
            let code = body.trim();
            if code.is_empty() {
                return Err(rejected("artifact", "code block is empty"));
            }
            return Ok((kind, code.to_string()));
        }
        [] => {}
        _ => return Err(rejected("artifact", "expected exactly one code block")),
    }

    if trimmed.contains("export default") {
        Ok((ArtifactKind::Component, trimmed.to_string()))
    } else {
        Err(rejected("artifact", "no recognizable document or component"))
    }
}

/// Decode a semantic review. Scores above 100 are rejected.
pub fn review(text: &str) -> Result<SemanticReview> {
    let payload: ReviewPayload = json_body(text, "review")?;
    let score = u8::try_from(payload.score)
        .ok()
        .filter(|s| *s <= 100)
        .ok_or_else(|| rejected("review", format!("score {} outside 0..=100", payload.score)))?;
    Ok(SemanticReview {
        score,
        issues: payload.issues,
        strengths: payload.strengths,
    })
}

/// Decode `{"insights": [...]}`, dropping blank bullets.
pub fn insights(text: &str) -> Result<Vec<String>> {
    let payload: InsightsPayload = json_body(text, "insights")?;
    Ok(payload
        .insights
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_artifact() {
        let (kind, code) =
            artifact(r#"{"kind": "component", "code": "export default function D() {}"}"#).unwrap();
        assert_eq!(kind, ArtifactKind::Component);
        assert!(code.starts_with("export default"));
    }

    #[test]
    fn test_structured_artifact_in_fence() {
        let text = "Here you go:\n```json\n{\"kind\": \"document\", \"code\": \"<html></html>\"}\n```";
        assert_eq!(artifact(text).unwrap().0, ArtifactKind::Document);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let err = artifact(r#"{"kind": "document", "code": "<html>", "extra": 1}"#).unwrap_err();
        assert!(matches!(err, DashforgeError::LlmResponse(_)));
    }

    #[test]
    fn test_fenced_html() {
        let text = "Sure!\n```html\n<!DOCTYPE html><html><body></body></html>\n```\nEnjoy.";
        let (kind, code) = artifact(text).unwrap();
        assert_eq!(kind, ArtifactKind::Document);
        assert!(code.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_multiple_blocks_rejected() {
        let text = "```html\n<html></html>\n```\nand\n```css\nbody {}\n```";
        assert!(artifact(text).is_err());
    }

    #[test]
    fn test_raw_document() {
        let (kind, _) = artifact("  <!doctype html>\n<html></html>").unwrap();
        assert_eq!(kind, ArtifactKind::Document);
    }

    #[test]
    fn test_raw_document_with_embedded_fence() {
        let text = "<!DOCTYPE html><html><body><pre>```js\nconsole.log(1)\n```</pre>\
                    <script>Plotly.newPlot('chart-chart_1', [], {});</script></body></html>";
        let (kind, code) = artifact(text).unwrap();
        assert_eq!(kind, ArtifactKind::Document);
        assert_eq!(code, text);
    }

    #[test]
    fn test_prose_rejected() {
        let err = artifact("I'm sorry, I can't help with that.").unwrap_err();
        assert!(err.is_capability_failure());
    }

    #[test]
    fn test_review_bounds() {
        let ok = review(r#"{"score": 82, "issues": ["no legend"], "strengths": []}"#).unwrap();
        assert_eq!(ok.score, 82);
        assert_eq!(ok.issues, vec!["no legend"]);
        assert!(review(r#"{"score": 140}"#).is_err());
    }

    #[test]
    fn test_insights_drop_blanks() {
        let bullets = insights("```json\n{\"insights\": [\"Sales peak in May\", \"  \"]}\n```").unwrap();
        assert_eq!(bullets, vec!["Sales peak in May"]);
        assert!(insights(r#"["bare list"]"#).is_err());
    }
}
