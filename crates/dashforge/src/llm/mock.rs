//! Mock LLM provider for testing.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{DashforgeError, Result};

use super::provider::{CompletionRequest, LlmConfig, LlmProvider};

static CONTAINER_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"id="(chart-[A-Za-z0-9_]+)""#).expect("container pattern is valid"));

/// One scripted answer.
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    /// Return this text.
    Text(String),
    /// Fail as if the backend were unreachable.
    Unavailable,
    /// Fail as if the request hit its deadline.
    Timeout,
    /// Block for the duration, then return the text.
    Delayed(Duration, String),
}

/// Mock LLM provider that returns predictable responses for testing.
///
/// Scripted replies are consumed in order. Once the script runs out the mock
/// answers each prompt with a canned, well-formed response.
pub struct MockProvider {
    config: LlmConfig,
    script: Mutex<VecDeque<MockReply>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
    offline: bool,
}

impl MockProvider {
    /// Create a new mock provider.
    pub fn new() -> Self {
        Self::with_config(LlmConfig::default())
    }

    /// Create with custom configuration.
    pub fn with_config(config: LlmConfig) -> Self {
        Self {
            config,
            script: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            offline: false,
        }
    }

    /// A provider whose every call fails as unavailable.
    pub fn unavailable() -> Self {
        Self {
            offline: true,
            ..Self::new()
        }
    }

    /// Queue replies to return before the canned ones.
    pub fn with_replies(self, replies: impl IntoIterator<Item = MockReply>) -> Self {
        self.lock_script().extend(replies);
        self
    }

    /// Queue one text reply.
    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.with_replies([MockReply::Text(text.into())])
    }

    /// Number of `complete` calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every prompt received, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn lock_script(&self) -> std::sync::MutexGuard<'_, VecDeque<MockReply>> {
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn canned(prompt: &str) -> String {
        if prompt.contains("\"insights\"") {
            return r#"{"insights": ["Mock insight: values cluster around the median"]}"#.to_string();
        }
        if prompt.starts_with("Review") {
            return r#"{"score": 88, "issues": [], "strengths": ["clear layout"]}"#.to_string();
        }

        let containers: String = CONTAINER_ID
            .captures_iter(prompt)
            .filter_map(|c| c.get(1))
            .map(|m| format!("<div id=\"{}\" class=\"chart\"></div>\n", m.as_str()))
            .collect();
        let code = format!(
            "<!DOCTYPE html>\n<html>\n<head>\n\
             <script src=\"https://cdn.plot.ly/plotly-2.27.0.min.js\"></script>\n\
             <style>.grid {{ display: grid; }} @media (max-width: 768px) {{ .grid {{ display: block; }} }}</style>\n\
             </head>\n<body>\n<main class=\"grid\">\n{containers}</main>\n\
             <script>\nconst DASHBOARD_DATA = [];\n\
             document.querySelectorAll('.chart').forEach(el => Plotly.newPlot(el, [], {{}}));\n\
             window.addEventListener('resize', () => {{}});\n</script>\n</body>\n</html>"
        );
        serde_json::json!({ "kind": "document", "code": code }).to_string()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LlmProvider for MockProvider {
    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.prompt.clone());

        if self.offline {
            return Err(DashforgeError::LlmUnavailable("mock provider is offline".to_string()));
        }

        let next = self.lock_script().pop_front();
        match next {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Unavailable) => Err(DashforgeError::LlmUnavailable(
                "scripted outage".to_string(),
            )),
            Some(MockReply::Timeout) => Err(DashforgeError::Timeout(self.config.timeout)),
            Some(MockReply::Delayed(delay, text)) => {
                std::thread::sleep(delay);
                Ok(text)
            }
            None => Ok(Self::canned(&request.prompt)),
        }
    }

    fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_then_canned() {
        let mock = MockProvider::new().with_replies([
            MockReply::Text("first".into()),
            MockReply::Unavailable,
        ]);
        let request = CompletionRequest::new("Suggest {\"insights\"}");

        assert_eq!(mock.complete(&request).unwrap(), "first");
        assert!(mock.complete(&request).unwrap_err().is_capability_failure());
        assert!(mock.complete(&request).unwrap().contains("Mock insight"));
        assert_eq!(mock.call_count(), 3);
    }

    #[test]
    fn test_offline() {
        let mock = MockProvider::unavailable();
        let err = mock.complete(&CompletionRequest::new("x")).unwrap_err();
        assert!(matches!(err, DashforgeError::LlmUnavailable(_)));
        assert_eq!(mock.prompts(), vec!["x"]);
    }

    #[test]
    fn test_canned_artifact_keeps_container_ids() {
        let mock = MockProvider::new();
        let reply = mock
            .complete(&CompletionRequest::new(r#"chart in element id="chart-chart_1""#))
            .unwrap();
        assert!(reply.contains(r#"id=\"chart-chart_1\""#));
    }
}
