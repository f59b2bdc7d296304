//! Fuzz target for provider response decoding.
//!
//! Arbitrary provider output must decode or fail cleanly, and whatever
//! decodes as an artifact must survive verification.

#![no_main]

use dashforge::llm::decode;
use dashforge::synthesis::ArtifactVerifier;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);

    if let Ok((kind, code)) = decode::artifact(&text) {
        let report = ArtifactVerifier::default().verify(&code, kind, &["chart-chart_1".to_string()]);
        assert_eq!(report.passed(), report.critical_issues.is_empty());
    }
    let _ = decode::review(&text);
    let _ = decode::insights(&text);
});
