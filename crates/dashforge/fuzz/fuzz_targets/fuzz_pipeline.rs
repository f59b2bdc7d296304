//! Fuzz target for end-to-end generation.
//!
//! Any parseable table must yield a successful run with a verified artifact.

#![no_main]

use dashforge::{DashboardPipeline, Dataset, GenerationRequest, Parser};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10_000 {
        return;
    }

    let text = String::from_utf8_lossy(data);
    let Ok(table) = Parser::new().parse_str(&text) else {
        return;
    };
    let Ok(dataset) = Dataset::from_table(&table) else {
        return;
    };

    let result = DashboardPipeline::new().generate(&dataset, &GenerationRequest::default());
    assert!(result.success, "{:?}", result.error_messages);
    assert!(result.verification_report.is_some_and(|r| r.passed()));
});
