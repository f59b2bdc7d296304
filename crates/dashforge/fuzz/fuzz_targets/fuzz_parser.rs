//! Fuzz target for the data parser and type inference.
//!
//! This fuzzer tests that parsing and column typing:
//! 1. Never panic on malformed input
//! 2. Handle all delimiter combinations

#![no_main]

use dashforge::{Dataset, Parser};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(table) = Parser::new().parse_str(text) {
            let _ = Dataset::from_table(&table);
        }
    }
});
