// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for the gtest listing parser
//!
//! Either the listing is rejected with nothing emitted, or the emitted
//! sequence satisfies the run lifecycle.

#![no_main]

use libfuzzer_sys::fuzz_target;

use nativelog_parsers::{GTestListParser, OutputParser, ResultEvent, RunCollector};

fuzz_target!(|data: &[u8]| {
    // Convert bytes to string - invalid UTF-8 should be handled gracefully
    if let Ok(input) = std::str::from_utf8(data) {
        let mut parser = GTestListParser::new("fuzz");
        parser.feed_text(input);

        let mut events: Vec<ResultEvent> = Vec::new();
        if parser.finalize(&mut events).is_err() {
            assert!(events.is_empty());
            return;
        }

        let mut collector = RunCollector::new();
        for event in events {
            collector.accept(event).expect("parser output follows the protocol");
        }
        assert!(collector.is_idle());
    }
});
