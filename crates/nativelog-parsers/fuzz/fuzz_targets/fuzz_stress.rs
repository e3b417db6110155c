// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for the stress progress parser
//!
//! Feeds input line-by-line and checks the count never decreases.

#![no_main]

use libfuzzer_sys::fuzz_target;

use nativelog_parsers::{NativeStressParser, OutputParser, ResultEvent};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let mut parser = NativeStressParser::new("fuzz");

        let mut previous = 0;
        for line in input.lines() {
            parser.process_line(line);
            assert!(parser.completed_count() >= previous);
            previous = parser.completed_count();
        }

        let mut events: Vec<ResultEvent> = Vec::new();
        parser.finalize(&mut events).expect("stress parser never fails");
    }
});
