// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Fuzz target for the benchmark summary parser

#![no_main]

use libfuzzer_sys::fuzz_target;

use nativelog_parsers::benchmark::parse_summary_line;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        for line in input.lines() {
            if let Some(timing) = parse_summary_line(line) {
                assert!(timing.avg.is_finite());
            }
        }
    }
});
