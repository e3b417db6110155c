// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! nativelog-parsers: Result parsing for native test binaries
//!
//! This library crate turns the console output of native test and benchmark
//! binaries into a uniform sequence of run lifecycle events:
//!
//! - [`GTestListParser`] for `--gtest_list_tests` listings (strict)
//! - [`NativeStressParser`] for stress test progress logs (permissive)
//! - [`NativeBenchmarkParser`] for benchmark summaries (permissive)
//!
//! # Example
//!
//! ```
//! use nativelog_parsers::{NativeStressParser, OutputParser, RunCollector};
//!
//! let mut parser = NativeStressParser::new("stress");
//! parser.feed_text("==== Completed pass: 0\n==== Completed pass: 1\n");
//!
//! let mut collector = RunCollector::new();
//! parser.finalize(&mut collector).unwrap();
//!
//! let runs = collector.finish().unwrap();
//! assert_eq!(runs[0].require_metric("iterations").unwrap().as_u64(), Some(2));
//! ```

#![warn(missing_docs)]

pub mod benchmark;
pub mod collector;
pub mod error;
pub mod event;
pub mod feeder;
pub mod gtest;
pub mod result;
pub mod stress;

pub use benchmark::NativeBenchmarkParser;
pub use collector::RunCollector;
pub use error::{FormatError, FormatErrorKind, MissingMetric, ParseError, ProtocolError, SinkError};
pub use event::{
    AVG_ITERATION_TIME_METRIC, ITERATIONS_METRIC, MetricValue, Metrics, ResultEvent, ResultSink,
    TestIdentity,
};
pub use feeder::{OutputParser, line_chunks};
pub use gtest::GTestListParser;
pub use result::{RunResult, TestOutcome, TestResult};
pub use stress::NativeStressParser;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::collector::RunCollector;
    pub use crate::error::ParseError;
    pub use crate::event::{ResultEvent, ResultSink, TestIdentity};
    pub use crate::feeder::OutputParser;
    pub use crate::{GTestListParser, NativeBenchmarkParser, NativeStressParser};
}
