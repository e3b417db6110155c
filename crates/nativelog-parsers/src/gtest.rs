// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! GoogleTest listing parser
//!
//! Parses the output of a gtest binary run with `--gtest_list_tests`:
//!
//! ```text
//! FooTest.
//!   DoesBar
//!   DoesBaz
//! ParamTest/Instance.
//!   Works/0
//!   Works/1
//! ```
//!
//! The grammar is strict. Any violation makes [`GTestListParser::finalize`]
//! fail without emitting a single event.
//!
//! # Example
//!
//! ```
//! use nativelog_parsers::{GTestListParser, OutputParser, ResultEvent};
//!
//! let mut parser = GTestListParser::new("module");
//! parser.feed(["FooTest.", "  DoesBar"]);
//!
//! let mut events: Vec<ResultEvent> = Vec::new();
//! parser.finalize(&mut events).unwrap();
//! assert_eq!(events.len(), 4);
//! ```

use std::collections::HashSet;

use tracing::{debug, info};

use crate::error::{FormatError, FormatErrorKind, ParseError};
use crate::event::{Metrics, ResultEvent, ResultSink, TestIdentity, emit_all};
use crate::feeder::OutputParser;

/// Accumulated state of a listing parse
#[derive(Debug, Clone, Default)]
pub struct ListState {
    line_number: usize,
    suite: Option<String>,
    tests: Vec<TestIdentity>,
    seen: HashSet<TestIdentity>,
    violation: Option<FormatError>,
}

impl ListState {
    /// Consume one line and return the updated state
    #[must_use]
    pub fn advance(mut self, line: &str) -> Self {
        if self.violation.is_some() {
            return self;
        }
        self.line_number += 1;

        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return self;
        }

        if let Err(kind) = self.classify(line) {
            debug!(line = self.line_number, content = line, %kind, "Listing grammar violation");
            self.violation = Some(FormatError {
                line: self.line_number,
                content: line.to_string(),
                kind,
            });
        }
        self
    }

    fn classify(&mut self, line: &str) -> Result<(), FormatErrorKind> {
        if line.starts_with(char::is_whitespace) {
            let suite = self
                .suite
                .as_ref()
                .ok_or(FormatErrorKind::MethodWithoutSuite)?;
            let method = strip_indent(line);
            if method.starts_with(char::is_whitespace) {
                return Err(FormatErrorKind::LeadingWhitespace);
            }

            let test = TestIdentity::new(suite.as_str(), method);
            if !self.seen.insert(test.clone()) {
                return Err(FormatErrorKind::DuplicateTest(test));
            }
            self.tests.push(test);
            Ok(())
        } else {
            match line.strip_suffix('.') {
                Some("") => Err(FormatErrorKind::EmptySuiteName),
                Some(name) => {
                    self.suite = Some(name.to_string());
                    Ok(())
                }
                None => Err(FormatErrorKind::NotASuiteHeader),
            }
        }
    }

    /// Tests discovered so far, in discovery order
    #[must_use]
    pub fn tests(&self) -> &[TestIdentity] {
        &self.tests
    }

    /// The first grammar violation, if any
    #[must_use]
    pub fn violation(&self) -> Option<&FormatError> {
        self.violation.as_ref()
    }

    /// Turn the final state into the run's complete event sequence
    ///
    /// # Errors
    ///
    /// Returns the first recorded `FormatError`, if any.
    pub fn into_events(self, run_name: &str) -> Result<Vec<ResultEvent>, FormatError> {
        if let Some(violation) = self.violation {
            return Err(violation);
        }

        let mut events = Vec::with_capacity(self.tests.len() * 2 + 2);
        events.push(ResultEvent::RunStarted {
            name: run_name.to_string(),
            test_count: self.tests.len(),
        });
        for test in self.tests {
            events.push(ResultEvent::TestStarted { test: test.clone() });
            events.push(ResultEvent::TestEnded {
                test,
                metrics: Metrics::new(),
            });
        }
        events.push(ResultEvent::RunEnded {
            elapsed_ms: 0,
            metrics: Metrics::new(),
        });
        Ok(events)
    }
}

/// Remove one indentation unit: two spaces, else a single whitespace char
fn strip_indent(line: &str) -> &str {
    if let Some(rest) = line.strip_prefix("  ") {
        return rest;
    }
    let mut chars = line.chars();
    chars.next();
    chars.as_str()
}

/// Parser for `--gtest_list_tests` output
#[derive(Debug, Clone)]
pub struct GTestListParser {
    run_name: String,
    state: ListState,
}

impl GTestListParser {
    /// Create a parser reporting under `run_name`
    #[must_use]
    pub fn new(run_name: impl Into<String>) -> Self {
        Self {
            run_name: run_name.into(),
            state: ListState::default(),
        }
    }

    /// Tests discovered so far
    #[must_use]
    pub fn tests(&self) -> &[TestIdentity] {
        self.state.tests()
    }

    /// Number of tests discovered so far
    #[must_use]
    pub fn test_count(&self) -> usize {
        self.state.tests().len()
    }

    /// The first grammar violation seen so far, if any
    #[must_use]
    pub fn violation(&self) -> Option<&FormatError> {
        self.state.violation()
    }
}

impl OutputParser for GTestListParser {
    fn process_line(&mut self, line: &str) {
        self.state = std::mem::take(&mut self.state).advance(line);
    }

    fn finalize<S>(self, sink: &mut S) -> Result<(), ParseError>
    where
        S: ResultSink + ?Sized,
    {
        let tests = self.state.tests().len();
        let events = self.state.into_events(&self.run_name)?;
        info!(run = %self.run_name, tests, "Parsed test listing");
        emit_all(sink, events)?;
        Ok(())
    }
}
