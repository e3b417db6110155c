// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for nativelog-parsers

use thiserror::Error;

use crate::event::TestIdentity;

/// Errors returned by a parser's terminal call
#[derive(Debug, Error)]
pub enum ParseError {
    /// The input violated the listing grammar; nothing was emitted
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The sink rejected an event while the parser was emitting
    #[error("Sink rejected event: {0}")]
    Sink(#[from] SinkError),
}

/// A grammar violation in `--gtest_list_tests` output
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid test listing at line {line}: {kind} ({content:?})")]
pub struct FormatError {
    /// 1-based line number of the first offending line
    pub line: usize,
    /// The offending line, verbatim
    pub content: String,
    /// What was wrong with it
    pub kind: FormatErrorKind,
}

/// Classification of listing grammar violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatErrorKind {
    /// A non-indented line that is not a `Suite.` header
    #[error("expected a suite header ending in '.'")]
    NotASuiteHeader,

    /// A suite header consisting of only the trailing '.'
    #[error("suite header has an empty name")]
    EmptySuiteName,

    /// An indented method line before any suite header
    #[error("test method outside of a suite")]
    MethodWithoutSuite,

    /// Whitespace left over after stripping one indentation unit
    #[error("unexpected leading whitespace in test method name")]
    LeadingWhitespace,

    /// The same suite/method pair appeared twice
    #[error("duplicate test {0}")]
    DuplicateTest(TestIdentity),
}

/// Errors raised by a [`ResultSink`](crate::event::ResultSink)
#[derive(Debug, Error)]
pub enum SinkError {
    /// The event arrived out of order for the run lifecycle
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The receiving end of a channel sink has been dropped
    #[error("Event channel closed")]
    Disconnected,

    /// Sink-specific failure (I/O, artifact retrieval, ...)
    #[error("{message}")]
    Other {
        /// Description of the failure
        message: String,
    },
}

/// An event that breaks the run lifecycle state machine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Protocol violation: {event} not allowed while {state}")]
pub struct ProtocolError {
    /// Name of the offending event
    pub event: &'static str,
    /// Description of the collector state when it arrived
    pub state: String,
}

/// A consumer required a metric that the run did not report
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Run {run} is missing required metric {key:?}")]
pub struct MissingMetric {
    /// Run name
    pub run: String,
    /// The metric key that was looked up
    pub key: String,
}
