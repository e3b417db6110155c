// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! The line feeding contract shared by every parser
//!
//! Output arrives in line-aligned chunks: `feed` may be called any number of
//! times, then `finalize` is called exactly once. `finalize` consumes the
//! parser, so a second terminal call does not compile.

use chrono::{DateTime, Utc};

use crate::error::ParseError;
use crate::event::ResultSink;

/// A parser for one native output format
pub trait OutputParser {
    /// Interpret a single line; line terminators may or may not be present
    fn process_line(&mut self, line: &str);

    /// Interpret a batch of complete lines, in order
    fn feed<I>(&mut self, lines: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        Self: Sized,
    {
        for line in lines {
            self.process_line(line.as_ref());
        }
    }

    /// Split a block of text into lines and feed them
    fn feed_text(&mut self, text: &str)
    where
        Self: Sized,
    {
        self.feed(text.lines());
    }

    /// End parsing and emit the run's events into `sink`
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Format` if the accumulated input is invalid (in
    /// which case nothing was emitted), or `ParseError::Sink` if the sink
    /// rejected an event.
    fn finalize<S>(self, sink: &mut S) -> Result<(), ParseError>
    where
        S: ResultSink + ?Sized,
        Self: Sized;
}

/// Split `text` into batches of at most `lines_per_chunk` lines
///
/// Batches never split a line. A `lines_per_chunk` of 0 is treated as 1.
pub fn line_chunks(text: &str, lines_per_chunk: usize) -> impl Iterator<Item = Vec<&str>> {
    let size = lines_per_chunk.max(1);
    let mut lines = text.lines().peekable();
    std::iter::from_fn(move || {
        lines.peek()?;
        Some(lines.by_ref().take(size).collect())
    })
}

/// Milliseconds elapsed since `started_at`, clamped at zero
pub(crate) fn elapsed_since(started_at: DateTime<Utc>) -> u64 {
    u64::try_from((Utc::now() - started_at).num_milliseconds()).unwrap_or(0)
}
