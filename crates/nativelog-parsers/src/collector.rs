// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! A sink that enforces the run lifecycle and aggregates [`RunResult`]s
//!
//! The accepted sequence per run is
//! `RunStarted (TestStarted [TestFailed] TestEnded)* RunEnded`, with
//! `RunFailed` allowed anywhere between `RunStarted` and `RunEnded`. After
//! `RunEnded` the collector is idle again and accepts another run.

use tracing::debug;

use crate::error::{ProtocolError, SinkError};
use crate::event::{ResultEvent, ResultSink, TestIdentity};
use crate::result::{RunResult, TestOutcome, TestResult};

#[derive(Debug)]
enum State {
    Idle,
    Running(RunResult),
    InTest {
        run: RunResult,
        test: TestIdentity,
        failure: Option<String>,
    },
}

impl State {
    fn describe(&self) -> String {
        match self {
            Self::Idle => "idle".to_string(),
            Self::Running(run) => format!("run {} is open", run.name),
            Self::InTest { test, .. } => format!("test {test} is open"),
        }
    }
}

/// Validating, aggregating sink
#[derive(Debug)]
pub struct RunCollector {
    state: State,
    finished: Vec<RunResult>,
}

impl RunCollector {
    /// Create an idle collector
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: State::Idle,
            finished: Vec::new(),
        }
    }

    /// Runs that have seen `RunEnded`, in order
    #[must_use]
    pub fn runs(&self) -> &[RunResult] {
        &self.finished
    }

    /// Check whether a run is currently open
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self.state, State::Idle)
    }

    /// Accept one event
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the event is not allowed in the current
    /// state. The collector is left unchanged in that case.
    pub fn accept(&mut self, event: ResultEvent) -> Result<(), ProtocolError> {
        let kind = event.kind();
        let state = std::mem::replace(&mut self.state, State::Idle);

        let next = match (state, event) {
            (State::Idle, ResultEvent::RunStarted { name, test_count }) => {
                debug!(run = %name, test_count, "Run started");
                Ok(State::Running(RunResult::new(name, test_count)))
            }
            (State::Running(run), ResultEvent::TestStarted { test }) => Ok(State::InTest {
                run,
                test,
                failure: None,
            }),
            (
                State::InTest {
                    run,
                    test,
                    failure: None,
                },
                ResultEvent::TestFailed {
                    test: failed,
                    message,
                },
            ) if failed == test => Ok(State::InTest {
                run,
                test,
                failure: Some(message),
            }),
            (
                State::InTest {
                    mut run,
                    test,
                    failure,
                },
                ResultEvent::TestEnded {
                    test: ended,
                    metrics,
                },
            ) if ended == test => {
                let outcome = if failure.is_some() {
                    TestOutcome::Failed
                } else {
                    TestOutcome::Passed
                };
                run.tests.push(TestResult {
                    test,
                    outcome,
                    metrics,
                    failure,
                });
                Ok(State::Running(run))
            }
            (State::Running(mut run), ResultEvent::RunFailed { message }) => {
                debug!(run = %run.name, reason = %message, "Run marked failed");
                run.failure.get_or_insert(message);
                Ok(State::Running(run))
            }
            (
                State::InTest {
                    mut run,
                    test,
                    failure,
                },
                ResultEvent::RunFailed { message },
            ) => {
                debug!(run = %run.name, reason = %message, "Run marked failed");
                run.failure.get_or_insert(message);
                Ok(State::InTest { run, test, failure })
            }
            (
                State::Running(mut run),
                ResultEvent::RunEnded {
                    elapsed_ms,
                    metrics,
                },
            ) => {
                run.elapsed_ms = elapsed_ms;
                run.metrics.extend(metrics);
                debug!(
                    run = %run.name,
                    tests = run.tests.len(),
                    failed = run.is_failed(),
                    "Run ended"
                );
                self.finished.push(run);
                Ok(State::Idle)
            }
            (state, _) => Err((state, kind)),
        };

        match next {
            Ok(state) => {
                self.state = state;
                Ok(())
            }
            Err((state, event)) => {
                let err = ProtocolError {
                    event,
                    state: state.describe(),
                };
                self.state = state;
                Err(err)
            }
        }
    }

    /// Finish collecting and return every completed run
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if a run was started but never ended.
    pub fn finish(self) -> Result<Vec<RunResult>, ProtocolError> {
        if self.is_idle() {
            Ok(self.finished)
        } else {
            Err(ProtocolError {
                event: "finish",
                state: self.state.describe(),
            })
        }
    }
}

impl Default for RunCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultSink for RunCollector {
    fn handle(&mut self, event: ResultEvent) -> Result<(), SinkError> {
        self.accept(event).map_err(SinkError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use crate::event::Metrics;
    use similar_asserts::assert_eq;
    use tracing_subscriber::fmt::MakeWriter;

    fn id(method: &str) -> TestIdentity {
        TestIdentity::new("Suite", method)
    }

    fn started(name: &str, test_count: usize) -> ResultEvent {
        ResultEvent::RunStarted {
            name: name.to_string(),
            test_count,
        }
    }

    fn ended() -> ResultEvent {
        ResultEvent::RunEnded {
            elapsed_ms: 5,
            metrics: Metrics::new(),
        }
    }

    #[test]
    fn test_collects_passed_and_failed_tests() {
        let mut collector = RunCollector::new();
        for event in [
            started("run", 2),
            ResultEvent::TestStarted { test: id("a") },
            ResultEvent::TestEnded {
                test: id("a"),
                metrics: Metrics::new(),
            },
            ResultEvent::TestStarted { test: id("b") },
            ResultEvent::TestFailed {
                test: id("b"),
                message: "crashed".to_string(),
            },
            ResultEvent::TestEnded {
                test: id("b"),
                metrics: Metrics::new(),
            },
            ended(),
        ] {
            collector.accept(event).expect("valid sequence");
        }

        let runs = collector.finish().expect("closed");
        assert_eq!(runs.len(), 1);
        let run = &runs[0];
        assert_eq!(run.expected_count, 2);
        assert_eq!(run.elapsed_ms, 5);
        assert!(run.tests[0].passed());
        assert!(run.tests[1].failed());
        assert_eq!(run.tests[1].failure.as_deref(), Some("crashed"));
        assert!(run.is_failed());
    }

    #[test]
    fn test_run_failed_survives_run_ended() {
        let mut collector = RunCollector::new();
        collector.accept(started("run", 0)).expect("start");
        collector
            .accept(ResultEvent::RunFailed {
                message: "device lost".to_string(),
            })
            .expect("fail");
        collector.accept(ended()).expect("end");

        let run = &collector.runs()[0];
        assert!(run.is_failed());
        assert_eq!(run.failure.as_deref(), Some("device lost"));
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("log buffer").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_run_failure_reason_is_logged() {
        let logs = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let mut collector = RunCollector::new();
            collector.accept(started("run", 0)).expect("start");
            collector
                .accept(ResultEvent::RunFailed {
                    message: "device lost".to_string(),
                })
                .expect("fail");
        });

        let output = String::from_utf8(logs.0.lock().expect("log buffer").clone()).expect("utf8");
        assert!(output.contains("Run marked failed"), "{output}");
        assert!(output.contains("reason=device lost"), "{output}");
    }

    #[test]
    fn test_first_run_failure_message_wins() {
        let mut collector = RunCollector::new();
        collector.accept(started("run", 0)).expect("start");
        for message in ["first", "second"] {
            collector
                .accept(ResultEvent::RunFailed {
                    message: message.to_string(),
                })
                .expect("fail");
        }
        collector.accept(ended()).expect("end");
        assert_eq!(collector.runs()[0].failure.as_deref(), Some("first"));
    }

    #[test]
    fn test_rejects_event_before_run_started() {
        let mut collector = RunCollector::new();
        let err = collector
            .accept(ResultEvent::TestStarted { test: id("a") })
            .unwrap_err();
        assert_eq!(err.event, "test_started");
        assert_eq!(err.state, "idle");
        assert!(collector.is_idle());
    }

    #[test]
    fn test_rejects_duplicate_run_started() {
        let mut collector = RunCollector::new();
        collector.accept(started("run", 0)).expect("start");
        assert!(collector.accept(started("run", 0)).is_err());
        // still open, so the original run can be completed
        collector.accept(ended()).expect("end");
        assert_eq!(collector.runs().len(), 1);
    }

    #[test]
    fn test_rejects_mismatched_test_ended() {
        let mut collector = RunCollector::new();
        collector.accept(started("run", 1)).expect("start");
        collector
            .accept(ResultEvent::TestStarted { test: id("a") })
            .expect("test start");
        let err = collector
            .accept(ResultEvent::TestEnded {
                test: id("b"),
                metrics: Metrics::new(),
            })
            .unwrap_err();
        assert_eq!(err.event, "test_ended");
    }

    #[test]
    fn test_rejects_nested_test_started() {
        let mut collector = RunCollector::new();
        collector.accept(started("run", 2)).expect("start");
        collector
            .accept(ResultEvent::TestStarted { test: id("a") })
            .expect("test start");
        assert!(
            collector
                .accept(ResultEvent::TestStarted { test: id("b") })
                .is_err()
        );
    }

    #[test]
    fn test_rejects_run_ended_with_open_test() {
        let mut collector = RunCollector::new();
        collector.accept(started("run", 1)).expect("start");
        collector
            .accept(ResultEvent::TestStarted { test: id("a") })
            .expect("test start");
        assert!(collector.accept(ended()).is_err());
        assert!(collector.finish().is_err());
    }

    #[test]
    fn test_rejects_second_test_failed() {
        let mut collector = RunCollector::new();
        collector.accept(started("run", 1)).expect("start");
        collector
            .accept(ResultEvent::TestStarted { test: id("a") })
            .expect("test start");
        let failed = ResultEvent::TestFailed {
            test: id("a"),
            message: "x".to_string(),
        };
        collector.accept(failed.clone()).expect("first failure");
        assert!(collector.accept(failed).is_err());
    }

    #[test]
    fn test_accepts_consecutive_runs() {
        let mut collector = RunCollector::new();
        for name in ["first", "second"] {
            collector.accept(started(name, 0)).expect("start");
            collector.accept(ended()).expect("end");
        }
        let names: Vec<_> = collector
            .finish()
            .expect("closed")
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["first", "second"]);
    }
}
