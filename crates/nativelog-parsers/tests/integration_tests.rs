// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Integration tests for nativelog-parsers
//!
//! These tests feed captured device output through each parser and check the
//! event sequences and aggregated run results.

use std::path::Path;
use std::sync::mpsc;
use std::thread;

use nativelog_parsers::{
    AVG_ITERATION_TIME_METRIC, GTestListParser, ITERATIONS_METRIC, MetricValue,
    NativeBenchmarkParser, NativeStressParser, OutputParser, ParseError, ResultEvent,
    RunCollector, TestIdentity, line_chunks,
};
use similar_asserts::assert_eq;

/// Get the fixtures directory for test data
fn fixtures_dir() -> std::path::PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    Path::new(&manifest_dir).join("tests/fixtures")
}

fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixtures_dir().join(name))
        .unwrap_or_else(|e| panic!("Failed to read fixture {name}: {e}"))
}

/// Feed `text` in chunks of `chunk` lines and record the events
fn run<P: OutputParser>(mut parser: P, text: &str, chunk: usize) -> Result<Vec<ResultEvent>, ParseError> {
    for lines in line_chunks(text, chunk) {
        parser.feed(lines);
    }
    let mut events: Vec<ResultEvent> = Vec::new();
    parser.finalize(&mut events)?;
    Ok(events)
}

#[test]
fn test_flat_listing_of_23_methods() {
    let events = run(GTestListParser::new("module"), &fixture("gtest_flat_list.txt"), 5)
        .expect("Should parse");

    assert_eq!(events.len(), 2 + 23 * 2);
    assert_eq!(
        events[0],
        ResultEvent::RunStarted {
            name: "module".to_string(),
            test_count: 23,
        }
    );
    assert!(matches!(events.last(), Some(ResultEvent::RunEnded { elapsed_ms: 0, metrics }) if metrics.is_empty()));

    for (i, pair) in events[1..events.len() - 1].chunks(2).enumerate() {
        match pair {
            [
                ResultEvent::TestStarted { test: started },
                ResultEvent::TestEnded { test: ended, metrics },
            ] => {
                assert_eq!(started, ended, "pair {i}");
                assert_eq!(started.suite, "PackageManagerTest");
                assert!(metrics.is_empty());
            }
            other => panic!("unexpected events at pair {i}: {other:?}"),
        }
    }

    match &events[1] {
        ResultEvent::TestStarted { test } => assert_eq!(test.method, "InstallPackage"),
        other => panic!("unexpected first test event {other:?}"),
    }
}

#[test]
fn test_parameterized_names_preserved() {
    let mut collector = RunCollector::new();
    let mut parser = GTestListParser::new("module");
    parser.feed_text(&fixture("gtest_param_list.txt"));
    parser.finalize(&mut collector).expect("Should parse");

    let runs = collector.finish().expect("run closed");
    let run = &runs[0];
    assert_eq!(run.expected_count, 2);
    assert_eq!(
        run.identities(),
        vec![
            &TestIdentity::new("PerInstance/ParamTest", "Run/0"),
            &TestIdentity::new("PerInstance/ParamTest", "Run/1"),
        ]
    );
    assert!(!run.is_failed());
}

#[test]
fn test_chunking_does_not_change_listing_result() {
    let text = fixture("gtest_flat_list.txt");
    let whole = run(GTestListParser::new("module"), &text, usize::MAX).expect("whole");
    for chunk in [1, 2, 7, 23, 24] {
        let chunked = run(GTestListParser::new("module"), &text, chunk).expect("chunked");
        assert_eq!(chunked, whole, "chunk size {chunk}");
    }
}

#[test]
fn test_bad_listing_reaches_no_sink() {
    let text = format!("{}Running main() from gtest_main.cc\n", fixture("gtest_flat_list.txt"));
    let mut collector = RunCollector::new();
    let mut parser = GTestListParser::new("module");
    parser.feed_text(&text);

    match parser.finalize(&mut collector) {
        Err(ParseError::Format(err)) => assert_eq!(err.line, 25),
        other => panic!("expected format error, got {other:?}"),
    }
    assert!(collector.is_idle());
    assert!(collector.runs().is_empty());
}

#[test]
fn test_stress_log() {
    let mut parser = NativeStressParser::new("stress");
    parser.feed_text(&fixture("stress_log.txt"));
    assert_eq!(parser.completed_count(), 5);
    assert_eq!(parser.failed_count(), 1);

    let mut collector = RunCollector::new();
    parser.finalize(&mut collector).expect("never fails");
    let runs = collector.finish().expect("run closed");
    assert_eq!(runs[0].expected_count, 0);
    assert_eq!(
        runs[0].require_metric(ITERATIONS_METRIC).expect("iterations"),
        &MetricValue::Integer(5)
    );
}

#[test]
fn test_benchmark_log() {
    let mut parser = NativeBenchmarkParser::new("bench");
    parser.feed_text(&fixture("benchmark_log.txt"));
    assert_eq!(parser.average_time(), 0.000272995);

    let mut collector = RunCollector::new();
    parser.finalize(&mut collector).expect("never fails");
    let runs = collector.finish().expect("run closed");
    assert_eq!(
        runs[0].require_metric(AVG_ITERATION_TIME_METRIC).expect("avg"),
        &MetricValue::Float(0.000272995)
    );
    assert!(runs[0].require_metric(ITERATIONS_METRIC).is_err());
}

#[test]
fn test_events_cross_thread_in_order() {
    let (mut tx, rx) = mpsc::channel();
    let consumer = thread::spawn(move || {
        let mut collector = RunCollector::new();
        for event in rx {
            collector.accept(event).expect("ordered events");
        }
        collector.finish().expect("run closed")
    });

    let mut parser = GTestListParser::new("module");
    parser.feed_text(&fixture("gtest_flat_list.txt"));
    parser.finalize(&mut tx).expect("Should parse");
    drop(tx);

    let runs = consumer.join().expect("consumer thread");
    assert_eq!(runs[0].tests.len(), 23);
}

#[test]
fn test_run_result_json() {
    let mut parser = NativeStressParser::new("stress");
    parser.feed_text(&fixture("stress_log.txt"));
    let mut collector = RunCollector::new();
    parser.finalize(&mut collector).expect("never fails");
    let runs = collector.finish().expect("run closed");

    let json = serde_json::to_value(&runs[0]).expect("serialize");
    assert!(json["name"] == "stress");
    assert!(json["metrics"]["iterations"] == 5);
    assert!(json["failure"].is_null());
}
