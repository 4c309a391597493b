use crate::logger::{client_sink, initialize};

use std::path::Path;

use log::{Level, LevelFilter, Record};
use serial_test::serial;

/// **VALUE**: A client sink writes to its own file without touching the global logger.
///
/// **WHY THIS MATTERS**: Two clients in one process must be able to trace to separate
/// destinations; installing a global logger per client would fail on the second one.
#[test]
fn given_log_file_when_sink_built_then_records_reach_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("client.log");

    let sink = client_sink(Some(&path), LevelFilter::Info).unwrap();
    sink.log(
        &Record::builder()
            .args(format_args!("Request: GET /api/3/alerts"))
            .level(Level::Info)
            .target("fsr_client::http")
            .build(),
    );
    sink.flush();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("Request: GET /api/3/alerts"), "{contents}");
}

#[test]
fn given_level_filter_when_sink_built_then_lower_levels_are_disabled() {
    let sink = client_sink(None, LevelFilter::Warn).unwrap();

    let debug = log::Metadata::builder().level(Level::Debug).build();
    let error = log::Metadata::builder().level(Level::Error).build();

    assert!(!sink.enabled(&debug));
    assert!(sink.enabled(&error));
}

#[test]
fn given_unwritable_log_path_when_sink_built_then_returns_error() {
    let result = client_sink(Some(Path::new("/dev/null/invalid/client.log")), LevelFilter::Info);

    assert!(result.is_err());
}

/// **BUG THIS CATCHES**: A second `initialize` from another component would fail
/// with "logger already set" and abort an otherwise healthy startup.
#[test]
#[serial]
fn given_global_logger_when_initialized_twice_then_second_call_is_noop() {
    let dir = tempfile::tempdir().unwrap();

    initialize(dir.path(), LevelFilter::Info).unwrap();
    initialize(dir.path(), LevelFilter::Debug).unwrap();

    assert!(dir.path().join("fortisoar.log").exists());
}
