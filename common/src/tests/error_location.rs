use crate::ErrorLocation;
use std::panic::Location;

/// **VALUE**: Verifies that `ErrorLocation::from()` captures file, line, and column.
///
/// **WHY THIS MATTERS**: Every client error carries a location. If capture breaks, a failed
/// export workflow can no longer be traced back to the step that raised it.
#[test]
#[track_caller]
fn given_location_caller_when_error_location_created_then_captures_file_line_column() {
    // GIVEN / WHEN: ErrorLocation built from the caller
    let location = ErrorLocation::from(Location::caller());

    // THEN: File, line and column are populated
    assert!(location.file.contains("error_location.rs"));
    assert!(location.line > 0);
    assert!(location.column > 0);
}

#[test]
fn given_error_location_when_formatted_then_produces_bracketed_format() {
    let location = ErrorLocation {
        file: "src/client/mod.rs",
        line: 42,
        column: 7,
    };

    assert_eq!(location.to_string(), "[src/client/mod.rs:42:7]");
}

#[test]
fn given_track_caller_helper_when_called_then_points_at_this_file() {
    let location = ErrorLocation::caller();

    assert!(location.file.ends_with("error_location.rs"));
}
