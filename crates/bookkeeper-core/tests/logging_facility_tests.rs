#![allow(clippy::unwrap_used, clippy::expect_used)]

use bookkeeper_core::errors::BookkeeperError;
use bookkeeper_core::logging_facility::test_capture::init_test_capture;
use bookkeeper_core::{log_op_end, log_op_error, log_op_start};
use bookkeeper_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name, table = "purchase");

    let events = capture.events();
    let start_events: Vec<_> = events
        .iter()
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_START))
        .collect();

    assert_eq!(start_events.len(), 1);
    assert_eq!(start_events[0].table.as_deref(), Some("purchase"));
    assert_eq!(start_events[0].level, tracing::Level::DEBUG);
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let events = capture.events();
    let end_events: Vec<_> = events
        .iter()
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END))
        .collect();

    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(end_events[0].field("duration_ms"), Some("42"));
}

#[test]
fn test_log_op_error_includes_kind() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = BookkeeperError::UnknownField {
        table: "expense".to_string(),
        field: "colour".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10, table = "expense");

    let events = capture.events();
    let error_events: Vec<_> = events
        .iter()
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END_ERROR))
        .collect();

    assert_eq!(error_events.len(), 1);
    let event = error_events[0];
    assert_eq!(event.field("err_kind"), Some("Query"));
    assert_eq!(event.field("err_code"), Some("ERR_QUERY"));
    assert_eq!(event.table.as_deref(), Some("expense"));
}

#[test]
fn test_assert_event_exists_helper() {
    let capture = init_test_capture();

    log_op_start!("test_assert_helper_unique_4");

    capture.assert_event_exists("test_assert_helper_unique_4", EVENT_START);
    assert_eq!(
        capture.count_events(|e| e.op.as_deref() == Some("test_assert_helper_unique_4")),
        1
    );
}

#[test]
fn test_log_op_error_carries_pk_from_error() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_pk_unique_5";

    let missing = BookkeeperError::NotFound {
        table: "expense".to_string(),
        pk: 9999,
    };
    log_op_error!(op_name, missing, duration_ms = 2, table = "expense");

    let without_pk = BookkeeperError::Internal {
        message: "boom".to_string(),
    };
    log_op_error!(op_name, without_pk, duration_ms = 2);

    let events: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.op.as_deref() == Some(op_name))
        .collect();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].field("pk"), Some("9999"));
    assert_eq!(events[0].field("err_code"), Some("ERR_NOT_FOUND"));
    assert_eq!(events[1].field("pk"), None);
    assert_eq!(events[1].table, None);
}

#[test]
fn test_log_op_end_passes_extra_fields() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_fields_unique_6";

    log_op_end!(op_name, duration_ms = 5, table = "budget", row_count = 3_u64);

    let events = capture.events_for_table("budget");
    let end = events
        .iter()
        .find(|e| e.op.as_deref() == Some(op_name))
        .expect("end event");
    assert_eq!(end.event.as_deref(), Some(EVENT_END));
    assert_eq!(end.field("row_count"), Some("3"));
    assert_eq!(end.field("component"), Some(module_path!()));
}
