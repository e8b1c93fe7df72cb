//! Tests for audit sink

use std::sync::Arc;

use emwos_allocator::core::{
    build_audit_event, AuditAction, AuditSink, InMemoryAuditSink, TracingAuditSink,
};
use parking_lot::Mutex;

#[test]
fn test_in_memory_audit_sink() {
    let mut sink = InMemoryAuditSink::new(10);

    let event = build_audit_event(
        AuditAction::Matched,
        Some("job1"),
        Some("7".to_string()),
        Some("slot1@alpha"),
        Some("payload".to_string()),
    );

    sink.record(event);
    assert_eq!(sink.events().len(), 1);

    let events = sink.events();
    assert_eq!(events[0].job.as_deref(), Some("job1"));
    assert_eq!(events[0].execution_number.as_deref(), Some("7"));
    assert_eq!(events[0].resource.as_deref(), Some("slot1@alpha"));
    assert_eq!(events[0].action, AuditAction::Matched);
}

#[test]
fn test_audit_sink_overflow() {
    let mut sink = InMemoryAuditSink::new(2);

    sink.record(build_audit_event(AuditAction::Admitted, Some("a"), None, None, None));
    sink.record(build_audit_event(AuditAction::Admitted, Some("b"), None, None, None));
    sink.record(build_audit_event(AuditAction::Matched, Some("c"), None, None, None));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].job.as_deref(), Some("b")); // First one popped
    assert_eq!(events[1].job.as_deref(), Some("c"));
    assert_eq!(sink.with_action(AuditAction::Matched).len(), 1);
}

#[test]
fn test_build_audit_event() {
    let event = build_audit_event(
        AuditAction::Released,
        Some("job1"),
        None,
        Some("slot2@bravo"),
        Some("result".to_string()),
    );

    assert_eq!(event.action.as_str(), "released");
    assert_eq!(event.payload, Some("result".to_string()));
    assert!(!event.event_id.is_empty());
    assert!(event.created_at_ms > 0);
}

#[test]
fn test_shared_sink_records_through_handle() {
    let shared = Arc::new(Mutex::new(InMemoryAuditSink::new(4)));
    let mut handle: Box<dyn AuditSink> = Box::new(Arc::clone(&shared));
    handle.record(build_audit_event(AuditAction::Snapshot, None, None, None, None));
    assert_eq!(shared.lock().events().len(), 1);
}

#[test]
fn test_tracing_sink_accepts_every_action() {
    let mut sink = TracingAuditSink;
    for action in [
        AuditAction::Admitted,
        AuditAction::Duplicate,
        AuditAction::MalformedExecutionNumber,
        AuditAction::PreferenceFallback,
        AuditAction::Matched,
        AuditAction::Blocked,
        AuditAction::Released,
        AuditAction::ReleaseMissed,
        AuditAction::CallerGone,
        AuditAction::Rejected,
        AuditAction::Snapshot,
    ] {
        sink.record(build_audit_event(action, Some("job"), None, None, None));
    }
}
