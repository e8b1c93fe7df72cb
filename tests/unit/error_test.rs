//! Tests for error types

use std::path::PathBuf;

use emwos_allocator::core::SchedulerError;

#[test]
fn test_queue_full_error() {
    let err = SchedulerError::QueueFull("max queue depth 2 reached".to_string());
    assert_eq!(format!("{}", err), "queue full: max queue depth 2 reached");
}

#[test]
fn test_empty_pool_error() {
    let err = SchedulerError::EmptyPool;
    assert_eq!(format!("{}", err), "resource pool is empty");
}

#[test]
fn test_malformed_resource_error() {
    let err = SchedulerError::MalformedResource {
        id: "alpha".to_string(),
        reason: "missing `@` separator".to_string(),
    };
    assert_eq!(
        format!("{}", err),
        "malformed resource identifier `alpha`: missing `@` separator"
    );
}

#[test]
fn test_resource_load_error_keeps_source() {
    let err = SchedulerError::ResourceLoad {
        path: PathBuf::from("resources.txt"),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
    };
    assert_eq!(
        format!("{}", err),
        "failed to read resources from resources.txt: no such file"
    );
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_abandoned_error() {
    let err = SchedulerError::Abandoned("job-3".to_string());
    assert_eq!(format!("{}", err), "pending caller for job `job-3` was abandoned");
}
