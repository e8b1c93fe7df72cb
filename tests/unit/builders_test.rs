//! Tests for builder modules

use std::io::Write;
use std::sync::Arc;

use emwos_allocator::builders::{build_scheduler, build_scheduler_with};
use emwos_allocator::config::ServerConfig;
use emwos_allocator::core::{Admission, InMemoryAuditSink, SchedulerError};
use emwos_allocator::infra::StaticResourceLoader;
use parking_lot::Mutex;

#[test]
fn test_build_from_resource_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "slot1@alpha\nslot2@alpha\nslot1@bravo").unwrap();

    let cfg = ServerConfig {
        resources_file: file.path().to_path_buf(),
        ..ServerConfig::default()
    };
    let scheduler = build_scheduler(&cfg).unwrap();
    assert_eq!(scheduler.pool().len(), 3);
    assert_eq!(scheduler.pool().groups(), ["alpha", "bravo"]);
}

#[test]
fn test_missing_resource_file_is_fatal() {
    let cfg = ServerConfig {
        resources_file: "/definitely/not/here.txt".into(),
        ..ServerConfig::default()
    };
    assert!(matches!(
        build_scheduler(&cfg),
        Err(SchedulerError::ResourceLoad { .. })
    ));
}

#[test]
fn test_invalid_config_is_rejected() {
    let cfg = ServerConfig {
        max_queue_depth: Some(0),
        ..ServerConfig::default()
    };
    let loader = StaticResourceLoader::grid(&["alpha"], 1);
    let sink = Box::new(InMemoryAuditSink::new(8));
    assert!(matches!(
        build_scheduler_with(&cfg, &loader, sink),
        Err(SchedulerError::Config(_))
    ));
}

#[test]
fn test_queue_depth_is_applied() {
    let cfg = ServerConfig {
        max_queue_depth: Some(1),
        ..ServerConfig::default()
    };
    let loader = StaticResourceLoader::grid(&["alpha"], 1);
    let sink = Arc::new(Mutex::new(InMemoryAuditSink::new(64)));
    let scheduler = build_scheduler_with(&cfg, &loader, Box::new(Arc::clone(&sink))).unwrap();

    let _holder = scheduler.admit("a", "1", None).unwrap();
    let _waiting = scheduler.admit("b", "2", None).unwrap();
    assert!(matches!(
        scheduler.admit("c", "3", None),
        Err(SchedulerError::QueueFull(_))
    ));
    assert_eq!(scheduler.snapshot().overall.pending_jobs, 1);
    assert!(matches!(
        scheduler.admit("c", "3", None),
        Err(SchedulerError::QueueFull(_))
    ));
    assert!(!matches!(
        scheduler.admit("b", "2", None).unwrap(),
        Admission::Pending(_)
    ));
}
