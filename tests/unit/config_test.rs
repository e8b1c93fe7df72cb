//! Tests for configuration validation

use std::collections::HashMap;
use std::path::PathBuf;

use emwos_allocator::config::ServerConfig;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_defaults_are_valid() {
    let cfg = ServerConfig::default();
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.listen_addr.port(), 8000);
    assert_eq!(cfg.resources_file, PathBuf::from("resources.txt"));
    assert_eq!(cfg.log_dir, Some(PathBuf::from("logs")));
    assert_eq!(cfg.max_queue_depth, None);
}

#[test]
fn test_zero_queue_depth_is_invalid() {
    let cfg = ServerConfig {
        max_queue_depth: Some(0),
        ..ServerConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_empty_resources_file_is_invalid() {
    let cfg = ServerConfig {
        resources_file: PathBuf::new(),
        ..ServerConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_config_from_json() {
    let json = r#"{
        "listen_addr": "127.0.0.1:9100",
        "resources_file": "/etc/emwos/resources.txt",
        "log_dir": null,
        "max_queue_depth": 64
    }"#;

    let cfg = ServerConfig::from_json_str(json).unwrap();
    assert_eq!(cfg.listen_addr.port(), 9100);
    assert_eq!(cfg.log_dir, None);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.max_queue_depth, Some(64));
}

#[test]
fn test_config_from_json_rejects_garbage() {
    assert!(ServerConfig::from_json_str("{ not json").is_err());
    assert!(ServerConfig::from_json_str(r#"{"max_queue_depth": 0}"#).is_err());
}

#[test]
fn test_config_from_lookup() {
    let cfg = ServerConfig::from_lookup(lookup(&[
        ("LISTEN_ADDR", "127.0.0.1:8123"),
        ("RESOURCES_FILE", "pool.txt"),
        ("LOG_DIR", ""),
        ("LOG_LEVEL", "debug"),
        ("MAX_QUEUE_DEPTH", "10"),
    ]))
    .unwrap();
    assert_eq!(cfg.listen_addr.port(), 8123);
    assert_eq!(cfg.resources_file, PathBuf::from("pool.txt"));
    assert_eq!(cfg.log_dir, None);
    assert_eq!(cfg.log_level, "debug");
    assert_eq!(cfg.max_queue_depth, Some(10));
}

#[test]
fn test_config_from_lookup_rejects_bad_values() {
    assert!(ServerConfig::from_lookup(lookup(&[("LISTEN_ADDR", "nowhere")])).is_err());
    assert!(ServerConfig::from_lookup(lookup(&[("MAX_QUEUE_DEPTH", "-1")])).is_err());
    assert_eq!(
        ServerConfig::from_lookup(lookup(&[])).unwrap(),
        ServerConfig::default()
    );
}
