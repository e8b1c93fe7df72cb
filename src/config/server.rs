//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Environment variable prefix for [`ServerConfig::from_env`].
pub const ENV_PREFIX: &str = "EMWOS_";

/// Root configuration for the allocator service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    pub listen_addr: SocketAddr,
    /// Newline-separated resource identifiers.
    pub resources_file: PathBuf,
    /// Directory for the per-start log file; `None` logs to stdout only.
    pub log_dir: Option<PathBuf>,
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Reject allocation requests beyond this many waiting jobs.
    pub max_queue_depth: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            resources_file: PathBuf::from("resources.txt"),
            log_dir: Some(PathBuf::from("logs")),
            log_level: "info".to_string(),
            max_queue_depth: None,
        }
    }
}

impl ServerConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.resources_file.as_os_str().is_empty() {
            return Err("resources_file must not be empty".into());
        }
        if self.log_level.trim().is_empty() {
            return Err("log_level must not be empty".into());
        }
        if self.max_queue_depth == Some(0) {
            return Err("max_queue_depth must be greater than 0 when set".into());
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read `EMWOS_*` environment variables over the defaults and validate.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(format!("{ENV_PREFIX}{key}")).ok())
    }

    /// Build from a key lookup (keys without prefix) over the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(addr) = lookup("LISTEN_ADDR") {
            cfg.listen_addr = addr
                .parse()
                .map_err(|e| format!("LISTEN_ADDR `{addr}` invalid: {e}"))?;
        }
        if let Some(path) = lookup("RESOURCES_FILE") {
            cfg.resources_file = PathBuf::from(path);
        }
        if let Some(dir) = lookup("LOG_DIR") {
            cfg.log_dir = (!dir.trim().is_empty()).then(|| PathBuf::from(dir));
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            cfg.log_level = level;
        }
        if let Some(depth) = lookup("MAX_QUEUE_DEPTH") {
            let depth = depth
                .parse()
                .map_err(|e| format!("MAX_QUEUE_DEPTH `{depth}` invalid: {e}"))?;
            cfg.max_queue_depth = Some(depth);
        }
        cfg.validate()?;
        Ok(cfg)
    }
}
