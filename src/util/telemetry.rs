//! Telemetry helpers for structured logging and tracing.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::core::AppResult;

/// Log file name for a server started at `started`, e.g.
/// `server_2025-03-25T10-04-05-123Z.log`.
pub fn log_file_name(started: DateTime<Utc>) -> String {
    let stamp = started
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
        .replace([':', '.'], "-");
    format!("server_{stamp}.log")
}

/// Initialize tracing. `RUST_LOG` wins over `default_level`.
///
/// When `log_dir` is given, the directory is created and every event is also
/// appended (without ANSI colours) to a file named by [`log_file_name`]; its
/// path is returned. Does nothing if a subscriber is already installed.
pub fn init_tracing(default_level: &str, log_dir: Option<&Path>) -> AppResult<Option<PathBuf>> {
    if tracing::dispatcher::has_been_set() {
        return Ok(None);
    }
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let (file_layer, path) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let path = dir.join(log_file_name(Utc::now()));
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)?;
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file));
            (Some(layer), Some(path))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .try_init()?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn log_file_name_has_no_colons_or_dots_in_stamp() {
        let started = Utc.with_ymd_and_hms(2025, 3, 25, 10, 4, 5).unwrap();
        assert_eq!(log_file_name(started), "server_2025-03-25T10-04-05-000Z.log");
    }
}
