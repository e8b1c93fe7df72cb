//! Error types for scheduler operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by scheduler components.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The resource list contained no identifiers.
    #[error("resource pool is empty")]
    EmptyPool,
    /// The same identifier appeared twice in the resource list.
    #[error("duplicate resource identifier `{0}`")]
    DuplicateResource(String),
    /// An identifier did not follow the `slot<N>@<group>` shape.
    #[error("malformed resource identifier `{id}`: {reason}")]
    MalformedResource {
        /// Offending identifier.
        id: String,
        /// What was wrong with it.
        reason: String,
    },
    /// The resource file could not be read.
    #[error("failed to read resources from {}: {source}", path.display())]
    ResourceLoad {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// Queue is full and the request was rejected before queuing.
    #[error("queue full: {0}")]
    QueueFull(String),
    /// A resource was bound while already holding an allocation.
    #[error("resource `{0}` is already allocated")]
    ResourceBusy(String),
    /// The scheduler dropped the completion handle without answering.
    #[error("pending caller for job `{0}` was abandoned")]
    Abandoned(String),
    /// Configuration was rejected.
    #[error("configuration invalid: {0}")]
    Config(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
