//! Resource loaders: one-shot, fallible sources of the resource pool.

use std::path::{Path, PathBuf};

use crate::core::{ResourcePool, SchedulerError};

/// Supplies the ordered resource list at startup.
pub trait ResourceLoader {
    /// Load and validate the pool.
    fn load(&self) -> Result<ResourcePool, SchedulerError>;
}

/// Reads newline-separated identifiers from a file.
#[derive(Debug, Clone)]
pub struct FileResourceLoader {
    path: PathBuf,
}

impl FileResourceLoader {
    /// Loader for the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path that will be read.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResourceLoader for FileResourceLoader {
    fn load(&self) -> Result<ResourcePool, SchedulerError> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| {
            SchedulerError::ResourceLoad {
                path: self.path.clone(),
                source,
            }
        })?;
        let pool = ResourcePool::parse(&text)?;
        tracing::info!(
            path = %self.path.display(),
            resources = pool.len(),
            groups = pool.groups().len(),
            "resources loaded"
        );
        Ok(pool)
    }
}

/// Serves a fixed list of identifiers; used by tests and embedders.
#[derive(Debug, Clone, Default)]
pub struct StaticResourceLoader {
    ids: Vec<String>,
}

impl StaticResourceLoader {
    /// Loader over the given identifiers.
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// `slots` resources in each of `groups`, group-major, slots numbered from 1.
    pub fn grid(groups: &[&str], slots: u32) -> Self {
        Self::new(
            groups
                .iter()
                .flat_map(|group| (1..=slots).map(move |slot| format!("slot{slot}@{group}"))),
        )
    }
}

impl ResourceLoader for StaticResourceLoader {
    fn load(&self) -> Result<ResourcePool, SchedulerError> {
        ResourcePool::from_ids(&self.ids)
    }
}
