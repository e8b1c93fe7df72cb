//! Resource to job bindings.

use std::collections::{BTreeMap, HashMap};

use crate::core::{ExecutionNumber, JobRequest, ResourceIndex, SchedulerError};

/// A job currently holding a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    /// The job served by the resource.
    pub job: JobRequest,
    /// Monotonic counter recording when the binding was made.
    pub seq: u64,
}

/// Single source of truth for "is resource X busy, and by whom".
///
/// Keyed by pool index so iteration follows load order. A second index by
/// well-formed execution number backs the duplicate check.
#[derive(Debug, Default)]
pub struct AllocationTable {
    entries: BTreeMap<ResourceIndex, Allocation>,
    by_execution: HashMap<i64, ResourceIndex>,
    next_seq: u64,
}

impl AllocationTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the resource is bound to a job.
    pub fn is_busy(&self, resource: ResourceIndex) -> bool {
        self.entries.contains_key(&resource)
    }

    /// Whether any allocation carries this execution number. Always `false` for
    /// a malformed number.
    pub fn contains_execution(&self, execution: &ExecutionNumber) -> bool {
        execution
            .as_valid()
            .is_some_and(|n| self.by_execution.contains_key(&n))
    }

    /// Bind a free resource to a job.
    pub fn bind(
        &mut self,
        resource: ResourceIndex,
        resource_id: &str,
        job: JobRequest,
    ) -> Result<(), SchedulerError> {
        if self.is_busy(resource) {
            return Err(SchedulerError::ResourceBusy(resource_id.to_string()));
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        if let Some(n) = job.execution_number.as_valid() {
            self.by_execution.insert(n, resource);
        }
        self.entries.insert(resource, Allocation { job, seq });
        Ok(())
    }

    /// Remove the earliest-made allocation for `name`, optionally also matching
    /// the execution number.
    pub fn release(
        &mut self,
        name: &str,
        execution: Option<&ExecutionNumber>,
    ) -> Option<(ResourceIndex, JobRequest)> {
        let resource = self
            .entries
            .iter()
            .filter(|(_, a)| {
                a.job.name == name && execution.is_none_or(|e| &a.job.execution_number == e)
            })
            .min_by_key(|(_, a)| a.seq)
            .map(|(index, _)| *index)?;
        let allocation = self.entries.remove(&resource)?;
        if let Some(n) = allocation.job.execution_number.as_valid() {
            self.by_execution.remove(&n);
        }
        Some((resource, allocation.job))
    }

    /// Number of busy resources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is allocated.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Allocations in pool order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceIndex, &Allocation)> {
        self.entries.iter().map(|(index, a)| (*index, a))
    }
}
