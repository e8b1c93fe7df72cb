//! Read-only state dumps for diagnostics.

use serde::Serialize;

use crate::core::{
    compress_resources, AllocationTable, ExecutionNumber, JobQueue, JobRequest, Mailbox,
    ResourcePool,
};

/// Headline counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallState {
    /// Pool size.
    pub total_resources: usize,
    /// Resources with no allocation.
    pub free_resources: usize,
    /// Resources with an allocation.
    pub busy_resources: usize,
    /// Jobs waiting for a resource.
    pub jobs_in_queue: usize,
    /// Callers still waiting for a response.
    pub pending_jobs: usize,
}

/// One row of the allocation table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationView {
    /// Resource identifier.
    pub resource: String,
    /// Job name.
    pub job: String,
    /// Execution number.
    pub execution_number: ExecutionNumber,
}

/// Full snapshot of the scheduler.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerState {
    /// Headline counts.
    pub overall: OverallState,
    /// Free resources in `group@ranges` form.
    pub available_resources: String,
    /// Allocation table in pool order.
    pub allocations: Vec<AllocationView>,
    /// Waiting jobs in scheduling order.
    pub queue: Vec<JobRequest>,
    /// Waiting callers as `name-executionNumber`.
    pub pending: Vec<String>,
}

impl ServerState {
    /// Capture the given structures without mutating them.
    pub fn capture<Q: JobQueue, M: Mailbox>(
        pool: &ResourcePool,
        allocations: &AllocationTable,
        queue: &Q,
        mailbox: &M,
    ) -> Self {
        let free = pool
            .iter()
            .filter(|(index, _)| !allocations.is_busy(*index))
            .map(|(_, resource)| resource);
        let available_resources = compress_resources(free);
        let rows: Vec<AllocationView> = allocations
            .iter()
            .map(|(index, allocation)| AllocationView {
                resource: pool.get(index).map(|r| r.id.clone()).unwrap_or_default(),
                job: allocation.job.name.clone(),
                execution_number: allocation.job.execution_number.clone(),
            })
            .collect();

        Self {
            overall: OverallState::capture(pool, allocations, queue, mailbox),
            available_resources,
            allocations: rows,
            queue: queue.jobs(),
            pending: mailbox.keys(),
        }
    }

    /// One-line summary for logs, built without copying the queue.
    pub fn summarize<Q: JobQueue, M: Mailbox>(
        pool: &ResourcePool,
        allocations: &AllocationTable,
        queue: &Q,
        mailbox: &M,
    ) -> String {
        let free = pool
            .iter()
            .filter(|(index, _)| !allocations.is_busy(*index))
            .map(|(_, resource)| resource);
        OverallState::capture(pool, allocations, queue, mailbox).summary(&compress_resources(free))
    }
}

impl OverallState {
    fn capture<Q: JobQueue, M: Mailbox>(
        pool: &ResourcePool,
        allocations: &AllocationTable,
        queue: &Q,
        mailbox: &M,
    ) -> Self {
        Self {
            total_resources: pool.len(),
            free_resources: pool.len() - allocations.len(),
            busy_resources: allocations.len(),
            jobs_in_queue: queue.len(),
            pending_jobs: mailbox.len(),
        }
    }

    fn summary(&self, available: &str) -> String {
        format!(
            "total={} free={} busy={} queued={} pending={} available=[{available}]",
            self.total_resources,
            self.free_resources,
            self.busy_resources,
            self.jobs_in_queue,
            self.pending_jobs,
        )
    }
}
