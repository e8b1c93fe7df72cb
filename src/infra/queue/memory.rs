//! In-memory job queue ordered by execution number.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use crate::core::{ExecutionNumber, JobQueue, JobRequest, SchedulerError};

/// Wrapper making a job orderable: lowest execution number first, FIFO among equals.
struct QueuedJob {
    job: JobRequest,
    arrival: u64,
}

impl PartialEq for QueuedJob {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueuedJob {}

impl PartialOrd for QueuedJob {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedJob {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed on both keys: the max-heap top is the smallest number, earliest arrival.
        other
            .job
            .execution_number
            .schedule_cmp(&self.job.execution_number)
            .then_with(|| other.arrival.cmp(&self.arrival))
    }
}

/// In-memory queue storing waiting jobs in a binary heap.
/// Enqueue and dequeue are O(log n); the duplicate check is O(1).
pub struct InMemoryJobQueue {
    max_depth: Option<usize>,
    jobs: BinaryHeap<QueuedJob>,
    executions: HashSet<i64>,
    next_arrival: u64,
}

impl InMemoryJobQueue {
    /// Create an unbounded queue.
    pub fn new() -> Self {
        Self::with_max_depth(None)
    }

    /// Create a queue that rejects jobs beyond `max_depth` when set.
    pub fn with_max_depth(max_depth: Option<usize>) -> Self {
        Self {
            max_depth,
            jobs: BinaryHeap::new(),
            executions: HashSet::new(),
            next_arrival: 0,
        }
    }
}

impl Default for InMemoryJobQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl JobQueue for InMemoryJobQueue {
    fn enqueue(&mut self, job: JobRequest) -> Result<(), SchedulerError> {
        if let Some(max) = self.max_depth {
            if self.jobs.len() >= max {
                return Err(SchedulerError::QueueFull(format!(
                    "max queue depth {max} reached"
                )));
            }
        }
        if let Some(n) = job.execution_number.as_valid() {
            self.executions.insert(n);
        }
        let arrival = self.next_arrival;
        self.next_arrival += 1;
        self.jobs.push(QueuedJob { job, arrival });
        Ok(())
    }

    fn peek(&self) -> Option<&JobRequest> {
        self.jobs.peek().map(|queued| &queued.job)
    }

    fn dequeue(&mut self) -> Option<JobRequest> {
        let queued = self.jobs.pop()?;
        if let Some(n) = queued.job.execution_number.as_valid() {
            self.executions.remove(&n);
        }
        Some(queued.job)
    }

    fn contains(&self, execution: &ExecutionNumber) -> bool {
        execution
            .as_valid()
            .is_some_and(|n| self.executions.contains(&n))
    }

    fn len(&self) -> usize {
        self.jobs.len()
    }

    fn jobs(&self) -> Vec<JobRequest> {
        let mut ordered: Vec<&QueuedJob> = self.jobs.iter().collect();
        ordered.sort_by(|a, b| b.cmp(a));
        ordered.into_iter().map(|queued| queued.job.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Preference;

    fn job(name: &str, exec: &str) -> JobRequest {
        JobRequest::new(name, ExecutionNumber::parse(exec), Preference::Performance)
    }

    #[test]
    fn test_lowest_execution_number_first() {
        let mut q = InMemoryJobQueue::new();
        q.enqueue(job("e", "5")).unwrap();
        q.enqueue(job("c", "3")).unwrap();
        q.enqueue(job("h", "8")).unwrap();

        assert_eq!(q.peek().unwrap().name, "c");
        assert_eq!(q.dequeue().unwrap().name, "c");
        assert_eq!(q.dequeue().unwrap().name, "e");
        assert_eq!(q.dequeue().unwrap().name, "h");
        assert!(q.dequeue().is_none());
    }

    #[test]
    fn test_fifo_within_equal_numbers() {
        let mut q = InMemoryJobQueue::new();
        q.enqueue(job("first", "x")).unwrap();
        q.enqueue(job("second", "y")).unwrap();
        q.enqueue(job("numbered", "100")).unwrap();

        let names: Vec<_> = q.jobs().into_iter().map(|j| j.name).collect();
        assert_eq!(names, ["numbered", "first", "second"]);
        assert_eq!(q.len(), 3);
    }

    #[test]
    fn test_contains_tracks_membership() {
        let mut q = InMemoryJobQueue::new();
        q.enqueue(job("a", "1")).unwrap();
        assert!(q.contains(&ExecutionNumber::Valid(1)));
        q.dequeue();
        assert!(!q.contains(&ExecutionNumber::Valid(1)));
        assert!(q.is_empty());
    }

    #[test]
    fn test_queue_full() {
        let mut q = InMemoryJobQueue::with_max_depth(Some(1));
        q.enqueue(job("a", "1")).unwrap();
        assert!(matches!(
            q.enqueue(job("b", "2")),
            Err(SchedulerError::QueueFull(_))
        ));
        assert!(!q.contains(&ExecutionNumber::Valid(2)));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn test_malformed_numbers_never_match() {
        let mut q = InMemoryJobQueue::new();
        q.enqueue(job("a", "")).unwrap();
        q.enqueue(job("b", "")).unwrap();
        assert!(!q.contains(&ExecutionNumber::parse("")));
        assert_eq!(q.dequeue().unwrap().name, "a");
        assert_eq!(q.dequeue().unwrap().name, "b");
    }
}
