//! The scheduler: admission, release and the matching loop.
//!
//! All mutable state (allocation table, job queue, pending callers and the
//! diagnostics sink) lives in one aggregate behind a single `parking_lot::Mutex`.
//! Admission, release and matching each run start to finish while holding it,
//! so "pick job, pick resource, commit, notify caller" is atomic with respect to
//! every other request. The resource pool itself is immutable and read without
//! locking.
//!
//! Callers never hold a reference into the state. A queued job is answered
//! through a `tokio::sync::oneshot` handle registered in the [`Mailbox`]; the
//! transport awaits the other half ([`PendingGrant`]) outside the lock.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::oneshot;

use crate::core::{
    build_audit_event, select_resource, AllocationTable, AuditAction, AuditSink,
    ExecutionNumber, JobKey, JobRequest, Preference, ResourcePool, SchedulerError, ServerState,
    TracingAuditSink,
};
use crate::infra::{InMemoryJobQueue, InMemoryMailbox};

/// Message returned to a caller whose execution number is already in flight.
pub const DUPLICATE_WARNING: &str =
    "is already allocated a resource or already queued for allocation. Do not send request again.";

/// Message returned when a release finds no allocation.
pub const RELEASE_NOT_FOUND: &str = "Job not found or already released";

/// Abstraction for queue backends.
pub trait JobQueue {
    /// Append a waiting job.
    fn enqueue(&mut self, job: JobRequest) -> Result<(), SchedulerError>;
    /// Job that would be considered next.
    fn peek(&self) -> Option<&JobRequest>;
    /// Remove and return the job that would be considered next.
    fn dequeue(&mut self) -> Option<JobRequest>;
    /// Whether a waiting job carries this execution number. Malformed numbers
    /// never match.
    fn contains(&self, execution: &ExecutionNumber) -> bool;
    /// Current depth.
    fn len(&self) -> usize;
    /// Whether nothing is waiting.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Waiting jobs in the order they would be considered.
    fn jobs(&self) -> Vec<JobRequest>;
}

/// Outcome of delivering a grant to a pending caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The caller received the grant.
    Delivered,
    /// The caller had gone away; the grant was dropped.
    CallerGone,
    /// No caller was registered under the key.
    NoCaller,
}

/// Abstraction for pending-caller registries.
pub trait Mailbox {
    /// Register the completion handle for a queued job.
    fn register(&mut self, key: JobKey, sender: oneshot::Sender<Grant>);
    /// Complete and remove the caller registered under `key`.
    fn deliver(&mut self, key: &JobKey, grant: Grant) -> Delivery;
    /// Number of callers still waiting.
    fn len(&self) -> usize;
    /// Keys of waiting callers as `name-executionNumber`.
    fn keys(&self) -> Vec<String>;
}

/// Successful allocation, as returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Grant {
    /// Allocated resource identifier.
    pub resource: String,
    /// Job name.
    pub job: String,
    /// Execution number.
    pub execution_number: ExecutionNumber,
    /// Preference the job was scheduled under.
    pub preference: Preference,
}

/// Successful release, as returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleasedResource {
    /// Freed resource identifier.
    pub resource: String,
    /// Job name.
    pub job: String,
    /// Execution number of the released allocation.
    pub execution_number: ExecutionNumber,
    /// Always `released`.
    pub status: &'static str,
}

/// Result of an allocation request.
#[derive(Debug)]
pub enum Admission {
    /// The execution number is already queued or allocated; nothing changed.
    Duplicate {
        /// Message for the caller.
        warning: String,
    },
    /// The job was queued; the handle resolves once it is matched.
    Pending(PendingGrant),
}

/// Caller side of a queued job's completion handle.
#[derive(Debug)]
pub struct PendingGrant {
    key: JobKey,
    rx: oneshot::Receiver<Grant>,
}

impl PendingGrant {
    /// Key the caller is registered under.
    pub const fn key(&self) -> &JobKey {
        &self.key
    }

    /// The grant, if the job has already been matched.
    pub fn try_grant(&mut self) -> Option<Grant> {
        self.rx.try_recv().ok()
    }

    /// Wait, without a timeout, until the job is matched.
    pub async fn wait(self) -> Result<Grant, SchedulerError> {
        self.rx
            .await
            .map_err(|_| SchedulerError::Abandoned(self.key.to_string()))
    }
}

/// Result of a release request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The allocation was removed.
    Released(ReleasedResource),
    /// No allocation matched; nothing changed.
    NotFound {
        /// Message for the caller.
        warning: String,
    },
}

struct SchedulerState<Q, M> {
    allocations: AllocationTable,
    queue: Q,
    mailbox: M,
    audit: Box<dyn AuditSink>,
    next_ticket: u64,
}

impl<Q, M> SchedulerState<Q, M> {
    fn record(
        &mut self,
        action: AuditAction,
        job: Option<&JobRequest>,
        resource: Option<&str>,
        payload: Option<String>,
    ) {
        self.audit.record(build_audit_event(
            action,
            job.map(|j| j.name.as_str()),
            job.map(|j| j.execution_number.to_string()),
            resource,
            payload,
        ));
    }
}

/// Matches queued jobs to free resources.
pub struct Scheduler<Q = InMemoryJobQueue, M = InMemoryMailbox> {
    pool: Arc<ResourcePool>,
    state: Mutex<SchedulerState<Q, M>>,
}

impl<Q, M> Scheduler<Q, M>
where
    Q: JobQueue + Send,
    M: Mailbox + Send,
{
    /// Create a scheduler over a loaded pool. Diagnostics go to `tracing` until
    /// [`Scheduler::with_audit`] replaces the sink.
    pub fn new(pool: ResourcePool, queue: Q, mailbox: M) -> Self {
        Self {
            pool: Arc::new(pool),
            state: Mutex::new(SchedulerState {
                allocations: AllocationTable::new(),
                queue,
                mailbox,
                audit: Box::new(TracingAuditSink),
                next_ticket: 1,
            }),
        }
    }

    /// Attach a diagnostics sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.state.get_mut().audit = audit;
        self
    }

    /// The immutable resource pool.
    pub fn pool(&self) -> &ResourcePool {
        &self.pool
    }

    /// Admit a request from raw path segments.
    ///
    /// A malformed execution number or unknown preference is accepted with a
    /// diagnostic. Only a full queue is an error.
    pub fn admit(
        &self,
        name: &str,
        execution: &str,
        preference: Option<&str>,
    ) -> Result<Admission, SchedulerError> {
        let execution_number = ExecutionNumber::parse(execution);
        let (resolved, fell_back) = Preference::resolve(preference);
        let job = JobRequest::new(name, execution_number, resolved);

        let mut state = self.state.lock();
        if !job.execution_number.is_valid() {
            state.record(
                AuditAction::MalformedExecutionNumber,
                Some(&job),
                None,
                Some(format!(
                    "received allocation request for job {name} with invalid execution number `{execution}`; scheduling anyway"
                )),
            );
        }
        if fell_back {
            state.record(
                AuditAction::PreferenceFallback,
                Some(&job),
                None,
                Some(format!(
                    "unknown preference `{}`, defaulting to performance",
                    preference.unwrap_or_default()
                )),
            );
        }
        self.admit_locked(&mut state, job)
    }

    /// Admit an already-typed request.
    pub fn submit(&self, job: JobRequest) -> Result<Admission, SchedulerError> {
        let mut state = self.state.lock();
        self.admit_locked(&mut state, job)
    }

    fn admit_locked(
        &self,
        state: &mut SchedulerState<Q, M>,
        mut job: JobRequest,
    ) -> Result<Admission, SchedulerError> {
        let execution = &job.execution_number;
        if state.allocations.contains_execution(execution) || state.queue.contains(execution) {
            let warning = format!(
                "Requested for Job {} with execution number {} {DUPLICATE_WARNING}",
                job.name, job.execution_number
            );
            state.record(AuditAction::Duplicate, Some(&job), None, Some(warning.clone()));
            return Ok(Admission::Duplicate { warning });
        }

        job.ticket = state.next_ticket;
        if let Err(err) = state.queue.enqueue(job.clone()) {
            state.record(AuditAction::Rejected, Some(&job), None, Some(err.to_string()));
            return Err(err);
        }
        state.next_ticket += 1;
        let (tx, rx) = oneshot::channel();
        let key = job.key();
        state.mailbox.register(key.clone(), tx);
        state.record(
            AuditAction::Admitted,
            Some(&job),
            None,
            Some(format!("job added to queue with preference {}", job.preference)),
        );

        self.run_pass(state);
        Ok(Admission::Pending(PendingGrant { key, rx }))
    }

    /// Release the allocation held by `name`.
    ///
    /// With an execution number only the allocation matching both is released;
    /// without one, the earliest allocation made for that name. The freed
    /// resource is offered to the queue before this returns.
    pub fn release(&self, name: &str, execution: Option<&str>) -> ReleaseOutcome {
        let execution = execution.map(ExecutionNumber::parse);
        let mut state = self.state.lock();

        let Some((index, job)) = state.allocations.release(name, execution.as_ref()) else {
            state.audit.record(build_audit_event(
                AuditAction::ReleaseMissed,
                Some(name),
                execution.as_ref().map(ToString::to_string),
                None,
                Some(format!(
                    "job {name} not found, already released or not in allocated resources"
                )),
            ));
            return ReleaseOutcome::NotFound {
                warning: RELEASE_NOT_FOUND.to_string(),
            };
        };

        let resource = self
            .pool
            .get(index)
            .map(|r| r.id.clone())
            .unwrap_or_default();
        state.record(
            AuditAction::Released,
            Some(&job),
            Some(&resource),
            Some(format!("resource {resource} released from job {}", job.name)),
        );
        self.run_pass(&mut state);

        ReleaseOutcome::Released(ReleasedResource {
            resource,
            job: job.name,
            execution_number: job.execution_number,
            status: "released",
        })
    }

    /// Read-only view of the whole state.
    pub fn snapshot(&self) -> ServerState {
        let state = self.state.lock();
        ServerState::capture(&self.pool, &state.allocations, &state.queue, &state.mailbox)
    }

    /// Match jobs until the queue is empty or its head cannot be placed.
    ///
    /// A blocked head keeps its turn: lower-priority jobs behind it wait even
    /// when they could be placed.
    fn run_pass(&self, state: &mut SchedulerState<Q, M>) -> usize {
        let mut matched = 0;
        while let Some(head) = state.queue.peek().cloned() {
            let Some(index) = select_resource(&self.pool, &state.allocations, head.preference)
            else {
                state.record(
                    AuditAction::Blocked,
                    Some(&head),
                    None,
                    Some(format!(
                        "no resource admitted by the {} policy is free, job waits in queue",
                        head.preference.policy().name()
                    )),
                );
                break;
            };
            let Some(resource) = self.pool.get(index) else {
                break;
            };
            if let Err(err) = state.allocations.bind(index, &resource.id, head.clone()) {
                tracing::error!(error = %err, job = %head.name, "refusing to double-book resource");
                break;
            }
            state.queue.dequeue();

            let grant = Grant {
                resource: resource.id.clone(),
                job: head.name.clone(),
                execution_number: head.execution_number.clone(),
                preference: head.preference,
            };
            let (action, note) = match state.mailbox.deliver(&head.key(), grant) {
                Delivery::Delivered => (AuditAction::Matched, "allocated"),
                Delivery::CallerGone => (
                    AuditAction::CallerGone,
                    "allocated, but the caller disconnected; release is still required",
                ),
                Delivery::NoCaller => (AuditAction::Matched, "allocated with no pending caller"),
            };
            state.record(
                action,
                Some(&head),
                Some(&resource.id),
                Some(format!(
                    "resource {} {note} (preference: {})",
                    resource.id, head.preference
                )),
            );
            matched += 1;
        }

        let summary =
            ServerState::summarize(&self.pool, &state.allocations, &state.queue, &state.mailbox);
        state.record(AuditAction::Snapshot, None, None, Some(summary));
        matched
    }
}
