//! Core scheduling abstractions: resources, jobs, policies and the matching engine.

pub mod allocation;
pub mod audit;
pub mod error;
pub mod job;
pub mod policy;
pub mod resource;
pub mod scheduler;
pub mod snapshot;

pub use allocation::{Allocation, AllocationTable};
pub use audit::{
    build_audit_event, AuditAction, AuditEvent, AuditSink, InMemoryAuditSink, TracingAuditSink,
};
pub use error::{AppResult, SchedulerError};
pub use job::{ExecutionNumber, JobKey, JobRequest, Preference};
pub use policy::{select_resource, BalancedPolicy, EnergyPolicy, PerformancePolicy, SelectionPolicy};
pub use resource::{compress_resources, Resource, ResourceIndex, ResourcePool};
pub use scheduler::{
    Admission, Delivery, Grant, JobQueue, Mailbox, PendingGrant, ReleaseOutcome, ReleasedResource,
    Scheduler, DUPLICATE_WARNING, RELEASE_NOT_FOUND,
};
pub use snapshot::{AllocationView, OverallState, ServerState};
