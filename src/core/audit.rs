//! Diagnostic event sinks.
//!
//! Every scheduling decision is recorded as an [`AuditEvent`]. The scheduler only
//! needs an append-only [`AuditSink`]; production wiring uses [`TracingAuditSink`],
//! tests collect events with [`InMemoryAuditSink`].

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::util::clock::now_ms;

/// What the scheduler decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Job accepted into the queue.
    Admitted,
    /// Execution number already queued or allocated.
    Duplicate,
    /// Execution number did not parse; accepted anyway.
    MalformedExecutionNumber,
    /// Unknown preference; scheduled as performance.
    PreferenceFallback,
    /// Queue head matched to a resource.
    Matched,
    /// Queue head has no eligible free resource.
    Blocked,
    /// Allocation removed.
    Released,
    /// Release requested for a job with no allocation.
    ReleaseMissed,
    /// Matched job's caller had already disconnected.
    CallerGone,
    /// Request rejected because the queue is at capacity.
    Rejected,
    /// State summary at the end of a scheduling pass.
    Snapshot,
}

impl AuditAction {
    /// Stable lower-case name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admitted => "admitted",
            Self::Duplicate => "duplicate",
            Self::MalformedExecutionNumber => "malformed_execution_number",
            Self::PreferenceFallback => "preference_fallback",
            Self::Matched => "matched",
            Self::Blocked => "blocked",
            Self::Released => "released",
            Self::ReleaseMissed => "release_missed",
            Self::CallerGone => "caller_gone",
            Self::Rejected => "rejected",
            Self::Snapshot => "snapshot",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit event structure.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    /// Event identifier.
    pub event_id: String,
    /// Decision taken.
    pub action: AuditAction,
    /// Job name, when the event concerns a job.
    pub job: Option<String>,
    /// Execution number as text.
    pub execution_number: Option<String>,
    /// Resource identifier, when one was involved.
    pub resource: Option<String>,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
    /// Additional context.
    pub payload: Option<String>,
}

/// Audit sink abstraction.
pub trait AuditSink: Send {
    /// Record an audit event.
    fn record(&mut self, event: AuditEvent);
}

/// In-memory audit sink for testing and dev.
pub struct InMemoryAuditSink {
    events: VecDeque<AuditEvent>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.iter().cloned().collect()
    }

    /// Stored events with the given action.
    pub fn with_action(&self, action: AuditAction) -> Vec<AuditEvent> {
        self.events
            .iter()
            .filter(|e| e.action == action)
            .cloned()
            .collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, event: AuditEvent) {
        if self.max_events == 0 {
            return;
        }
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// Lets a caller keep a handle on a sink owned by the scheduler.
impl<S: AuditSink> AuditSink for Arc<Mutex<S>> {
    fn record(&mut self, event: AuditEvent) {
        self.lock().record(event);
    }
}

/// Emits one structured `tracing` event per decision.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&mut self, event: AuditEvent) {
        let job = event.job.as_deref().unwrap_or("-");
        let execution = event.execution_number.as_deref().unwrap_or("-");
        let resource = event.resource.as_deref().unwrap_or("-");
        let payload = event.payload.as_deref().unwrap_or("");
        match event.action {
            AuditAction::Duplicate
            | AuditAction::MalformedExecutionNumber
            | AuditAction::PreferenceFallback
            | AuditAction::ReleaseMissed
            | AuditAction::CallerGone
            | AuditAction::Rejected => tracing::warn!(
                action = %event.action,
                job,
                execution,
                resource,
                "{payload}"
            ),
            AuditAction::Snapshot | AuditAction::Blocked => tracing::debug!(
                action = %event.action,
                job,
                execution,
                "{payload}"
            ),
            AuditAction::Admitted | AuditAction::Matched | AuditAction::Released => {
                tracing::info!(
                    action = %event.action,
                    job,
                    execution,
                    resource,
                    "{payload}"
                );
            }
        }
    }
}

/// Helper to build an audit event from context.
pub fn build_audit_event(
    action: AuditAction,
    job: Option<&str>,
    execution_number: Option<String>,
    resource: Option<&str>,
    payload: Option<String>,
) -> AuditEvent {
    AuditEvent {
        event_id: uuid::Uuid::new_v4().to_string(),
        action,
        job: job.map(str::to_string),
        execution_number,
        resource: resource.map(str::to_string),
        created_at_ms: now_ms(),
        payload,
    }
}
