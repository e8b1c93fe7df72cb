//! Builders to construct a scheduler from configuration.

use crate::config::ServerConfig;
use crate::core::{AuditSink, Scheduler, SchedulerError, TracingAuditSink};
use crate::infra::{FileResourceLoader, InMemoryJobQueue, InMemoryMailbox, ResourceLoader};

/// Load the configured resource file and build a scheduler that logs its
/// decisions through `tracing`.
pub fn build_scheduler(cfg: &ServerConfig) -> Result<Scheduler, SchedulerError> {
    build_scheduler_with(
        cfg,
        &FileResourceLoader::new(&cfg.resources_file),
        Box::new(TracingAuditSink),
    )
}

/// Build a scheduler from an arbitrary loader and diagnostics sink.
///
/// Fails if the configuration is invalid or the pool cannot be loaded; neither
/// is recoverable, so callers should not start serving.
pub fn build_scheduler_with<L>(
    cfg: &ServerConfig,
    loader: &L,
    audit: Box<dyn AuditSink>,
) -> Result<Scheduler, SchedulerError>
where
    L: ResourceLoader + ?Sized,
{
    cfg.validate().map_err(SchedulerError::Config)?;
    let pool = loader.load()?;
    let queue = InMemoryJobQueue::with_max_depth(cfg.max_queue_depth);
    Ok(Scheduler::new(pool, queue, InMemoryMailbox::new()).with_audit(audit))
}
