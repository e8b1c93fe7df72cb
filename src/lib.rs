//! # EMWOS Allocator
//!
//! A preference-aware slot allocator for workflow jobs.
//!
//! Clients ask for exclusive use of one slot from a fixed pool of resources that
//! are grouped into placement domains (`slot3@alpha`, `slot1@bravo`, ...). The
//! scheduler matches waiting jobs to free slots, parks requests that cannot be
//! satisfied yet, and re-evaluates the parked ones whenever a slot is released.
//!
//! ## Scheduling rules
//!
//! - **Ordering**: the waiting job with the lowest execution number is always
//!   considered first; arrival order only breaks ties.
//! - **Placement**: `performance` takes any free slot, `balanced` stays inside the
//!   first half (rounded up) of the groups, `energy` stays inside the first group.
//! - **Strict head**: if the head job has no eligible slot, nobody behind it is
//!   placed in that pass.
//! - **De-duplication**: a well-formed execution number may be queued or
//!   allocated at most once; repeats get a warning and change nothing. Malformed
//!   numbers are scheduled but never treated as duplicates.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use emwos_allocator::core::{Admission, Scheduler};
//! use emwos_allocator::infra::{InMemoryJobQueue, InMemoryMailbox, ResourceLoader, StaticResourceLoader};
//!
//! let pool = StaticResourceLoader::grid(&["alpha", "bravo"], 2).load()?;
//! let scheduler = Scheduler::new(pool, InMemoryJobQueue::new(), InMemoryMailbox::new());
//!
//! if let Admission::Pending(pending) = scheduler.admit("build", "7", Some("energy"))? {
//!     let grant = pending.wait().await?;
//!     println!("{} runs on {}", grant.job, grant.resource);
//! }
//! scheduler.release("build", Some("7"));
//! ```
//!
//! The `emwos-allocator` binary serves the same operations over HTTP; see
//! [`runtime::http`].

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling abstractions: resources, jobs, policies, matching.
pub mod core;
/// Configuration models for the service.
pub mod config;
/// Builders to construct the scheduler from configuration.
pub mod builders;
/// Infrastructure adapters for queues, pending callers and resource loading.
pub mod infra;
/// HTTP runtime and API surface.
pub mod runtime;
/// Shared utilities.
pub mod util;
