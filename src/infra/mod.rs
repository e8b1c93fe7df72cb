//! Infrastructure adapters for queues, pending callers and resource loading.

pub mod loader;
pub mod mailbox;
pub mod queue;

pub use loader::{FileResourceLoader, ResourceLoader, StaticResourceLoader};
pub use mailbox::InMemoryMailbox;
pub use queue::InMemoryJobQueue;
