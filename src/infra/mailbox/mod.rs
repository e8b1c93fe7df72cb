//! Pending-caller registries.

pub mod memory;

pub use memory::InMemoryMailbox;
