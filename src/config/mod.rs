//! Configuration models for the allocator service.

pub mod server;

pub use server::{ServerConfig, ENV_PREFIX};
