//! HTTP runtime and API surface.

pub mod api;
pub mod http;

pub use api::{health, ErrorResponse, Health, WarningResponse};
pub use http::{router, serve, with_request_boundary, SharedScheduler};
