//! HTTP middleware for request processing and observability.

pub mod request_id;
pub mod tracing;
