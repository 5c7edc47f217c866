//! HTTP redirect delivery.
//!
//! Translates `GET /{id}` requests into link lookups and answers with a
//! permanent redirect, a not-found page or a bare error status.
//!
//! # Modules
//!
//! - [`dto`] - Response bodies
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Request id and tracing layers
//! - [`routes`] - Route configuration

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
