//! Router configuration for the redirect delivery.
//!
//! # Route Structure
//!
//! - `GET /health` - Liveness probe, independent of store contents
//! - `GET /{id}`   - Short link redirect
//!
//! `/health` is a static segment and always wins over `/{id}`, so a link
//! named `health` can be stored but never served.
//!
//! # Middleware
//!
//! - **Request id** - `x-request-id` assigned and echoed back
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{request_id, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Routes with request id and tracing layers, without path normalization.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/{id}", get(redirect_handler))
        .with_state(state)
        .layer(request_id::propagate_layer())
        .layer(tracing::layer())
        .layer(request_id::set_layer())
}

/// Constructs the redirect application served by
/// [`crate::server::RedirectController`].
pub fn redirect_app(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(routes(state))
}
