//! # nanolink
//!
//! A small link shortener: a link store on the local filesystem and an
//! HTTP delivery that answers `GET /{id}` with a permanent redirect.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Link entity, repository and id generation traits,
//!   redirect listener options
//! - **Application Layer** ([`application`]) - Link use cases behind [`application::services::LinkApi`]
//! - **Infrastructure Layer** ([`infrastructure`]) - Disk and in-memory stores, random ids
//! - **API Layer** ([`api`]) - Redirect and health handlers, DTOs, and middleware
//! - **Server** ([`server`]) - Listener lifecycle with TLS and graceful shutdown
//!
//! ## Quick Start
//!
//! ```bash
//! # Store a link under a generated id
//! nanolink add https://github.com
//!
//! # Serve redirects on 127.0.0.1:2000
//! nanolink run redirect
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! Listener settings are command-line flags validated by
//! [`domain::redirect::RedirectOptions`].

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;

pub mod config;
pub mod server;
pub mod telemetry;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{LinkApi, LinkService};
    pub use crate::domain::entities::Link;
    pub use crate::domain::redirect::RedirectOptions;
    pub use crate::domain::repositories::LinkRepository;
    pub use crate::error::AppError;
    pub use crate::infrastructure::persistence::{DiskLinkRepository, InMemoryLinkRepository};
    pub use crate::server::{Controller, RedirectController};
    pub use crate::state::AppState;
}
