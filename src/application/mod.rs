//! Application layer services implementing business logic.
//!
//! Services consume repository traits and expose the [`services::LinkApi`]
//! use-case surface to delivery layers. They never touch storage details
//! such as file paths or serialization.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Link creation, lookup and removal

pub mod services;
