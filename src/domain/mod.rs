//! Domain layer containing business entities and contracts.
//!
//! The domain layer has no dependencies on infrastructure or presentation.
//! Contracts here are implemented by `crate::infrastructure`.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`id_provider`] - Id generation contract
//! - [`redirect`] - Validated options for the redirect delivery

pub mod entities;
pub mod id_provider;
pub mod redirect;
pub mod repositories;
