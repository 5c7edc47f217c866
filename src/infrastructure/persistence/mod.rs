//! Link repository implementations.
//!
//! # Repositories
//!
//! - [`DiskLinkRepository`] - One JSON file per link in a directory
//! - [`InMemoryLinkRepository`] - Process-local store for tests and ephemeral runs

pub mod disk_link_repository;
pub mod memory_link_repository;

pub use disk_link_repository::DiskLinkRepository;
pub use memory_link_repository::InMemoryLinkRepository;
