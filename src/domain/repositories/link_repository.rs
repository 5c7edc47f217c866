//! Repository trait for link persistence.

use crate::domain::entities::Link;
use crate::error::AppError;
use async_trait::async_trait;

/// Storage contract for links: read by id, write if absent, delete by id.
///
/// There is no update operation.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::DiskLinkRepository`] - One file per link
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - `DashMap` backed
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_disk.rs`, `tests/repository_memory.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Finds a link by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record exists for `id`.
    /// Returns [`AppError::Invalid`] if the storage slot has the wrong shape.
    async fn get_link_by_id(&self, id: &str) -> Result<Link, AppError>;

    /// Persists a new link.
    ///
    /// Must be atomic with respect to other writers of the same id: of two
    /// concurrent calls, at most one succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::AlreadyExists`] if a record for `link.id` is present.
    /// Returns [`AppError::Invalid`] if the storage slot is malformed.
    async fn add_link(&self, link: Link) -> Result<(), AppError>;

    /// Deletes a link by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record exists for `id`.
    /// Returns [`AppError::Invalid`] if the storage slot is malformed.
    async fn remove_link_by_id(&self, id: &str) -> Result<(), AppError>;
}
