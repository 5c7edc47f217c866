//! Link creation, lookup and removal.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use crate::domain::entities::Link;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Use-case surface consumed by delivery layers (HTTP, CLI).
///
/// Delivery code depends on this trait rather than on a concrete
/// [`LinkService`], so handlers can be exercised against mocks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkApi: Send + Sync {
    /// Creates a link stamped with the current time.
    async fn add_link(&self, id: &str, location: &str) -> Result<Link, AppError>;

    async fn get_link_by_id(&self, id: &str) -> Result<Link, AppError>;

    async fn remove_link_by_id(&self, id: &str) -> Result<(), AppError>;
}

/// Service enforcing link business rules over any [`LinkRepository`].
///
/// Holds no cached state; every call goes to the repository, and repository
/// errors are returned unchanged.
pub struct LinkService<R: LinkRepository> {
    link_repository: Arc<R>,
}

impl<R: LinkRepository> LinkService<R> {
    /// Creates a new link service.
    pub fn new(link_repository: Arc<R>) -> Self {
        Self { link_repository }
    }
}

#[async_trait]
impl<R: LinkRepository> LinkApi for LinkService<R> {
    /// Builds a [`Link`] with `created_at = now` and persists it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Invalid`] if `id` or `location` is empty.
    /// Propagates [`AppError::AlreadyExists`] and [`AppError::Invalid`] from the repository.
    async fn add_link(&self, id: &str, location: &str) -> Result<Link, AppError> {
        if id.is_empty() {
            return Err(AppError::invalid("link id", "must not be empty"));
        }
        if location.is_empty() {
            return Err(AppError::invalid("location", "must not be empty"));
        }

        let link = Link::new(id, location, Utc::now());
        self.link_repository.add_link(link.clone()).await?;

        info!(id = %link.id, location = %link.location, "Link created");
        Ok(link)
    }

    /// # Errors
    ///
    /// Propagates [`AppError::NotFound`] and [`AppError::Invalid`] from the repository.
    async fn get_link_by_id(&self, id: &str) -> Result<Link, AppError> {
        self.link_repository.get_link_by_id(id).await
    }

    /// # Errors
    ///
    /// Propagates [`AppError::NotFound`] and [`AppError::Invalid`] from the repository.
    async fn remove_link_by_id(&self, id: &str) -> Result<(), AppError> {
        self.link_repository.remove_link_by_id(id).await?;

        info!(id, "Link removed");
        Ok(())
    }
}
