//! In-memory implementation of link repository.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::domain::entities::Link;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Link repository backed by a `DashMap`.
///
/// Sharded locks let reads and writes to different ids proceed without
/// blocking each other; the entry API makes create-if-absent atomic.
/// Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryLinkRepository {
    links: DashMap<String, Link>,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn get_link_by_id(&self, id: &str) -> Result<Link, AppError> {
        self.links
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::not_found(id))
    }

    async fn add_link(&self, link: Link) -> Result<(), AppError> {
        match self.links.entry(link.id.clone()) {
            Entry::Occupied(_) => Err(AppError::already_exists(link.id)),
            Entry::Vacant(slot) => {
                slot.insert(link);
                Ok(())
            }
        }
    }

    async fn remove_link_by_id(&self, id: &str) -> Result<(), AppError> {
        self.links
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found(id))
    }
}
