//! Link entity representing a short id to destination mapping.

use chrono::{DateTime, Utc};

/// A persisted mapping from a short id to a destination URL.
///
/// Links are immutable once created: there is no update path, changing a
/// destination means removing the link and adding it again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Lookup key, also used to name the backing record.
    pub id: String,
    /// Destination URL. Opaque to the system and never validated.
    pub location: String,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(id: impl Into<String>, location: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            location: location.into(),
            created_at,
        }
    }
}
