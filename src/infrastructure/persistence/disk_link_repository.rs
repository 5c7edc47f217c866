//! File-per-link repository.
//!
//! Each link lives in `<dir>/<id>.json` holding `{ location, created_at }`.
//! The id is not duplicated inside the payload; it is recovered from the
//! lookup key.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::domain::entities::Link;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Extension appended to the id to form a record file name.
pub const RECORD_EXTENSION: &str = "json";

const TEMP_EXTENSION: &str = "tmp";

/// Longest file name most filesystems accept, in bytes.
const MAX_FILE_NAME_LEN: usize = 255;

/// On-disk shape of a link.
#[derive(Debug, Serialize, Deserialize)]
struct LinkRecord {
    location: String,
    created_at: DateTime<Utc>,
}

impl From<&Link> for LinkRecord {
    fn from(link: &Link) -> Self {
        Self {
            location: link.location.clone(),
            created_at: link.created_at,
        }
    }
}

/// What currently occupies the slot for an id.
#[derive(Debug, PartialEq, Eq)]
enum Slot {
    Absent,
    Record,
    /// Something other than a regular file, e.g. a directory.
    Malformed,
}

/// Repository storing one JSON file per link inside a directory.
///
/// Creation writes to a private temp file, syncs it, then publishes it with
/// `hard_link`. Linking fails atomically if the target exists, so concurrent
/// creators of one id cannot both succeed and readers never observe a
/// partially written record.
#[derive(Debug, Clone)]
pub struct DiskLinkRepository {
    dir: PathBuf,
}

impl DiskLinkRepository {
    /// Opens a repository rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Io`] if the directory cannot be created.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        debug!(dir = %dir.display(), "Opened disk link repository");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, id: &str) -> Result<PathBuf, AppError> {
        validate_id(id)?;
        Ok(self.dir.join(format!("{id}.{RECORD_EXTENSION}")))
    }

    /// Temp names depend only on a nonce, so any id short enough for a
    /// record name can also be staged.
    fn temp_path(&self) -> PathBuf {
        let nonce: u64 = rand::random();
        self.dir.join(format!(".{nonce:016x}.{TEMP_EXTENSION}"))
    }

    #[cfg(unix)]
    async fn sync_dir(&self) {
        match fs::File::open(&self.dir).await {
            Ok(dir) => {
                if let Err(e) = dir.sync_all().await {
                    warn!(error = %e, "Failed to sync link directory");
                }
            }
            Err(e) => warn!(error = %e, "Failed to open link directory for sync"),
        }
    }

    #[cfg(not(unix))]
    async fn sync_dir(&self) {}
}

/// Rejects ids that would not map to a single file inside the directory.
fn validate_id(id: &str) -> Result<(), AppError> {
    if id.is_empty() {
        return Err(AppError::invalid("link id", "must not be empty"));
    }

    if id == "." || id == ".." || id.contains(['/', '\\', '\0']) {
        return Err(AppError::invalid(
            "link id",
            format!("'{id}' is not a safe path segment"),
        ));
    }

    let record_name_len = id.len() + 1 + RECORD_EXTENSION.len();
    if record_name_len > MAX_FILE_NAME_LEN {
        return Err(AppError::invalid(
            "link id",
            format!(
                "{} bytes is too long, at most {} allowed",
                id.len(),
                MAX_FILE_NAME_LEN - 1 - RECORD_EXTENSION.len()
            ),
        ));
    }

    Ok(())
}

async fn inspect(path: &Path) -> Result<Slot, AppError> {
    match fs::metadata(path).await {
        Ok(meta) if meta.is_file() => Ok(Slot::Record),
        Ok(_) => Ok(Slot::Malformed),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Slot::Absent),
        Err(e) => Err(e.into()),
    }
}

fn malformed(id: &str) -> AppError {
    AppError::invalid("link", format!("storage slot for '{id}' is not a regular file"))
}

async fn write_synced(path: &Path, payload: &[u8]) -> io::Result<()> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    file.write_all(payload).await?;
    file.sync_all().await
}

async fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path).await
        && e.kind() != io::ErrorKind::NotFound
    {
        warn!(path = %path.display(), error = %e, "Failed to remove temp file");
    }
}

#[async_trait]
impl LinkRepository for DiskLinkRepository {
    async fn get_link_by_id(&self, id: &str) -> Result<Link, AppError> {
        let path = self.record_path(id)?;

        match inspect(&path).await? {
            Slot::Absent => return Err(AppError::not_found(id)),
            Slot::Malformed => return Err(malformed(id)),
            Slot::Record => {}
        }

        let data = match fs::read(&path).await {
            Ok(data) => data,
            // removed between stat and read
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(AppError::not_found(id)),
            Err(e) => return Err(e.into()),
        };

        let record: LinkRecord = serde_json::from_slice(&data)?;
        Ok(Link::new(id, record.location, record.created_at))
    }

    async fn add_link(&self, link: Link) -> Result<(), AppError> {
        let path = self.record_path(&link.id)?;

        match inspect(&path).await? {
            Slot::Record => return Err(AppError::already_exists(&link.id)),
            Slot::Malformed => return Err(malformed(&link.id)),
            Slot::Absent => {}
        }

        let payload = serde_json::to_vec_pretty(&LinkRecord::from(&link))?;

        let temp = self.temp_path();
        if let Err(e) = write_synced(&temp, &payload).await {
            discard(&temp).await;
            return Err(e.into());
        }

        let published = fs::hard_link(&temp, &path).await;
        discard(&temp).await;

        match published {
            Ok(()) => {
                self.sync_dir().await;
                debug!(id = %link.id, "Link persisted");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => match inspect(&path).await? {
                Slot::Malformed => Err(malformed(&link.id)),
                _ => Err(AppError::already_exists(&link.id)),
            },
            Err(e) => Err(e.into()),
        }
    }

    async fn remove_link_by_id(&self, id: &str) -> Result<(), AppError> {
        let path = self.record_path(id)?;

        match inspect(&path).await? {
            Slot::Absent => return Err(AppError::not_found(id)),
            Slot::Malformed => return Err(malformed(id)),
            Slot::Record => {}
        }

        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(id, "Link removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(AppError::not_found(id)),
            Err(e) => Err(e.into()),
        }
    }
}
