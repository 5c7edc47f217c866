//! Contract for producing identifiers for links created without one.

use crate::error::AppError;
use tokio_util::sync::CancellationToken;

/// Produces fresh link ids.
///
/// Providers make no uniqueness promise. A collision surfaces later as
/// [`AppError::AlreadyExists`] from the repository.
#[cfg_attr(test, mockall::automock)]
pub trait IdProvider: Send + Sync {
    /// Generates an id of exactly `len` characters.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Canceled`] if `cancel` fires before or during
    /// generation. No partial id is returned.
    fn generate_id(&self, len: usize, cancel: &CancellationToken) -> Result<String, AppError>;
}
