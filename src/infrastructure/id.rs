//! Random id generation.

use rand::Rng;
use tokio_util::sync::CancellationToken;

use crate::domain::id_provider::IdProvider;
use crate::error::AppError;

/// Generates ids made of lowercase ASCII letters.
///
/// Each character is drawn independently and uniformly from `a..=z`. The
/// cancellation token is checked before every character, bounding how long
/// a cancelled caller waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlphabeticIdProvider;

impl AlphabeticIdProvider {
    pub fn new() -> Self {
        Self
    }
}

impl IdProvider for AlphabeticIdProvider {
    fn generate_id(&self, len: usize, cancel: &CancellationToken) -> Result<String, AppError> {
        if cancel.is_cancelled() {
            return Err(AppError::Canceled);
        }

        let mut rng = rand::rng();
        let mut id = String::with_capacity(len);

        for _ in 0..len {
            if cancel.is_cancelled() {
                return Err(AppError::Canceled);
            }
            id.push(char::from(rng.random_range(b'a'..=b'z')));
        }

        Ok(id)
    }
}
