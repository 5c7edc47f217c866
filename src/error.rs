//! Error vocabulary shared by every layer.
//!
//! Errors are classified where they originate (repository, id generator,
//! option builder) and flow through the service untouched. Only the HTTP
//! boundary collapses them, via [`IntoResponse`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Application-wide error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Lookup or delete target is absent.
    #[error("link not found: {id}")]
    NotFound { id: String },

    /// Create target is already present.
    #[error("link already exists: {id}")]
    AlreadyExists { id: String },

    /// Storage slot has the wrong shape, or an input failed validation.
    #[error("invalid {subject}: {reason}")]
    Invalid { subject: String, reason: String },

    /// Id generation was interrupted by its cancellation token.
    #[error("operation canceled")]
    Canceled,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn already_exists(id: impl Into<String>) -> Self {
        Self::AlreadyExists { id: id.into() }
    }

    pub fn invalid(subject: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            subject: subject.into(),
            reason: reason.into(),
        }
    }

    /// Returns true for [`AppError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Maps errors to bare status codes.
///
/// Redirect consumers only need to tell "not found" from "broken", so every
/// variant other than [`AppError::NotFound`] becomes a 500 with no body.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND.into_response(),
            other => {
                tracing::error!(error = %other, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
