//! Error kinds surfaced by the account and note services.

use store::{StoreError, UploadError, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing, malformed or duplicate field. Shown inline on the form.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Unknown email or wrong password.
    #[error("Invalid email or password")]
    Authentication,
    #[error("File type not supported")]
    UnsupportedFileType(String),
    /// Database or filesystem failure.
    #[error("persistence failure: {0}")]
    Persistence(String),
    #[error("session failure: {0}")]
    Session(#[from] tower_sessions::session::Error),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => AppError::Validation(ValidationError::DuplicateEmail),
            StoreError::Backend(msg) => AppError::Persistence(msg),
        }
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::UnsupportedFileType(name) => AppError::UnsupportedFileType(name),
            UploadError::Io(e) => AppError::Persistence(e.to_string()),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Persistence(err.to_string())
    }
}
