use thiserror::Error;

/// Errors related to the core types of the URL shortener.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid short token: {0}")]
    InvalidShortToken(String),
}

/// Failures of a mapping store.
///
/// None of these are retryable: they surface to the caller as an internal
/// error, never as a missing record.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("storage i/o failed: {0}")]
    Io(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage serialization failed: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for StorageError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("no collision-free token left for: {0}")]
    CollisionUnresolved(String),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
