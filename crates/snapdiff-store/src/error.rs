/// Errors from snapshot store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend could not be reached or refused the operation.
    #[error("snapshot store unavailable: {0}")]
    Unavailable(String),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The id cannot be used as a storage key.
    #[error("invalid snapshot id: {0:?}")]
    InvalidId(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
