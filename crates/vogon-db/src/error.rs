use vogon_types::TypeError;

/// Errors from storage engine operations.
///
/// The first three variants are the protocol outcomes callers are expected to
/// match on. The rest come from the backend and are propagated unchanged.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// The supplied `id` or `revision` did not match the stored object, or the
    /// object already exists and replacing was not allowed.
    #[error("{0}")]
    Conflict(String),

    /// No object with that name exists.
    #[error("{0}")]
    DoesNotExist(String),

    /// A `revision` was supplied without an `id`.
    #[error("{0}")]
    InvalidPrecondition(String),

    /// The object name cannot be used as a key.
    #[error(transparent)]
    InvalidName(#[from] TypeError),

    /// A persisted document could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An in-process lock was poisoned by a panicking thread.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

impl DbError {
    /// Returns `true` for [`DbError::Conflict`].
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    /// Returns `true` for [`DbError::DoesNotExist`].
    pub fn is_does_not_exist(&self) -> bool {
        matches!(self, Self::DoesNotExist(_))
    }
}

/// Result alias for storage engine operations.
pub type DbResult<T> = Result<T, DbError>;
