//! Error types shared by the engine and its storage backends

/// Failure talking to an external collaborator (activity store or achievement ledger).
///
/// Reads are idempotent and every ledger write is either a conditional create
/// or keyed by an existing unlock record, so most failures can be retried.
/// See [`StorageError::is_retryable`].
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage lock poisoned")]
    LockPoisoned,

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

impl StorageError {
    /// Whether the caller may retry the failed operation as-is
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::InvalidRecord(_) | Self::Serialization(_))
    }
}

/// A malformed achievement definition, rejected when the catalog is loaded
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Achievement {achievement_id}: unknown requirement type '{kind}'")]
    UnknownRequirement { achievement_id: String, kind: String },

    #[error("Achievement {achievement_id}: requirement '{kind}' is missing field '{field}'")]
    MissingField {
        achievement_id: String,
        kind: String,
        field: &'static str,
    },

    #[error("Achievement {achievement_id}: {message}")]
    InvalidValue {
        achievement_id: String,
        message: String,
    },

    #[error("Achievement {0} is defined more than once")]
    DuplicateId(String),
}

/// Errors returned by the unlock coordinator
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl EngineError {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Storage(e) => e.is_retryable(),
        }
    }
}
