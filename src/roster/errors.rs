use thiserror::Error;

/// Errors that can arise while interacting with the roster storage layer.
#[derive(Debug, Error)]
pub enum RosterError {
    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around JSON serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Wrapper around IO errors (directory creation, portrait files, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Returned when fetching a record that is not present.
    #[error("record not found: {0}")]
    NotFound(String),

    /// A persisted value could not be decoded; the stored text is kept
    /// untouched so it can be inspected, but the read returns this.
    #[error("corrupt value under key {key}: {reason}")]
    Corrupt { key: String, reason: String },

    /// A raid or difficulty that the catalog does not define.
    #[error("unknown raid selection: {0}")]
    UnknownRaid(String),
}
