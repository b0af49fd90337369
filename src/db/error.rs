use thiserror::Error;

/// Failures of the persistence layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("failed to prepare storage directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode board snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("stored board snapshot is corrupt: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("store is closed")]
    Closed,
}

impl StoreError {
    /// True when the stored bytes exist but could not be parsed
    pub fn is_corrupt(&self) -> bool {
        matches!(self, StoreError::Decode(_))
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
