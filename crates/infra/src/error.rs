use thiserror::Error;

/// Persistence-level failure. Surfaces to callers unmodified.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The target id is not in the store.
    #[error("not found")]
    NotFound,

    /// A record with the same identity already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The backend could not be read or written.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Stored data could not be decoded.
    #[error("corrupt data under key '{key}': {message}")]
    Corrupt { key: String, message: String },
}

impl StoreError {
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn corrupt(key: &str, msg: impl Into<String>) -> Self {
        Self::Corrupt {
            key: key.to_string(),
            message: msg.into(),
        }
    }
}
