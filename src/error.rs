//! Error types for the JudyStore sorted store.

use std::io;

use thiserror::Error;

/// The result type used throughout JudyStore.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for JudyStore operations.
///
/// A lookup miss is not an error: `get` returns `Ok(None)` for absent keys.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O error occurred while dumping or loading a store.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The store could not grow to hold a new or updated entry.
    ///
    /// The operation that raised it had no effect.
    #[error("Allocation failure: {0}")]
    Allocation(String),

    /// An invalid argument was provided.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A value could not be encoded to or decoded from JSON.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A stored value failed to decode.
    #[error("Data corruption: {0}")]
    Corruption(String),
}

impl Error {
    /// Creates a new allocation error.
    pub fn allocation(msg: impl Into<String>) -> Self {
        Error::Allocation(msg.into())
    }

    /// Creates a new invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Creates a new corruption error.
    pub fn corruption(msg: impl Into<String>) -> Self {
        Error::Corruption(msg.into())
    }

    /// Returns `true` for errors caused by the store being unable to grow.
    pub fn is_allocation(&self) -> bool {
        matches!(self, Error::Allocation(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<std::collections::TryReserveError> for Error {
    fn from(err: std::collections::TryReserveError) -> Self {
        Error::Allocation(err.to_string())
    }
}
