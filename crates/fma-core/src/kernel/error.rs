//! # FMA Core Kernel Errors
//!
//! Defines the aggregated error type of `fma-core`.
//!
//! [`Error`] wraps the typed error of every subsystem (data, object tree,
//! providers, storage) so that callers crossing subsystem boundaries can use
//! a single [`Result`] alias and `?`.
use std::path::PathBuf;
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

use crate::data::error::DataError;
use crate::object::error::TreeError;
use crate::provider::error::ProviderError;
use crate::storage::error::StorageSystemError;

/// Crate-wide error type
#[derive(Debug, ThisError)]
pub enum Error {
    /// Schema or boxed-value contract violation
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// Object tree structure violation
    #[error("Object tree error: {0}")]
    Tree(#[from] TreeError),

    /// Factory or io-provider failure
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Specific, typed storage system error
    #[error("Storage system error: {0}")]
    StorageSystem(#[from] StorageSystemError),

    /// Generic error with message
    #[error("Error: {0}")]
    Other(String),
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

// Specific code should prefer Error::io with path and operation context.
impl From<std::io::Error> for Error {
    fn from(io_err: std::io::Error) -> Self {
        Error::StorageSystem(StorageSystemError::Io {
            source: io_err,
            path: PathBuf::new(),
            operation: "unknown".to_string(),
        })
    }
}

impl Error {
    /// Build an I/O error carrying the failing operation and path
    pub fn io(source: std::io::Error, operation: impl Into<String>, path: PathBuf) -> Self {
        Error::StorageSystem(StorageSystemError::io(source, operation, path))
    }

    /// Build a storage error for a failed operation that has no I/O source
    pub fn storage(operation: impl Into<String>, path: Option<PathBuf>, message: impl Into<String>) -> Self {
        Error::StorageSystem(StorageSystemError::OperationFailed {
            operation: operation.into(),
            path,
            message: message.into(),
        })
    }
}
