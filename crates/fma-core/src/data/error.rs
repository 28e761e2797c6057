//! # FMA Core Data Errors
//!
//! Schema and boxed-value contract violations. These are programming errors:
//! they are logged where they are detected and returned to the caller, which
//! neutralizes them to a safe default.
use thiserror::Error;

use crate::data::types::BoxedType;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("Unknown boxed type: {0}")]
    UnknownType(String),

    #[error("Unknown field '{name}' for a {kind}")]
    UnknownField { kind: String, name: String },

    #[error("Type mismatch on field '{field}': expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: BoxedType,
        actual: BoxedType,
    },

    #[error("Unable to parse '{text}' as {kind} for field '{field}'")]
    Parse {
        field: String,
        kind: BoxedType,
        text: String,
    },

    #[error("Object handle is stale or was never allocated")]
    DisposedObject,
}
