//! # FMA Core Provider Errors
//!
//! Errors raised by the factory provider driver and by the io-provider
//! registry. Per-field read problems are not errors: they go to the message
//! list of the caller.
use thiserror::Error;

use crate::provider::status::ProviderStatus;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("Provider step failed: {0}")]
    Status(ProviderStatus),

    #[error("An io-provider with id '{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("No io-provider with id '{0}'")]
    NotFound(String),

    #[error("No io-provider is willing to write '{0}'")]
    NoWritableProvider(String),

    #[error("Item '{0}' is not loaded")]
    UnknownItem(String),
}
