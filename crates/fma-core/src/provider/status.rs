use std::fmt;

use crate::provider::error::ProviderError;

/// Outcome of a provider or driver step.
///
/// Ordered from the caller's point of view: anything above `Ok` stops the
/// current item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProviderStatus {
    Ok,
    /// The provider declines to run, e.g. a read-only or locked store
    NotWillingToRun,
    /// The item itself cannot be written by this provider
    NotWritable,
    WriteError,
    DeleteError,
    /// Contract violation; should never happen
    ProgramError,
}

impl ProviderStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, ProviderStatus::Ok)
    }

    /// Convert a non-OK status into an error
    pub fn into_result(self) -> Result<(), ProviderError> {
        match self {
            ProviderStatus::Ok => Ok(()),
            status => Err(ProviderError::Status(status)),
        }
    }
}

impl fmt::Display for ProviderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ProviderStatus::Ok => "ok",
            ProviderStatus::NotWillingToRun => "provider is not willing to run",
            ProviderStatus::NotWritable => "item is not writable",
            ProviderStatus::WriteError => "write error",
            ProviderStatus::DeleteError => "delete error",
            ProviderStatus::ProgramError => "program error",
        };
        write!(f, "{}", text)
    }
}
