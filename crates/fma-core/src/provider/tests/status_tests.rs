#![cfg(test)]

use crate::provider::error::ProviderError;
use crate::provider::status::ProviderStatus;

#[test]
fn test_ok_sorts_first() {
    assert!(ProviderStatus::Ok < ProviderStatus::NotWillingToRun);
    assert!(ProviderStatus::WriteError < ProviderStatus::ProgramError);
    assert!(ProviderStatus::Ok.is_ok());
    assert!(!ProviderStatus::DeleteError.is_ok());
}

#[test]
fn test_into_result() {
    assert_eq!(ProviderStatus::Ok.into_result(), Ok(()));
    assert_eq!(
        ProviderStatus::NotWritable.into_result(),
        Err(ProviderError::Status(ProviderStatus::NotWritable))
    );
}

#[test]
fn test_display() {
    assert_eq!(ProviderStatus::NotWillingToRun.to_string(), "provider is not willing to run");
    assert_eq!(
        ProviderError::Status(ProviderStatus::WriteError).to_string(),
        "Provider step failed: write error"
    );
}
