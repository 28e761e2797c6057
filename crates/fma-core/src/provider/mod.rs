//! # FMA Core Provider
//!
//! The factory provider protocol: a backend reads and writes one elementary
//! value at a time while the generic driver walks the schema, runs the kind
//! hooks and migrates legacy fields.
pub mod driver;
pub mod error;
pub mod migration;
pub mod status;
pub mod traits;

pub use driver::{read_item, write_item};
pub use error::ProviderError;
pub use migration::migrate_obsoleted;
pub use status::ProviderStatus;
pub use traits::FactoryProvider;

// Test module declaration
#[cfg(test)]
mod tests;
