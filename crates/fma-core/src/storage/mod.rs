//! # FMA Core Storage
//!
//! The filesystem medium backends persist to, and the configuration layer.
pub mod config;
pub mod error;
pub mod local;
pub mod provider;
pub mod settings;

pub use config::{ConfigData, ConfigFormat, ConfigManager, load_config_file};
pub use error::StorageSystemError;
pub use local::LocalStorageProvider;
pub use provider::StorageProvider;
pub use settings::{BackendKind, ProviderSettings, Settings};

// Test module declaration
#[cfg(test)]
mod tests;
