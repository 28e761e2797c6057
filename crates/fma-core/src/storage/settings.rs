//! Typed application settings.
//!
//! ```toml
//! locale = "fr"
//!
//! [[providers]]
//! id = "user-desktop"
//! backend = "desktop"
//! path = "~/.local/share/file-manager/actions"
//! priority = 0
//!
//! [[providers]]
//! id = "system-keytree"
//! backend = "keytree"
//! path = "/etc/fma/keytree.json"
//! readonly = true
//! ```
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::kernel::constants::DEFAULT_ACTIONS_DIR;
use crate::kernel::error::Result;
use crate::storage::config::ConfigData;
use crate::storage::error::StorageSystemError;

/// Storage backend an io-provider is built on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Desktop,
    Document,
    Keytree,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BackendKind::Desktop => "desktop",
            BackendKind::Document => "document",
            BackendKind::Keytree => "keytree",
        };
        write!(f, "{}", name)
    }
}

/// One configured io-provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSettings {
    pub id: String,
    pub backend: BackendKind,
    /// Directory (desktop, document) or file (keytree)
    pub path: PathBuf,
    /// Lower reads first
    #[serde(default)]
    pub priority: u32,
    #[serde(default)]
    pub readonly: bool,
    /// Document format name (`json`, `yaml`, `toml`)
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Preferred locale of localized strings
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default = "default_providers")]
    pub providers: Vec<ProviderSettings>,
}

fn default_providers() -> Vec<ProviderSettings> {
    vec![ProviderSettings {
        id: "desktop".to_string(),
        backend: BackendKind::Desktop,
        path: PathBuf::from(DEFAULT_ACTIONS_DIR),
        priority: 0,
        readonly: false,
        format: None,
    }]
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            locale: None,
            providers: default_providers(),
        }
    }
}

impl Settings {
    /// Parse settings from a loaded configuration
    pub fn from_config(config: &ConfigData) -> Result<Self> {
        let value = serde_json::to_value(config).map_err(|e| StorageSystemError::InvalidSettings(e.to_string()))?;
        let settings: Settings =
            serde_json::from_value(value).map_err(|e| StorageSystemError::InvalidSettings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        for (index, provider) in self.providers.iter().enumerate() {
            if provider.id.trim().is_empty() {
                return Err(StorageSystemError::InvalidSettings(format!("provider #{} has an empty id", index)).into());
            }
            if self.providers[..index].iter().any(|other| other.id == provider.id) {
                return Err(StorageSystemError::InvalidSettings(format!("provider id '{}' is repeated", provider.id)).into());
            }
        }
        Ok(())
    }

    /// Make relative provider paths relative to `base`
    pub fn resolve_paths(&mut self, base: &Path) {
        for provider in &mut self.providers {
            if provider.path.is_relative() {
                provider.path = base.join(&provider.path);
            }
        }
    }
}
